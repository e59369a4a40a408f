//! Platform capability boundary
//!
//! All "Windows vs. everything else" branching lives behind this enum: default
//! install path, reserved-prefix table, desktop location, and the shape of the
//! launcher artifact and helper scripts. The rest of the installer never
//! inspects the operating system directly.

use std::path::{Path, PathBuf};

/// Environment variable overriding where shortcut artifacts are written.
/// Used by integration tests to keep the real desktop untouched.
pub const DESKTOP_DIR_ENV: &str = "MCWRAP_DESKTOP_DIR";

/// Path prefixes that conventionally require elevated privileges to write.
///
/// Matching is a heuristic used to pick better guidance for the operator,
/// not a security boundary.
const WINDOWS_RESERVED_PREFIXES: &[&str] = &[
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\Windows",
    "C:\\ProgramData",
];

const UNIX_RESERVED_PREFIXES: &[&str] = &["/usr", "/opt", "/etc", "/var", "/bin", "/sbin"];

/// Platform family the installer is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    WindowsLike,
    UnixLike,
}

impl Platform {
    /// Detect the platform family for the current process
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::WindowsLike
        } else {
            Platform::UnixLike
        }
    }

    /// Per-platform user-writable default installation path.
    ///
    /// Never points into a reserved prefix, so installing to the default
    /// never requires elevation.
    pub fn default_install_path(&self) -> PathBuf {
        match self {
            Platform::WindowsLike => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("C:\\Users\\Default\\AppData\\Local"))
                .join("MinecraftServerWrapper"),
            Platform::UnixLike => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("minecraft-server-wrapper"),
        }
    }

    /// Reserved system prefixes for this platform family
    pub fn reserved_prefixes(&self) -> &'static [&'static str] {
        match self {
            Platform::WindowsLike => WINDOWS_RESERVED_PREFIXES,
            Platform::UnixLike => UNIX_RESERVED_PREFIXES,
        }
    }

    /// Whether `path` falls under a reserved system prefix.
    ///
    /// Case-insensitive prefix match on the raw path string, following each
    /// platform's own separator convention.
    pub fn is_reserved(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        self.reserved_prefixes()
            .iter()
            .any(|prefix| path_str.starts_with(&prefix.to_lowercase()))
    }

    /// Directory where the shortcut artifact is written.
    ///
    /// `MCWRAP_DESKTOP_DIR` overrides the real desktop folder when set.
    pub fn desktop_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DESKTOP_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::desktop_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Desktop")
        })
    }

    /// Name of the start script shipped in the payload
    pub fn start_script(&self) -> &'static str {
        match self {
            Platform::WindowsLike => "start.bat",
            Platform::UnixLike => "start.sh",
        }
    }

    /// Name of the service installation helper script shipped in the payload
    pub fn service_script(&self) -> &'static str {
        match self {
            Platform::WindowsLike => "install-service.bat",
            Platform::UnixLike => "install-service.sh",
        }
    }

    /// Operator guidance for running the service helper with elevation
    pub fn service_elevation_hint(&self) -> &'static str {
        match self {
            Platform::WindowsLike => "Run it as Administrator to register the service.",
            Platform::UnixLike => "Run it with sudo to register the service.",
        }
    }

    /// File name of the double-clickable launcher artifact
    pub fn shortcut_file_name(&self, app_name: &str) -> String {
        match self {
            Platform::WindowsLike => format!("{}.bat", app_name),
            Platform::UnixLike => format!("{}.desktop", app_name.replace(' ', "_")),
        }
    }

    /// Render the launcher artifact contents for this platform family
    pub fn render_shortcut(&self, app_name: &str, install_path: &Path) -> String {
        match self {
            Platform::WindowsLike => format!(
                "@echo off\ncd /d \"{}\"\nstart.bat\n",
                install_path.display()
            ),
            Platform::UnixLike => format!(
                "[Desktop Entry]\n\
                 Name={}\n\
                 Comment=Minecraft Server Management Tool\n\
                 Exec={}\n\
                 Icon=application-x-executable\n\
                 Terminal=false\n\
                 Type=Application\n\
                 Categories=Game;\n",
                app_name,
                install_path.join("start.sh").display()
            ),
        }
    }
}
