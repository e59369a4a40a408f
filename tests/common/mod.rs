//! Common test utilities for installer integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Every file the installer's payload manifest knows about
pub const PAYLOAD_FILES: &[&str] = &[
    "server.js",
    "package.json",
    "package-lock.json",
    "setup.js",
    "README.md",
    "install.bat",
    "install.sh",
    "uninstall.bat",
    "uninstall.sh",
    "start.bat",
    "start.sh",
    "public/index.html",
    "public/script.js",
    "public/style.css",
    "install-service.bat",
    "install-service.sh",
    "examples/server.properties.example",
    "examples/wrapper-config.example.json",
];

/// A payload source tree plus an empty target area, both temporary
#[allow(dead_code)]
pub struct TestSetup {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Directory holding the payload file set
    pub payload: PathBuf,
    /// Parent directory for installation targets
    pub target_root: PathBuf,
    /// Stand-in desktop directory for shortcut tests
    pub desktop: PathBuf,
}

impl TestSetup {
    /// Create a setup with the complete payload file set
    pub fn new() -> Self {
        Self::with_missing(&[])
    }

    /// Create a setup with some payload files deliberately absent
    pub fn with_missing(missing: &[&str]) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let payload = temp.path().join("payload");
        let target_root = temp.path().join("targets");
        let desktop = temp.path().join("desktop");
        std::fs::create_dir_all(&target_root).expect("Failed to create target root");

        for file in PAYLOAD_FILES {
            if missing.contains(file) {
                continue;
            }
            let path = payload.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create payload subdirectory");
            }
            std::fs::write(&path, format!("payload: {}\n", file))
                .expect("Failed to write payload file");
        }

        Self {
            temp,
            payload,
            target_root,
            desktop,
        }
    }

    /// A fresh installation target path that does not exist yet
    pub fn install_path(&self, name: &str) -> PathBuf {
        self.target_root.join(name)
    }

    /// Write an installer config file and return its path
    #[allow(dead_code)]
    pub fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }
}

/// Read and parse the uninstall record from an install path
#[allow(dead_code)]
pub fn read_record(install_path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(install_path.join("install_info.json"))
        .expect("Failed to read install_info.json");
    serde_json::from_str(&raw).expect("Failed to parse install_info.json")
}
