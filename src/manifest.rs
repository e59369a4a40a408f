//! Payload manifest
//!
//! The fixed list of files the installer copies. The set is static and ships
//! alongside the installer binary; each entry is owned by a component so the
//! effective manifest follows the plan's selection. Missing source files are
//! a per-file warning, never a pipeline failure.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One payload file, identified by its path relative to the payload root.
/// The same relative path is reproduced under the install path.
#[derive(Debug, Clone, Copy)]
pub struct ManifestEntry {
    pub relative_path: &'static str,
    /// Component that owns this entry
    pub component: &'static str,
}

/// The full static manifest
const MANIFEST: &[ManifestEntry] = &[
    // Core application
    ManifestEntry { relative_path: "server.js", component: "core" },
    ManifestEntry { relative_path: "package.json", component: "core" },
    ManifestEntry { relative_path: "package-lock.json", component: "core" },
    ManifestEntry { relative_path: "setup.js", component: "core" },
    ManifestEntry { relative_path: "README.md", component: "core" },
    ManifestEntry { relative_path: "install.bat", component: "core" },
    ManifestEntry { relative_path: "install.sh", component: "core" },
    ManifestEntry { relative_path: "uninstall.bat", component: "core" },
    ManifestEntry { relative_path: "uninstall.sh", component: "core" },
    ManifestEntry { relative_path: "start.bat", component: "core" },
    ManifestEntry { relative_path: "start.sh", component: "core" },
    // Static web assets
    ManifestEntry { relative_path: "public/index.html", component: "core" },
    ManifestEntry { relative_path: "public/script.js", component: "core" },
    ManifestEntry { relative_path: "public/style.css", component: "core" },
    // Service integration helpers
    ManifestEntry { relative_path: "install-service.bat", component: "service" },
    ManifestEntry { relative_path: "install-service.sh", component: "service" },
    // Example configurations
    ManifestEntry { relative_path: "examples/server.properties.example", component: "examples" },
    ManifestEntry { relative_path: "examples/wrapper-config.example.json", component: "examples" },
];

/// Subdirectory created under the install path for the managed server files
pub const SERVER_WORK_DIR: &str = "minecraft-server";

/// Payload source rooted at a directory
#[derive(Debug, Clone)]
pub struct PayloadManifest {
    source_root: PathBuf,
}

impl PayloadManifest {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// All entries, regardless of selection
    pub fn all_entries() -> &'static [ManifestEntry] {
        MANIFEST
    }

    /// Entries owned by the selected components.
    ///
    /// The `shortcuts` component carries no payload files; it only enables
    /// the shortcut registration step.
    pub fn entries_for(&self, components: &BTreeSet<String>) -> Vec<ManifestEntry> {
        MANIFEST
            .iter()
            .filter(|e| components.contains(e.component))
            .copied()
            .collect()
    }

    /// Absolute source path for an entry
    pub fn source_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.source_root.join(entry.relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_core_selection_excludes_service_and_examples() {
        let manifest = PayloadManifest::new("/payload");
        let entries = manifest.entries_for(&set(&["core"]));
        assert!(entries.iter().any(|e| e.relative_path == "server.js"));
        assert!(entries.iter().any(|e| e.relative_path == "public/index.html"));
        assert!(!entries.iter().any(|e| e.component == "service"));
        assert!(!entries.iter().any(|e| e.component == "examples"));
    }

    #[test]
    fn test_service_selection_adds_helper_scripts() {
        let manifest = PayloadManifest::new("/payload");
        let entries = manifest.entries_for(&set(&["core", "service"]));
        assert!(
            entries
                .iter()
                .any(|e| e.relative_path == "install-service.sh")
        );
    }

    #[test]
    fn test_source_path_joins_relative_structure() {
        let manifest = PayloadManifest::new("/payload");
        let entry = ManifestEntry {
            relative_path: "public/index.html",
            component: "core",
        };
        assert_eq!(
            manifest.source_path(&entry),
            PathBuf::from("/payload/public/index.html")
        );
    }

    #[test]
    fn test_every_entry_belongs_to_a_known_component() {
        let known = ["core", "service", "shortcuts", "examples"];
        for entry in PayloadManifest::all_entries() {
            assert!(
                known.contains(&entry.component),
                "unknown component {} for {}",
                entry.component,
                entry.relative_path
            );
        }
    }
}
