//! Silent-mode JSON configuration file
//!
//! A partial-override mapping: every field is optional and only present
//! fields override defaults. Unknown keys are ignored; malformed JSON is a
//! hard pre-flight error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{InstallerError, Result};

/// Optional overrides read from `--config-file`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub install_path: Option<String>,
    /// Per-component toggles, e.g. `{"examples": true, "service": false}`
    pub components: Option<BTreeMap<String, bool>>,
    pub accept_license: Option<bool>,
    pub create_shortcuts: Option<bool>,
    pub install_service: Option<bool>,
}

impl ConfigFile {
    /// Read and parse the config file as a single atomic read.
    ///
    /// Any failure aborts resolution before the pipeline touches the
    /// filesystem.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| InstallerError::ConfigReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&contents).map_err(|e| InstallerError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join("install.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"{
                "install_path": "/opt/custom",
                "components": {"examples": true, "service": false},
                "accept_license": true,
                "create_shortcuts": false,
                "install_service": false
            }"#,
        );
        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.install_path.as_deref(), Some("/opt/custom"));
        assert_eq!(config.accept_license, Some(true));
        assert_eq!(config.create_shortcuts, Some(false));
        let components = config.components.unwrap();
        assert_eq!(components.get("examples"), Some(&true));
        assert_eq!(components.get("service"), Some(&false));
    }

    #[test]
    fn test_load_empty_object_is_all_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "{}");
        let config = ConfigFile::load(&path).unwrap();
        assert!(config.install_path.is_none());
        assert!(config.accept_license.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"{"accept_license": true, "future_option": "whatever"}"#,
        );
        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.accept_license, Some(true));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "{not json");
        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = ConfigFile::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigReadFailed { .. }));
    }
}
