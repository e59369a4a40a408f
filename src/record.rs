//! Uninstall record (`install_info.json`)
//!
//! The pipeline's commit marker: written once, atomically, as the last
//! successful step. Its presence is the authoritative signal that the
//! installation fully completed; a separate uninstaller consumes it.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{InstallerError, Result};

/// File name of the record inside the install path
pub const RECORD_FILE_NAME: &str = "install_info.json";

/// Persisted manifest of what was installed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UninstallRecord {
    pub app_name: String,
    pub app_version: String,
    pub install_path: String,
    /// Sorted component ids (BTreeSet keeps serialization deterministic)
    pub installed_components: BTreeSet<String>,
    /// Epoch seconds, taken from the install directory's creation time
    pub install_date: String,
}

impl UninstallRecord {
    pub fn new(
        app_name: &str,
        app_version: &str,
        install_path: &Path,
        installed_components: BTreeSet<String>,
    ) -> Self {
        Self {
            app_name: app_name.to_string(),
            app_version: app_version.to_string(),
            install_path: install_path.display().to_string(),
            installed_components,
            install_date: creation_epoch_seconds(install_path),
        }
    }

    /// Location of the record for a given install path
    pub fn path_for(install_path: &Path) -> PathBuf {
        install_path.join(RECORD_FILE_NAME)
    }

    /// Write the record atomically: serialize into a temp file in the same
    /// directory, then rename over the final name. A partial record is
    /// indistinguishable from "installation never completed", so the rename
    /// must be the only visible transition.
    pub fn write_atomic(&self, install_path: &Path) -> Result<()> {
        let target = Self::path_for(install_path);
        let json = serde_json::to_string_pretty(self).map_err(|e| InstallerError::CommitFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        })?;

        let write_result = (|| -> std::io::Result<()> {
            let mut tmp = tempfile::Builder::new()
                .prefix(".install_info-")
                .tempfile_in(install_path)?;
            tmp.write_all(json.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })();

        write_result.map_err(|e| InstallerError::CommitFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Read a previously written record
    pub fn load(install_path: &Path) -> Result<Self> {
        let path = Self::path_for(install_path);
        let contents = std::fs::read_to_string(&path).map_err(|e| InstallerError::IoError {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&contents).map_err(|e| InstallerError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Creation time of the install directory as epoch seconds, falling back to
/// the current time on filesystems without creation-time metadata.
fn creation_epoch_seconds(path: &Path) -> String {
    let created = std::fs::metadata(path)
        .and_then(|m| m.created())
        .unwrap_or_else(|_| SystemTime::now());
    let secs = created
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}
