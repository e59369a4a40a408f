//! Installation path policy
//!
//! Decides whether a candidate installation directory is usable without
//! elevated privileges. The verdict only guides the operator; the pipeline's
//! PrepareDirectory step re-probes at execution time because permissions can
//! change between check and use.

use std::path::Path;

use crate::domain::Platform;

/// Verdict for a candidate installation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathCheck {
    /// Path exists and is writable
    Writable,
    /// Path does not exist but its nearest existing ancestor is writable
    WillBeCreated,
    /// Writing would fail and the path sits under a reserved system prefix
    RequiresElevation,
    /// Writing would fail for reasons unrelated to elevation
    Unwritable,
    /// The path cannot be used at all (e.g. it names an existing file)
    Error(String),
}

/// Validate a candidate installation directory.
///
/// An existing path is probed directly; an absent path is judged by the
/// writability of its nearest existing ancestor.
pub fn validate(path: &Path, platform: Platform) -> PathCheck {
    if path.exists() {
        if path.is_file() {
            return PathCheck::Error(format!(
                "{} exists and is a file, not a directory",
                path.display()
            ));
        }
        if dir_is_writable(path) {
            PathCheck::Writable
        } else {
            classify_unwritable(path, platform)
        }
    } else {
        match nearest_existing_ancestor(path) {
            Some(ancestor) => {
                if !ancestor.is_dir() {
                    return PathCheck::Error(format!(
                        "ancestor {} is not a directory",
                        ancestor.display()
                    ));
                }
                if dir_is_writable(ancestor) {
                    PathCheck::WillBeCreated
                } else {
                    classify_unwritable(path, platform)
                }
            }
            None => PathCheck::Error(format!("no existing ancestor for {}", path.display())),
        }
    }
}

/// Map an access failure to the elevation-aware verdict.
///
/// Reserved-prefix paths get `RequiresElevation` so downstream guidance can
/// suggest the concrete remedies; everything else is a bare `Unwritable`.
pub fn classify_unwritable(path: &Path, platform: Platform) -> PathCheck {
    if platform.is_reserved(path) {
        PathCheck::RequiresElevation
    } else {
        PathCheck::Unwritable
    }
}

/// Walk up until an existing ancestor is found
fn nearest_existing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors().find(|a| a.exists())
}

/// Probe writability by creating an anonymous temp file in the directory.
///
/// More honest than inspecting permission bits: it answers whether this
/// process can actually write there right now.
fn dir_is_writable(dir: &Path) -> bool {
    tempfile::tempfile_in(dir).is_ok()
}
