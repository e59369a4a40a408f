//! The five installation step implementations
//!
//! Each step is idempotent with respect to re-execution on the same target
//! path. Steps return their failure as `(ErrorKind, detail)`; the pipeline
//! decides what is fatal.

use std::path::PathBuf;

use crate::domain::Platform;
use crate::error::ErrorKind;
use crate::manifest::{PayloadManifest, SERVER_WORK_DIR};
use crate::operator::OperatorChannel;
use crate::plan::InstallPlan;
use crate::record::UninstallRecord;

pub type StepError = (ErrorKind, String);

/// Create the install path and probe effective write permission.
///
/// The probe is mandatory even when path validation already reported the
/// location writable: permissions can change between check and use.
pub fn prepare_directory(plan: &InstallPlan) -> Result<(), StepError> {
    std::fs::create_dir_all(&plan.install_path).map_err(|e| {
        (
            ErrorKind::classify(&e),
            format!(
                "failed to create {}: {}",
                plan.install_path.display(),
                e
            ),
        )
    })?;

    // Create-and-delete marker probe
    let probe = tempfile::Builder::new()
        .prefix(".mcwrap-probe-")
        .tempfile_in(&plan.install_path)
        .map_err(|e| {
            (
                ErrorKind::classify(&e),
                format!(
                    "write probe failed in {}: {}",
                    plan.install_path.display(),
                    e
                ),
            )
        })?;
    drop(probe);
    Ok(())
}

/// Result of the payload copy step
pub struct CopyOutcome {
    pub copied: usize,
    pub total: usize,
    /// Manifest entries whose source file was absent (non-fatal)
    pub missing: Vec<String>,
    /// Cancellation was observed between files; the pipeline stops after
    /// this step without running the remaining ones
    pub cancelled: bool,
}

/// Copy every selected manifest file into the install path, preserving
/// relative subdirectory structure. A missing source file is a per-file
/// warning; copying continues with the remaining files.
pub fn copy_payload(
    plan: &InstallPlan,
    manifest: &PayloadManifest,
    operator: &dyn OperatorChannel,
) -> Result<CopyOutcome, StepError> {
    let entries = manifest.entries_for(&plan.components);
    let total = entries.len();
    let mut outcome = CopyOutcome {
        copied: 0,
        total,
        missing: Vec::new(),
        cancelled: false,
    };

    for (index, entry) in entries.iter().enumerate() {
        // Cancellation stops between files, never mid-file
        if operator.is_cancelled() {
            outcome.cancelled = true;
            return Ok(outcome);
        }

        let source = manifest.source_path(entry);
        if !source.exists() {
            outcome.missing.push(entry.relative_path.to_string());
            continue;
        }

        let target = plan.install_path.join(entry.relative_path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                (
                    ErrorKind::classify(&e),
                    format!("failed to create {}: {}", parent.display(), e),
                )
            })?;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            (
                ErrorKind::classify(&e),
                format!("failed to copy {}: {}", entry.relative_path, e),
            )
        })?;
        outcome.copied += 1;

        operator.report_progress(
            super::STEP_COPY_PAYLOAD,
            (index + 1) as f64 / total.max(1) as f64,
            &format!("({}/{}) {}", index + 1, total, entry.relative_path),
        );
    }

    // Working directory the wrapped server runs in
    let work_dir = plan.install_path.join(SERVER_WORK_DIR);
    std::fs::create_dir_all(&work_dir).map_err(|e| {
        (
            ErrorKind::classify(&e),
            format!("failed to create {}: {}", work_dir.display(), e),
        )
    })?;

    Ok(outcome)
}

/// Write the double-clickable launcher artifact into the desktop folder.
/// Returns the artifact path. Failures are non-fatal to the pipeline.
pub fn register_shortcuts(
    plan: &InstallPlan,
    platform: Platform,
    app_name: &str,
) -> Result<PathBuf, StepError> {
    let desktop = platform.desktop_dir();
    std::fs::create_dir_all(&desktop).map_err(|e| {
        (
            ErrorKind::PartialStepFailure,
            format!("failed to create {}: {}", desktop.display(), e),
        )
    })?;

    let artifact = desktop.join(platform.shortcut_file_name(app_name));
    let contents = platform.render_shortcut(app_name, &plan.install_path);
    std::fs::write(&artifact, contents).map_err(|e| {
        (
            ErrorKind::PartialStepFailure,
            format!("failed to write {}: {}", artifact.display(), e),
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(&artifact, perms).map_err(|e| {
            (
                ErrorKind::PartialStepFailure,
                format!("failed to mark {} executable: {}", artifact.display(), e),
            )
        })?;
    }

    Ok(artifact)
}

/// Stage the ability to register a system service.
///
/// Only verifies the helper script landed in the install path and tells the
/// operator how to run it elevated; never attempts escalation itself.
pub fn register_service(plan: &InstallPlan, platform: Platform) -> Result<String, StepError> {
    let script = plan.install_path.join(platform.service_script());
    if !script.exists() {
        return Err((
            ErrorKind::PartialStepFailure,
            format!(
                "service helper script {} was not found in the install path",
                platform.service_script()
            ),
        ));
    }
    Ok(format!(
        "Service installation script available at {}. {}",
        script.display(),
        platform.service_elevation_hint()
    ))
}

/// Write the uninstall record, the pipeline's commit marker. Fatal on failure.
pub fn write_uninstall_record(
    plan: &InstallPlan,
    app_name: &str,
    app_version: &str,
) -> Result<(), StepError> {
    let record = UninstallRecord::new(
        app_name,
        app_version,
        &plan.install_path,
        plan.components.clone(),
    );
    record
        .write_atomic(&plan.install_path)
        .map_err(|e| (ErrorKind::CommitFailure, e.to_string()))
}
