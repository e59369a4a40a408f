//! Silent (unattended) installation driver
//!
//! Everything is validated before the filesystem is touched: config file
//! parse, license acceptance, and installation path. Any validation failure
//! prints a diagnostic and the process exits non-zero without attempting a
//! partial run.

use console::style;

use crate::cli::Cli;
use crate::domain::{ComponentCatalog, Platform};
use crate::error::{ErrorKind, InstallerError, Result};
use crate::manifest::PayloadManifest;
use crate::operator::SilentOperator;
use crate::pipeline::{PipelineState, StepOutcome, StepPipeline};
use crate::plan::InstallPlan;
use crate::policy::{self, PathCheck};
use crate::{APP_NAME, APP_VERSION};

/// Run a silent installation. Returns `Ok(())` only on full success.
pub fn run(cli: &Cli) -> Result<()> {
    let platform = Platform::current();
    let catalog = ComponentCatalog::standard();

    // Pre-flight: plan resolution (includes the config file read) and the
    // license gate, all before any mutation.
    let plan = InstallPlan::resolve(&catalog, platform, cli)?;
    plan.validate_for_run().inspect_err(|_| {
        eprintln!(
            "License must be accepted for silent installation. \
             Use --accept-license or set \"accept_license\": true in the config file."
        );
    })?;

    validate_install_path(&plan, platform)?;

    // Re-running over an existing installation is supported; files are
    // overwritten in place and the record is rewritten.
    if plan.verbose {
        if let Ok(existing) = crate::record::UninstallRecord::load(&plan.install_path) {
            println!(
                "Existing {} v{} installation found, files will be overwritten",
                existing.app_name, existing.app_version
            );
        }
    }

    let payload_root = match &cli.payload_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let manifest = PayloadManifest::new(payload_root);

    if plan.verbose {
        println!(
            "Starting silent installation of {} v{}",
            style(APP_NAME).bold(),
            APP_VERSION
        );
        println!("Payload source: {}", manifest.source_root().display());
        println!("Installation path: {}", plan.install_path.display());
        println!(
            "Components: {} ({} MB)",
            plan.components
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            catalog.total_size(&plan.components) / (1024 * 1024)
        );
    }

    let operator = SilentOperator::new(plan.verbose);
    let pipeline = StepPipeline::new(&plan, &manifest, platform, APP_NAME, APP_VERSION);
    let report = pipeline.run(&operator);

    match report.state {
        PipelineState::Completed => {
            if plan.verbose {
                for result in &report.results {
                    println!("  {} finished in {} ms", result.step_name, result.duration_ms);
                }
            }
            for warning in &report.warnings {
                eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
            }
            print_summary(&plan, platform);
            Ok(())
        }
        PipelineState::Cancelled => Err(InstallerError::Cancelled),
        PipelineState::Failed { step, kind } => {
            let detail = report
                .results
                .iter()
                .rev()
                .find_map(|r| match &r.outcome {
                    StepOutcome::Failed { detail, .. } => Some(detail.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| "unknown failure".to_string());
            match kind {
                ErrorKind::PermissionDenied => Err(InstallerError::PermissionDenied {
                    path: plan.install_path.display().to_string(),
                }),
                ErrorKind::CommitFailure => Err(InstallerError::CommitFailed {
                    path: crate::record::UninstallRecord::path_for(&plan.install_path)
                        .display()
                        .to_string(),
                    reason: detail,
                }),
                _ => Err(InstallerError::StepFailed { step, kind, detail }),
            }
        }
        PipelineState::NotStarted | PipelineState::Running(_) => {
            Err(InstallerError::IoError {
                message: "pipeline ended in an unexpected state".to_string(),
            })
        }
    }
}

/// Path validation with elevation-aware diagnostics, before any mutation
fn validate_install_path(plan: &InstallPlan, platform: Platform) -> Result<()> {
    match policy::validate(&plan.install_path, platform) {
        PathCheck::Writable | PathCheck::WillBeCreated => Ok(()),
        PathCheck::RequiresElevation => {
            eprintln!(
                "Invalid installation path (RequiresElevation): {}",
                plan.install_path.display()
            );
            Err(InstallerError::PermissionDenied {
                path: plan.install_path.display().to_string(),
            })
        }
        PathCheck::Unwritable => Err(InstallerError::InvalidInstallPath {
            path: plan.install_path.display().to_string(),
            reason: "no write permission".to_string(),
        }),
        PathCheck::Error(detail) => Err(InstallerError::InvalidInstallPath {
            path: plan.install_path.display().to_string(),
            reason: detail,
        }),
    }
}

fn print_summary(plan: &InstallPlan, platform: Platform) {
    println!(
        "{} installed to {}",
        APP_NAME,
        plan.install_path.display()
    );
    if plan.verbose {
        let (files, bytes) = installed_footprint(&plan.install_path);
        println!("Installed {} files ({} KB)", files, bytes / 1024);
    }
    println!("Next steps:");
    println!("  1. Navigate to the installation directory");
    println!("  2. Run setup.js for initial configuration");
    println!(
        "  3. Start the application using {}",
        platform.start_script()
    );
}

/// File count and total size under the install path
fn installed_footprint(root: &std::path::Path) -> (usize, u64) {
    let mut files = 0;
    let mut bytes = 0;
    for entry in walkdir::WalkDir::new(root).into_iter().flatten() {
        if entry.file_type().is_file() {
            files += 1;
            bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    (files, bytes)
}
