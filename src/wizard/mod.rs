//! Interactive installation wizard
//!
//! Reproduces the classic wizard flow as terminal prompt phases: welcome,
//! license, directory, components, installation, completion. Each phase
//! edits the draft [`InstallPlan`]; the plan is frozen before the pipeline
//! starts. The pipeline itself runs on a dedicated worker thread and talks
//! back exclusively through the operator channel, so the front end stays
//! responsive for progress rendering and cancellation.

mod channel;

use std::path::PathBuf;

use console::style;
use inquire::{Confirm, MultiSelect, Text};

use crate::cli::Cli;
use crate::domain::{ComponentCatalog, Platform};
use crate::error::{InstallerError, Result};
use crate::manifest::PayloadManifest;
use crate::operator::Severity;
use crate::pipeline::{PipelineState, StepPipeline};
use crate::plan::InstallPlan;
use crate::policy::{self, PathCheck};
use crate::progress::ProgressDisplay;
use crate::{APP_NAME, APP_VERSION};

use self::channel::{ChannelOperator, ProgressEvent};

const WIZARD_STEPS: usize = 6;

/// Run the interactive wizard end to end
pub fn run(cli: &Cli) -> Result<()> {
    let platform = Platform::current();
    let catalog = ComponentCatalog::standard();
    let mut plan = InstallPlan::resolve(&catalog, platform, cli)?;

    print_welcome();

    // License phase
    if !plan.license_accepted {
        print_header(2, "License Agreement");
        println!(
            "{} is distributed under the MIT license. By installing you agree to its terms.",
            APP_NAME
        );
        let accepted = Confirm::new("I accept the terms of the License Agreement")
            .with_default(false)
            .prompt()?;
        if !accepted {
            return Err(InstallerError::LicenseNotAccepted);
        }
        plan.license_accepted = true;
    }

    // Directory phase: re-prompts until the candidate is usable, mirroring
    // the original wizard's return to the directory screen on permission
    // problems.
    print_header(3, "Choose Installation Location");
    plan.install_path = prompt_install_path(&plan.install_path, platform)?;

    // Components phase
    print_header(4, "Select Components");
    plan.components = prompt_components(&catalog, &plan)?;
    plan.create_shortcuts = plan.components.contains("shortcuts");
    plan.install_service = plan.components.contains("service");

    // Summary and confirmation; the plan is immutable from here on
    print_header(5, "Installation");
    println!("  Install to:  {}", plan.install_path.display());
    println!(
        "  Components:  {}",
        plan.components
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Total size:  {} MB",
        catalog.total_size(&plan.components) / (1024 * 1024)
    );
    if !Confirm::new("Install now?").with_default(true).prompt()? {
        println!("Installation cancelled. No changes were made.");
        return Ok(());
    }

    plan.validate_for_run()?;
    let report = run_pipeline_on_worker(&plan, cli, platform)?;

    match report.state {
        PipelineState::Completed => {
            for warning in &report.warnings {
                eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
            }
            print_header(6, "Installation Complete");
            completion_phase(&plan, platform)?;
            Ok(())
        }
        PipelineState::Cancelled => Err(InstallerError::Cancelled),
        PipelineState::Failed { step, kind } => Err(InstallerError::StepFailed {
            step,
            kind,
            detail: "see messages above".to_string(),
        }),
        PipelineState::NotStarted | PipelineState::Running(_) => Err(InstallerError::IoError {
            message: "pipeline ended in an unexpected state".to_string(),
        }),
    }
}

/// Execute the pipeline on a dedicated worker thread, rendering progress
/// events on the calling thread until the worker finishes.
fn run_pipeline_on_worker(
    plan: &InstallPlan,
    cli: &Cli,
    platform: Platform,
) -> Result<crate::pipeline::RunReport> {
    let payload_root = match &cli.payload_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let (operator, events) = ChannelOperator::new();
    let worker_plan = plan.clone();
    let worker = std::thread::spawn(move || {
        let manifest = PayloadManifest::new(payload_root);
        let pipeline = StepPipeline::new(&worker_plan, &manifest, platform, APP_NAME, APP_VERSION);
        pipeline.run(&operator)
    });

    let display = ProgressDisplay::new();
    // The receive loop ends when the worker drops its sender
    for event in events {
        match event {
            ProgressEvent::Progress {
                step,
                fraction,
                message,
            } => {
                display.update_step(&step, &message);
                if fraction >= 1.0 {
                    display.step_done();
                }
            }
            ProgressEvent::Note { severity, message } => match severity {
                Severity::Info => display.note(&message),
                Severity::Warning => {
                    display.note(&format!("{} {}", style("Warning:").yellow().bold(), message));
                }
                Severity::Error => {
                    display.note(&format!("{} {}", style("Error:").red().bold(), message));
                }
            },
        }
    }

    let report = worker.join().map_err(|_| InstallerError::IoError {
        message: "installation worker panicked".to_string(),
    })?;

    if report.succeeded() {
        display.finish();
    } else {
        display.abandon("installation did not complete");
    }
    Ok(report)
}

fn print_welcome() {
    print_header(1, "Welcome");
    println!("{}", style(format!("{} v{}", APP_NAME, APP_VERSION)).bold());
    println!(
        "This wizard installs the web-based management tool for Minecraft servers:\n\
         start/stop/restart controls, live console, file manager, and system\n\
         monitoring, all reachable from any browser.\n"
    );
}

fn print_header(step: usize, title: &str) {
    println!(
        "\n{} {}",
        style(format!("[{}/{}]", step, WIZARD_STEPS)).cyan().bold(),
        style(title).bold()
    );
}

/// Prompt for the install directory until validation passes
fn prompt_install_path(default: &std::path::Path, platform: Platform) -> Result<PathBuf> {
    loop {
        let input = Text::new("Installation directory:")
            .with_default(&default.display().to_string())
            .prompt()?;
        let candidate = PathBuf::from(input.trim());

        match policy::validate(&candidate, platform) {
            PathCheck::Writable => {
                println!("  {} directory is writable", style("✓").green());
                return Ok(candidate);
            }
            PathCheck::WillBeCreated => {
                println!("  {} directory will be created", style("✓").green());
                return Ok(candidate);
            }
            PathCheck::RequiresElevation => {
                println!(
                    "  {} this location requires elevated privileges",
                    style("⚠").yellow()
                );
                println!("    You can:");
                println!("    1. re-run the installer elevated (Administrator / sudo)");
                println!("    2. choose another installation directory");
                println!(
                    "    3. use the default path: {}",
                    platform.default_install_path().display()
                );
            }
            PathCheck::Unwritable => {
                println!("  {} directory is not writable", style("✗").red());
            }
            PathCheck::Error(detail) => {
                println!("  {} {}", style("✗").red(), detail);
            }
        }
    }
}

/// MultiSelect over the optional components; required ones are pinned
fn prompt_components(
    catalog: &ComponentCatalog,
    plan: &InstallPlan,
) -> Result<std::collections::BTreeSet<String>> {
    let optional: Vec<&crate::domain::Component> = catalog
        .components()
        .iter()
        .filter(|c| !c.required)
        .collect();

    let labels: Vec<String> = optional
        .iter()
        .map(|c| {
            format!(
                "{} ({} MB)",
                c.display_name,
                c.approx_size_bytes / (1024 * 1024)
            )
        })
        .collect();
    let preselected: Vec<usize> = optional
        .iter()
        .enumerate()
        .filter(|(_, c)| plan.components.contains(c.id))
        .map(|(i, _)| i)
        .collect();

    for component in catalog.components().iter().filter(|c| c.required) {
        println!(
            "  {} {} (required)",
            style("•").cyan(),
            component.display_name
        );
    }

    let chosen = MultiSelect::new("Optional components:", labels.clone())
        .with_default(&preselected)
        .prompt()?;

    let mut selection = catalog.required_ids();
    for (index, label) in labels.iter().enumerate() {
        if chosen.contains(label) {
            selection.insert(optional[index].id.to_string());
        }
    }
    Ok(catalog.normalize(&selection))
}

/// Post-install actions: launch the application and open the README
fn completion_phase(plan: &InstallPlan, platform: Platform) -> Result<()> {
    println!("{} has been successfully installed.", APP_NAME);
    println!("  Installed to: {}", plan.install_path.display());
    println!(
        "  Uninstall info: {}",
        crate::record::UninstallRecord::path_for(&plan.install_path).display()
    );
    println!("  Web interface: http://localhost:5900 once the application is running\n");

    let launch = Confirm::new(&format!("Launch {} now?", APP_NAME))
        .with_default(true)
        .prompt()?;
    if launch {
        launch_application(plan, platform);
    }

    let view_readme = Confirm::new("View the README file?")
        .with_default(false)
        .prompt()?;
    if view_readme {
        open_readme(plan, platform);
    }
    Ok(())
}

/// Best-effort launch of the installed start script
fn launch_application(plan: &InstallPlan, platform: Platform) {
    let script = plan.install_path.join(platform.start_script());
    if !script.exists() {
        eprintln!(
            "{} start script not found at {}",
            style("Warning:").yellow().bold(),
            script.display()
        );
        return;
    }

    let result = match platform {
        Platform::WindowsLike => std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(&script)
            .current_dir(&plan.install_path)
            .spawn(),
        Platform::UnixLike => std::process::Command::new("sh")
            .arg(&script)
            .current_dir(&plan.install_path)
            .spawn(),
    };
    if let Err(e) = result {
        eprintln!(
            "{} could not launch the application: {}",
            style("Warning:").yellow().bold(),
            e
        );
    }
}

/// Best-effort open of the installed README
fn open_readme(plan: &InstallPlan, platform: Platform) {
    let readme = plan.install_path.join("README.md");
    if !readme.exists() {
        eprintln!(
            "{} README not found at {}",
            style("Warning:").yellow().bold(),
            readme.display()
        );
        return;
    }

    let result = match platform {
        Platform::WindowsLike => std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(&readme)
            .spawn(),
        Platform::UnixLike => std::process::Command::new("xdg-open").arg(&readme).spawn(),
    };
    if let Err(e) = result {
        eprintln!(
            "{} could not open README: {}",
            style("Warning:").yellow().bold(),
            e
        );
    }
}
