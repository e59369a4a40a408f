//! Installation step pipeline
//!
//! The ordered, resumable sequence of installation actions:
//! PrepareDirectory → CopyPayload → RegisterShortcuts → RegisterService →
//! WriteUninstallRecord. The pipeline behaves identically under both front
//! ends; everything it knows about the outside world arrives through the
//! [`OperatorChannel`].
//!
//! Failure policy per step:
//! - PrepareDirectory, CopyPayload: fatal
//! - RegisterShortcuts, RegisterService: non-fatal, collected as warnings
//! - WriteUninstallRecord: fatal (it is the commit marker)
//!
//! Cancellation is polled cooperatively at step boundaries and between
//! copied files; a cancelled run leaves partially-copied files in place and
//! reports `Cancelled`, never `Failed`.

pub mod steps;

use std::time::Instant;

use crate::domain::Platform;
use crate::error::ErrorKind;
use crate::manifest::PayloadManifest;
use crate::operator::{OperatorChannel, Severity};
use crate::plan::InstallPlan;

pub const STEP_PREPARE_DIRECTORY: &str = "PrepareDirectory";
pub const STEP_COPY_PAYLOAD: &str = "CopyPayload";
pub const STEP_REGISTER_SHORTCUTS: &str = "RegisterShortcuts";
pub const STEP_REGISTER_SERVICE: &str = "RegisterService";
pub const STEP_WRITE_UNINSTALL_RECORD: &str = "WriteUninstallRecord";

/// Fixed step order
pub const STEP_NAMES: [&str; 5] = [
    STEP_PREPARE_DIRECTORY,
    STEP_COPY_PAYLOAD,
    STEP_REGISTER_SHORTCUTS,
    STEP_REGISTER_SERVICE,
    STEP_WRITE_UNINSTALL_RECORD,
];

/// Overall pipeline state, owned by the driving front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    Running(usize),
    Cancelled,
    Failed { step: String, kind: ErrorKind },
    Completed,
}

/// Outcome of a single executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// The plan disabled this step; reported as skipped, not failed
    Skipped(String),
    Failed { kind: ErrorKind, detail: String },
}

/// Audit-trail entry, never mutated after creation
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step_name: String,
    pub outcome: StepOutcome,
    pub duration_ms: u64,
}

/// Summary of a pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: PipelineState,
    pub results: Vec<StepResult>,
    /// Non-fatal issues surfaced alongside an otherwise-successful run
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Completed
    }
}

/// The installation pipeline. Stateless between step invocations; all run
/// state lives in the returned [`RunReport`].
pub struct StepPipeline<'a> {
    plan: &'a InstallPlan,
    manifest: &'a PayloadManifest,
    platform: Platform,
    app_name: &'a str,
    app_version: &'a str,
}

impl<'a> StepPipeline<'a> {
    pub fn new(
        plan: &'a InstallPlan,
        manifest: &'a PayloadManifest,
        platform: Platform,
        app_name: &'a str,
        app_version: &'a str,
    ) -> Self {
        Self {
            plan,
            manifest,
            platform,
            app_name,
            app_version,
        }
    }

    /// Execute the full step sequence.
    ///
    /// The plan must have passed pre-flight validation; the pipeline itself
    /// only enforces the per-step policy.
    pub fn run(&self, operator: &dyn OperatorChannel) -> RunReport {
        let mut report = RunReport {
            state: PipelineState::NotStarted,
            results: Vec::with_capacity(STEP_NAMES.len()),
            warnings: Vec::new(),
        };

        for (index, step_name) in STEP_NAMES.iter().enumerate() {
            // Cooperative cancellation, checked at every step boundary
            if operator.is_cancelled() {
                report.state = PipelineState::Cancelled;
                return report;
            }
            report.state = PipelineState::Running(index);
            operator.report_progress(step_name, 0.0, "starting");

            let started = Instant::now();
            let outcome = self.execute_step(step_name, operator, &mut report.warnings);
            let duration_ms = started.elapsed().as_millis() as u64;

            let fatal = matches!(
                &outcome,
                StepOutcome::Failed { kind, .. } if *kind != ErrorKind::PartialStepFailure
            );
            let failed_kind = match &outcome {
                StepOutcome::Failed { kind, .. } => Some(*kind),
                _ => None,
            };

            operator.report_progress(step_name, 1.0, "done");
            report.results.push(StepResult {
                step_name: step_name.to_string(),
                outcome,
                duration_ms,
            });

            if fatal {
                operator.notify(
                    step_name,
                    "fatal error, installation stopped",
                    Severity::Error,
                );
                report.state = PipelineState::Failed {
                    step: step_name.to_string(),
                    kind: failed_kind.unwrap_or(ErrorKind::OtherIoError),
                };
                return report;
            }

            // CopyPayload observes cancellation between files; honor it
            // before moving to the next step.
            if *step_name == STEP_COPY_PAYLOAD && operator.is_cancelled() {
                report.state = PipelineState::Cancelled;
                return report;
            }
        }

        report.state = PipelineState::Completed;
        report
    }

    fn execute_step(
        &self,
        step_name: &str,
        operator: &dyn OperatorChannel,
        warnings: &mut Vec<String>,
    ) -> StepOutcome {
        match step_name {
            STEP_PREPARE_DIRECTORY => match steps::prepare_directory(self.plan) {
                Ok(()) => StepOutcome::Success,
                Err((kind, detail)) => StepOutcome::Failed { kind, detail },
            },
            STEP_COPY_PAYLOAD => {
                match steps::copy_payload(self.plan, self.manifest, operator) {
                    Ok(outcome) => {
                        for missing in &outcome.missing {
                            let warning =
                                format!("source file {} not found, skipped", missing);
                            operator.notify("CopyPayload", &warning, Severity::Warning);
                            warnings.push(warning);
                        }
                        let summary = if outcome.cancelled {
                            format!(
                                "cancelled after {} of {} files",
                                outcome.copied, outcome.total
                            )
                        } else {
                            format!("copied {} of {} files", outcome.copied, outcome.total)
                        };
                        operator.notify("CopyPayload", &summary, Severity::Info);
                        StepOutcome::Success
                    }
                    Err((kind, detail)) => StepOutcome::Failed { kind, detail },
                }
            }
            STEP_REGISTER_SHORTCUTS => {
                if !self.plan.create_shortcuts {
                    return StepOutcome::Skipped("shortcuts disabled by plan".to_string());
                }
                match steps::register_shortcuts(self.plan, self.platform, self.app_name) {
                    Ok(artifact) => {
                        operator.notify(
                            "RegisterShortcuts",
                            &format!("created {}", artifact.display()),
                            Severity::Info,
                        );
                        StepOutcome::Success
                    }
                    Err((kind, detail)) => {
                        operator.notify("RegisterShortcuts", &detail, Severity::Warning);
                        warnings.push(detail.clone());
                        StepOutcome::Failed { kind, detail }
                    }
                }
            }
            STEP_REGISTER_SERVICE => {
                if !self.plan.install_service {
                    return StepOutcome::Skipped("service install disabled by plan".to_string());
                }
                match steps::register_service(self.plan, self.platform) {
                    Ok(message) => {
                        operator.notify("RegisterService", &message, Severity::Info);
                        StepOutcome::Success
                    }
                    Err((kind, detail)) => {
                        operator.notify("RegisterService", &detail, Severity::Warning);
                        warnings.push(detail.clone());
                        StepOutcome::Failed { kind, detail }
                    }
                }
            }
            STEP_WRITE_UNINSTALL_RECORD => {
                match steps::write_uninstall_record(self.plan, self.app_name, self.app_version) {
                    Ok(()) => StepOutcome::Success,
                    Err((kind, detail)) => StepOutcome::Failed { kind, detail },
                }
            }
            other => StepOutcome::Failed {
                kind: ErrorKind::OtherIoError,
                detail: format!("unknown step {}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentCatalog;
    use crate::manifest::SERVER_WORK_DIR;
    use crate::operator::CancelFlag;
    use crate::record::{RECORD_FILE_NAME, UninstallRecord};
    use std::collections::BTreeSet;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Operator that records progress and can cancel itself once a given
    /// step reports completion.
    struct TestOperator {
        cancel: CancelFlag,
        cancel_after_step: Option<&'static str>,
        progress: Mutex<Vec<(String, f64, String)>>,
    }

    impl TestOperator {
        fn new() -> Self {
            Self {
                cancel: CancelFlag::new(),
                cancel_after_step: None,
                progress: Mutex::new(Vec::new()),
            }
        }

        fn cancelling_after(step: &'static str) -> Self {
            Self {
                cancel_after_step: Some(step),
                ..Self::new()
            }
        }
    }

    impl crate::operator::OperatorChannel for TestOperator {
        fn report_progress(&self, step: &str, fraction: f64, message: &str) {
            if let Some(after) = self.cancel_after_step {
                if step == after && fraction >= 1.0 {
                    self.cancel.cancel();
                }
            }
            self.progress
                .lock()
                .unwrap()
                .push((step.to_string(), fraction, message.to_string()));
        }

        fn is_cancelled(&self) -> bool {
            self.cancel.is_cancelled()
        }

        fn confirm(&self, _question: &str) -> bool {
            true
        }

        fn notify(&self, _title: &str, _message: &str, _severity: Severity) {}
    }

    fn write_payload(root: &Path, skip: &[&str]) {
        for entry in PayloadManifest::all_entries() {
            if skip.contains(&entry.relative_path) {
                continue;
            }
            let path = root.join(entry.relative_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, format!("payload: {}\n", entry.relative_path)).unwrap();
        }
    }

    fn plan_for(install_path: &Path, components: &[&str]) -> InstallPlan {
        let catalog = ComponentCatalog::standard();
        let selection: BTreeSet<String> = components.iter().map(|s| s.to_string()).collect();
        let selection = catalog.normalize(&selection);
        InstallPlan {
            install_path: install_path.to_path_buf(),
            create_shortcuts: selection.contains("shortcuts"),
            install_service: selection.contains("service"),
            components: selection,
            license_accepted: true,
            verbose: false,
        }
    }

    fn pipeline<'a>(
        plan: &'a InstallPlan,
        manifest: &'a PayloadManifest,
    ) -> StepPipeline<'a> {
        StepPipeline::new(
            plan,
            manifest,
            Platform::UnixLike,
            "Minecraft Server Wrapper",
            "1.0.0",
        )
    }

    #[test]
    fn test_full_run_writes_payload_and_record() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());

        assert!(report.succeeded(), "state: {:?}", report.state);
        assert!(install_path.join("server.js").exists());
        assert!(install_path.join("public/index.html").exists());
        assert!(install_path.join(SERVER_WORK_DIR).is_dir());
        assert!(install_path.join(RECORD_FILE_NAME).exists());

        let record = UninstallRecord::load(&install_path).unwrap();
        assert_eq!(record.installed_components, plan.components);
    }

    #[test]
    fn test_rerun_on_same_target_is_idempotent() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let first = pipeline(&plan, &manifest).run(&TestOperator::new());
        let second = pipeline(&plan, &manifest).run(&TestOperator::new());
        assert!(first.succeeded());
        assert!(second.succeeded());
        assert!(install_path.join(RECORD_FILE_NAME).exists());
    }

    #[test]
    fn test_missing_source_file_is_warning_not_failure() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &["setup.js"]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());

        assert!(report.succeeded());
        assert!(report.warnings.iter().any(|w| w.contains("setup.js")));
        // The run still reached the commit marker
        assert!(install_path.join(RECORD_FILE_NAME).exists());
        assert!(install_path.join("server.js").exists());
        assert!(!install_path.join("setup.js").exists());
    }

    #[test]
    fn test_cancel_between_copy_and_shortcuts() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core", "shortcuts"]);
        let manifest = PayloadManifest::new(payload.path());

        let operator = TestOperator::cancelling_after(STEP_COPY_PAYLOAD);
        let report = pipeline(&plan, &manifest).run(&operator);

        assert_eq!(report.state, PipelineState::Cancelled);
        // Already-copied files stay in place, no rollback
        assert!(install_path.join("server.js").exists());
        // The commit marker was never written
        assert!(!install_path.join(RECORD_FILE_NAME).exists());
    }

    #[test]
    fn test_cancel_before_first_step_touches_nothing() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let operator = TestOperator::new();
        operator.cancel.cancel();
        let report = pipeline(&plan, &manifest).run(&operator);

        assert_eq!(report.state, PipelineState::Cancelled);
        assert!(report.results.is_empty());
        assert!(!install_path.exists());
    }

    #[test]
    fn test_shortcut_step_skipped_when_disabled() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let plan = plan_for(&target.path().join("mcwrap"), &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());
        let shortcut_result = report
            .results
            .iter()
            .find(|r| r.step_name == STEP_REGISTER_SHORTCUTS)
            .unwrap();
        assert!(matches!(shortcut_result.outcome, StepOutcome::Skipped(_)));
        assert!(report.succeeded());
    }

    #[test]
    fn test_service_staging_reports_helper_script() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core", "service"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());
        assert!(report.succeeded());
        let service_result = report
            .results
            .iter()
            .find(|r| r.step_name == STEP_REGISTER_SERVICE)
            .unwrap();
        assert_eq!(service_result.outcome, StepOutcome::Success);
        assert!(install_path.join("install-service.sh").exists());
    }

    #[test]
    fn test_missing_service_helper_is_warning_not_fatal() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(
            payload.path(),
            &["install-service.sh", "install-service.bat"],
        );

        let install_path = target.path().join("mcwrap");
        let plan = plan_for(&install_path, &["core", "service"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());
        // Step failed with PartialStepFailure but the run still completed
        assert!(report.succeeded());
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("install-service"))
        );
        assert!(install_path.join(RECORD_FILE_NAME).exists());
    }

    #[test]
    fn test_step_results_follow_fixed_order() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let plan = plan_for(&target.path().join("mcwrap"), &["core"]);
        let manifest = PayloadManifest::new(payload.path());

        let report = pipeline(&plan, &manifest).run(&TestOperator::new());
        let names: Vec<&str> = report.results.iter().map(|r| r.step_name.as_str()).collect();
        assert_eq!(names, STEP_NAMES.to_vec());
    }

    #[test]
    fn test_copy_progress_reports_per_file() {
        let payload = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_payload(payload.path(), &[]);

        let plan = plan_for(&target.path().join("mcwrap"), &["core"]);
        let manifest = PayloadManifest::new(payload.path());
        let expected_files = manifest.entries_for(&plan.components).len();

        let operator = TestOperator::new();
        let report = pipeline(&plan, &manifest).run(&operator);
        assert!(report.succeeded());

        let progress = operator.progress.lock().unwrap();
        let file_events = progress
            .iter()
            .filter(|(step, _, msg)| step == STEP_COPY_PAYLOAD && msg.contains('/') && msg.contains('('))
            .count();
        assert_eq!(file_events, expected_files);
    }
}
