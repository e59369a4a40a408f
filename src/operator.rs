//! Operator channel boundary
//!
//! The pipeline never talks to a terminal or a window directly. Both front
//! ends hand it an [`OperatorChannel`]: progress flows one way, the
//! cancellation flag and confirmation answers flow the other. The silent
//! implementation answers from flags and logs instead of prompting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use console::style;

/// Message severity for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Capability set exposed to whichever front end drives the pipeline
pub trait OperatorChannel: Send {
    /// Fire-and-forget progress report; `fraction` is 0..=1 within the step
    fn report_progress(&self, step: &str, fraction: f64, message: &str);

    /// Cooperative cancellation, polled at step and file boundaries
    fn is_cancelled(&self) -> bool;

    /// Ask a yes/no question. Silent implementations auto-answer.
    fn confirm(&self, question: &str) -> bool;

    /// Informational message for the operator
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Shared cooperative cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Operator channel for unattended runs: never prompts, never cancels,
/// narrates to stdout/stderr according to verbosity.
pub struct SilentOperator {
    verbose: bool,
    cancel: CancelFlag,
}

impl SilentOperator {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            cancel: CancelFlag::new(),
        }
    }
}

impl OperatorChannel for SilentOperator {
    fn report_progress(&self, step: &str, _fraction: f64, message: &str) {
        if self.verbose {
            println!("  [{}] {}", step, message);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn confirm(&self, _question: &str) -> bool {
        // No interactive fallback exists in silent mode; everything that
        // needs consent was validated pre-flight.
        true
    }

    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => {
                if self.verbose {
                    println!("{} {}", style(title).bold(), message);
                }
            }
            Severity::Warning => {
                eprintln!("{} {}: {}", style("Warning:").yellow().bold(), title, message);
            }
            Severity::Error => {
                eprintln!("{} {}: {}", style("Error:").red().bold(), title, message);
            }
        }
    }
}
