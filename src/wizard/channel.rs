//! Operator channel implementation backed by an mpsc channel
//!
//! The worker thread owns the sending half; the wizard's render loop drains
//! the receiving half until the worker drops its sender.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::operator::{CancelFlag, OperatorChannel, Severity};

/// Event emitted by the pipeline worker for the front end to render
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Progress {
        step: String,
        fraction: f64,
        message: String,
    },
    Note {
        severity: Severity,
        message: String,
    },
}

/// Operator channel handed to the worker thread. Prompting is not possible
/// off the main thread, so confirmations were gathered up front and
/// `confirm` always answers yes.
pub struct ChannelOperator {
    events: Sender<ProgressEvent>,
    cancel: CancelFlag,
}

impl ChannelOperator {
    pub fn new() -> (Self, Receiver<ProgressEvent>) {
        let (events, receiver) = mpsc::channel();
        let operator = Self {
            events,
            cancel: CancelFlag::new(),
        };
        (operator, receiver)
    }
}

impl OperatorChannel for ChannelOperator {
    fn report_progress(&self, step: &str, fraction: f64, message: &str) {
        // A closed receiver means the front end went away; nothing useful
        // to do with the event then.
        let _ = self.events.send(ProgressEvent::Progress {
            step: step.to_string(),
            fraction,
            message: message.to_string(),
        });
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn confirm(&self, _question: &str) -> bool {
        true
    }

    fn notify(&self, title: &str, message: &str, severity: Severity) {
        let _ = self.events.send(ProgressEvent::Note {
            severity,
            message: format!("{}: {}", title, message),
        });
    }
}
