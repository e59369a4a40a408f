//! Progress bar display for the interactive front end

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::STEP_NAMES;

/// Progress display for an interactive installation run
pub struct ProgressDisplay {
    /// One bar across the whole step sequence
    step_pb: ProgressBar,
}

impl ProgressDisplay {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let step_pb = ProgressBar::new(STEP_NAMES.len() as u64);
        step_pb.set_style(style);

        Self { step_pb }
    }

    /// Show the step currently executing
    pub fn update_step(&self, step_name: &str, message: &str) {
        let display_message = if message.len() > 50 {
            format!("...{}", &message[message.len() - 47..])
        } else {
            message.to_string()
        };
        self.step_pb
            .set_message(format!("{}: {}", step_name, display_message));
    }

    /// A step finished; advance the bar
    pub fn step_done(&self) {
        self.step_pb.inc(1);
    }

    /// Print a line above the bar without disturbing it
    pub fn note(&self, message: &str) {
        self.step_pb.println(message);
    }

    pub fn finish(&self) {
        self.step_pb.finish_with_message("installation complete");
    }

    /// Abandon on error or cancellation
    pub fn abandon(&self, message: &str) {
        self.step_pb.abandon_with_message(message.to_string());
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}
