//! Progress spinner for discovery passes.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// A spinner shown while a long scan runs.
pub struct ScanSpinner {
    bar: ProgressBar,
}

impl ScanSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Create a spinner that doesn't show (for quiet modes).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update the spinner message.
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Stop the spinner, leaving a completion line.
    pub fn finish(&self, msg: &str) {
        self.bar.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.bar
            .finish_with_message(format!("{} {}", style("✓").green(), msg));
    }

    /// Stop the spinner without leaving output.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_accepts_updates() {
        let spinner = ScanSpinner::hidden();
        spinner.set_message("scanning");
        spinner.clear();
    }
}
