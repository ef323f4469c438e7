//! Terminal user interface.
//!
//! One [`Ui`] value carries the terminal handle, output mode, and
//! interactivity flag. Non-interactive construction answers prompts with
//! their defaults, which keeps every flow runnable in tests and scripts.

pub mod output;
pub mod spinner;

pub use output::OutputMode;
pub use spinner::ScanSpinner;

use console::{style, Term};
use dialoguer::{Confirm, Select};

use crate::error::{Result, SweepError};
use crate::inventory::Inventory;

/// Convert dialoguer errors to SweepError.
fn map_dialoguer_err(e: dialoguer::Error) -> SweepError {
    SweepError::Io(e.into())
}

/// Terminal UI handle.
pub struct Ui {
    term: Term,
    mode: OutputMode,
    interactive: bool,
}

impl Ui {
    /// Create a UI for an interactive terminal session.
    pub fn new(mode: OutputMode) -> Self {
        let term = Term::stdout();
        let interactive = term.is_term();
        Self {
            term,
            mode,
            interactive,
        }
    }

    /// Create a UI that never prompts; confirmations return their default.
    pub fn non_interactive(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            mode,
            interactive: false,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Clear the screen between menu rounds.
    pub fn clear_screen(&self) {
        if self.interactive {
            let _ = self.term.clear_screen();
        }
    }

    /// Show a section header.
    pub fn show_header(&self, title: &str) {
        if self.mode.shows_status() {
            println!("{}", style(format!("=== {title} ===")).cyan().bold());
        }
    }

    /// Display a status message.
    pub fn message(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{msg}");
        }
    }

    /// Display a result line (survives quiet mode).
    pub fn result(&self, msg: &str) {
        if self.mode.shows_results() {
            println!("{msg}");
        }
    }

    /// Display a success message.
    pub fn success(&self, msg: &str) {
        if self.mode.shows_results() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    /// Display a warning message.
    pub fn warning(&self, msg: &str) {
        if self.mode.shows_results() {
            println!("{} {}", style("!").yellow().bold(), style(msg).yellow());
        }
    }

    /// Display an error message. Always shown.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(msg).red());
    }

    /// Ask a yes/no question; non-interactive sessions get the default.
    pub fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    /// Present a menu and return the chosen index.
    pub fn select(&self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)
    }

    /// Wait for Enter before returning to the menu.
    pub fn pause(&self) {
        if self.interactive && self.mode.shows_status() {
            println!();
            println!("{}", style("Press Enter to continue...").dim());
            let _ = self.term.read_line();
        }
    }

    /// Start a scan spinner, or a hidden one in quiet modes.
    pub fn spinner(&self, message: &str) -> ScanSpinner {
        if self.interactive && self.mode.shows_spinners() {
            ScanSpinner::new(message)
        } else {
            ScanSpinner::hidden()
        }
    }

    /// Print a numbered inventory listing.
    pub fn print_inventory(&self, inventory: &Inventory) {
        if !self.mode.shows_results() {
            return;
        }
        for (i, installation) in inventory.iter().enumerate() {
            println!("{}. {}", i + 1, installation);
        }
    }
}
