//! CLI argument definitions and command dispatch.
//!
//! Invoked with no subcommand, airsweep runs its interactive menu. The
//! subcommands expose the same operations for scripted use; `--yes` stands
//! in for the confirmation prompt there.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::SweepConfig;
use crate::discovery::Discovery;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::inventory::Installation;
use crate::platform::{current_platform, PlatformProbe};
use crate::privilege;
use crate::removal::{edge, Remover};
use crate::runtime::Runtime;
use crate::ui::Ui;
use crate::verify;

/// airsweep - Detect and remove installed Python and Java runtimes.
#[derive(Debug, Parser)]
#[command(name = "airsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect and remove Python installations
    Python,

    /// Detect and remove Java installations
    Java,

    /// Delete Microsoft Edge registry traces (Windows only)
    Edge,

    /// List detected installations without removing anything
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// Restrict to one runtime (default: both)
    #[arg(long, value_enum)]
    pub runtime: Option<RuntimeArg>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Runtime selector for `list`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RuntimeArg {
    Python,
    Java,
}

impl From<RuntimeArg> for Runtime {
    fn from(arg: RuntimeArg) -> Self {
        match arg {
            RuntimeArg::Python => Runtime::Python,
            RuntimeArg::Java => Runtime::Java,
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Final state of a dispatched command, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Normal completion (including "nothing found" and cancelled).
    Done,
    /// Required privileges are missing; exit code 1.
    PrivilegeDenied,
}

/// Wires the selected platform, runner, and UI into each operation.
pub struct App<'a> {
    config: SweepConfig,
    probe: &'static dyn PlatformProbe,
    runner: &'a dyn CommandRunner,
    ui: Ui,
}

impl<'a> App<'a> {
    pub fn new(config: SweepConfig, ui: Ui, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            probe: current_platform(),
            runner,
            ui,
        }
    }

    /// Dispatch a parsed command line.
    pub fn dispatch(&self, cli: &Cli) -> Result<Outcome> {
        match &cli.command {
            Some(Commands::Python) => self.remove_runtime(Runtime::Python),
            Some(Commands::Java) => self.remove_runtime(Runtime::Java),
            Some(Commands::Edge) => self.clean_edge(),
            Some(Commands::List(args)) => self.list(args),
            Some(Commands::Completions(args)) => {
                let mut cmd = Cli::command();
                clap_complete::generate(args.shell, &mut cmd, "airsweep", &mut std::io::stdout());
                Ok(Outcome::Done)
            }
            None => self.menu_loop(),
        }
    }

    /// The interactive menu: loop until Exit or a privilege failure.
    fn menu_loop(&self) -> Result<Outcome> {
        loop {
            self.ui.clear_screen();
            self.ui.show_header("airsweep - developer runtime removal");
            self.ui.message("");

            let mut items = vec!["Uninstall Python", "Uninstall Java"];
            if self.probe.supports_edge_cleanup() {
                items.push("Clean Edge registry traces");
            }
            items.push("Exit");

            let choice = self.ui.select("Select an operation", &items)?;
            let outcome = if items[choice] == "Exit" {
                self.ui.message("Goodbye!");
                return Ok(Outcome::Done);
            } else if items[choice] == "Uninstall Python" {
                self.remove_runtime(Runtime::Python)?
            } else if items[choice] == "Uninstall Java" {
                self.remove_runtime(Runtime::Java)?
            } else {
                self.clean_edge()?
            };

            if outcome == Outcome::PrivilegeDenied {
                return Ok(outcome);
            }
            self.ui.pause();
        }
    }

    /// Discover, confirm, remove, verify — one runtime end to end.
    fn remove_runtime(&self, runtime: Runtime) -> Result<Outcome> {
        self.ui.show_header(&format!("{runtime} removal"));

        if !privilege::ensure_elevated(self.runner, &self.ui) {
            return Ok(Outcome::PrivilegeDenied);
        }

        let discovery = Discovery::new(self.probe, self.runner, &self.config);
        let spinner = self
            .ui
            .spinner(&format!("Scanning for {runtime} installations..."));
        let inventory = discovery.run(runtime);
        spinner.clear();

        if inventory.is_empty() {
            self.ui.result(&format!("No {runtime} installations found"));
            return Ok(Outcome::Done);
        }

        self.ui
            .message(&format!("Found {} installation(s):", inventory.len()));
        self.ui.print_inventory(&inventory);
        self.ui.message("");

        let confirmed = self.config.assume_yes
            || self.ui.confirm(
                &format!(
                    "Remove all {} {runtime} installations listed above?",
                    inventory.len()
                ),
                false,
            )?;
        if !confirmed {
            self.ui.message("Operation cancelled");
            return Ok(Outcome::Done);
        }

        Remover::new(self.probe, self.runner).remove_all(&inventory, runtime, &self.ui);

        if !verify::verify_removal(&discovery, runtime, &self.ui) {
            self.ui
                .message("Check the remaining paths manually and restart your shell");
        }
        Ok(Outcome::Done)
    }

    /// Edge registry-trace cleanup (Windows only).
    fn clean_edge(&self) -> Result<Outcome> {
        if !self.probe.supports_edge_cleanup() {
            self.ui
                .warning("Edge registry cleanup is only available on Windows");
            return Ok(Outcome::Done);
        }

        self.ui.show_header("Edge registry cleanup");
        if !privilege::ensure_elevated(self.runner, &self.ui) {
            return Ok(Outcome::PrivilegeDenied);
        }

        self.ui.warning(
            "This deletes Edge browser registry keys; Edge may reset or need reinstalling.",
        );
        let confirmed = self.config.assume_yes || self.ui.confirm("Continue?", false)?;
        if !confirmed {
            self.ui.message("Operation cancelled");
            return Ok(Outcome::Done);
        }

        let deleted = edge::clean_edge_traces(self.runner, &self.ui);
        self.ui
            .success(&format!("Done; {deleted} registry key(s) deleted"));
        if deleted > 0 {
            self.ui
                .message("Restart the computer for the changes to take effect");
        }
        Ok(Outcome::Done)
    }

    /// Read-only listing of detected installations.
    fn list(&self, args: &ListArgs) -> Result<Outcome> {
        let runtimes: Vec<Runtime> = match args.runtime {
            Some(arg) => vec![arg.into()],
            None => vec![Runtime::Python, Runtime::Java],
        };

        let discovery = Discovery::new(self.probe, self.runner, &self.config);
        let mut found: Vec<Installation> = Vec::new();
        for runtime in runtimes {
            let spinner = self
                .ui
                .spinner(&format!("Scanning for {runtime} installations..."));
            let inventory = discovery.run(runtime);
            spinner.clear();
            found.extend(inventory.iter().cloned());
        }

        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&found).map_err(anyhow::Error::from)?
            );
        } else if found.is_empty() {
            self.ui.result("No installations found");
        } else {
            for (i, installation) in found.iter().enumerate() {
                self.ui.result(&format!("{}. {installation}", i + 1));
            }
        }
        Ok(Outcome::Done)
    }
}
