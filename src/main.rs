//! airsweep CLI entry point.

use std::process::ExitCode;

use airsweep::cli::{App, Cli, Outcome};
use airsweep::config::SweepConfig;
use airsweep::exec::SystemRunner;
use airsweep::ui::{OutputMode, Ui};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("airsweep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("airsweep=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("airsweep starting with args: {:?}", cli);

    let output = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let config = SweepConfig {
        output,
        assume_yes: cli.yes,
        ..Default::default()
    };

    let ui = Ui::new(output);
    let runner = SystemRunner::new();
    let app = App::new(config, ui, &runner);

    match app.dispatch(&cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::PrivilegeDenied) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
