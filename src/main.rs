//! kiln CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use kiln::cli::{Cli, RunCommand};
use kiln::shell::is_ci;
use kiln::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so they never mix with command output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("kiln=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kiln=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("kiln starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let current_dir = std::env::current_dir().unwrap_or_default();
    let root = match &cli.cwd {
        Some(cwd) => current_dir.join(cwd),
        None => current_dir,
    };

    let is_interactive = !cli.non_interactive && !is_ci();
    let mut ui = create_ui(is_interactive, cli.output_mode());

    let command = RunCommand::new(&cli.config, &root, cli.dry_run);
    match command.execute(ui.as_mut()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&e.to_string());
            ExitCode::from(1)
        }
    }
}
