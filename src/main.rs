mod cli;
mod edit;
mod error;
mod launch;
mod menu;
mod model;
mod signal;
mod store;
mod ui;

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::Cli;
use edit::ShellEditors;
use launch::ProgramLauncher;
use menu::Menu;
use model::{Configuration, Outcome};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ui::TerminalPrompter;

fn main() -> ExitCode {
    ExitCode::from(exit_status(run()))
}

/// Status byte for the whole run: errors that reach here exit with 1.
fn exit_status(result: Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    signal::install()?;

    let dir = cli.resolve_dir()?;
    let launcher = ProgramLauncher::new(cli.program.clone(), cli.flag.clone());

    if cli.list {
        for config in store::list_configurations(&dir) {
            println!("{}\t{}", config.name, config.path.display());
        }
        return Ok(0);
    }

    if let Some(name) = &cli.name {
        let config = store::find_configuration(&dir, name)
            .ok_or_else(|| anyhow!("no configuration named '{name}' in {}", dir.display()))?;
        return finish(Outcome::Launch(config), |c| launcher.run(c));
    }

    let mut prompter = TerminalPrompter::new(cli.color_spec.clone());
    let editors = ShellEditors::new(cli.editor.clone());
    let outcome = Menu::new(dir, &mut prompter, &editors).run()?;

    finish(outcome, |c| launcher.run(c))
}

/// Last thing the process does. A launch hands off to `launch` and takes
/// the child's exit code.
fn finish<F>(outcome: Outcome, launch: F) -> Result<u8>
where
    F: FnOnce(&Configuration) -> error::Result<i32>,
{
    match outcome {
        Outcome::Launch(config) => Ok(child_status(launch(&config)?)),
        Outcome::Exit => Ok(0),
        Outcome::Cancelled => {
            println!("Bye!");
            Ok(0)
        }
    }
}

/// Codes outside u8 (Windows) collapse to a generic failure.
fn child_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

fn log_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))
}

fn init_logging(level: &str) -> Result<()> {
    let filter = log_filter(level)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    Ok(())
}
