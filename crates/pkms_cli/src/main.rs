//! `pkms` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the record store.
//! - Map handled failures to exit code 2.

use clap::{CommandFactory, Parser};
use log::error;
use pkms_core::{default_log_level, init_logging, RecordStore, StoreConfig};
use std::process::ExitCode;

mod cli;
mod commands;
mod render;

use cli::Cli;

const EXIT_NO_COMMAND: u8 = 1;
const EXIT_HANDLED_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        if let Err(err) = Cli::command().print_help() {
            eprintln!("Error: {err}");
            return ExitCode::from(EXIT_HANDLED_ERROR);
        }
        return ExitCode::from(EXIT_NO_COMMAND);
    };

    let config = StoreConfig::resolve(cli.data_dir.as_deref());
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, config.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = RecordStore::open(config)
        .map_err(commands::CliError::from)
        .and_then(|store| commands::run(command, &store));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command_failed module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::from(EXIT_HANDLED_ERROR)
        }
    }
}
