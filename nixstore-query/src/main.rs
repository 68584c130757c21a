// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

mod cli;

use std::process::ExitCode;

use clap::Parser;
use libnixstore::{Error, Store};
use log::debug;
use nixstore_engine::Settings;

use crate::cli::{Cli, Command};

fn run(cli: &Cli) -> Result<String, Error> {
    let settings = Settings::load().map_err(|e| Error::GenericNixError(e.to_string()))?;
    libnixstore::initialize_with(cli.apply(settings));
    let store = Store::new()?;

    match &cli.command {
        Command::Version => store.version(),
        Command::Path { path } => {
            let path = store.parse_store_path(path)?;
            Ok(store.store_relative_path(&path))
        }
        Command::DrvName { path } => {
            let path = store.parse_store_path(path)?;
            store.derivation_name(&path)
        }
        Command::Env { path, key } => {
            let path = store.parse_store_path(path)?;
            store.derivation_env_val(&path, key)
        }
        Command::Info { path } => {
            let path = store.parse_store_path(path)?;
            serde_json::to_string_pretty(path.info())
                .map_err(|e| Error::GenericNixError(e.to_string()))
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("{cli:?}");

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) if cli.wire_errors => {
            eprintln!("{}", err.to_wire());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
