mod cli;
mod commands;
mod config;
mod focus;
mod logging;
mod terminal;
mod timer;
mod ui;

use std::process::ExitCode;

use booklog_adapters::{ConsoleNotifier, SqliteLocalStorage, SystemClock, UuidIdGenerator};
use booklog_application::{ApplicationService, BootstrapCommand};
use clap::Parser;

use cli::Cli;
use commands::{run_command, CommandError};
use config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    };
    if let Some(storage) = cli.storage.clone() {
        config.storage_path = storage;
    }
    logging::init_logging(&config.log_filter);
    tracing::debug!(storage = %config.storage_path.display(), "starting booklog");

    let mut service = build_application_service(&config);
    if let Err(error) = service.bootstrap(BootstrapCommand) {
        eprintln!("failed to load reading data: {error}");
        return ExitCode::from(1);
    }

    match run_command(cli.command, &mut service, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    ApplicationService::new(
        Box::new(SqliteLocalStorage::new(config.storage_path.clone())),
        Box::new(SystemClock),
        Box::new(UuidIdGenerator),
        Box::new(ConsoleNotifier::stdout(config.notification_permission)),
    )
}
