mod assistant;
mod cli;
mod commands;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::assistant::Assistant;
use crate::cli::Command;

const DEFAULT_LOG_DIRECTIVE: &str = "riq=info";

/// Load environment variables from `.env` in the working directory.
/// Variables already set in the environment win.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

/// `KEY=VALUE` pairs, skipping blanks and `#` comments. Surrounding
/// quotes are stripped from values.
fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim(), value)
        })
        .collect()
}

fn init_logging(directive: &str) {
    let directive: Directive = directive.parse().unwrap_or_else(|_| {
        eprintln!("Invalid log filter {directive:?}, using {DEFAULT_LOG_DIRECTIVE}");
        DEFAULT_LOG_DIRECTIVE
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into())
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // Before the runtime spawns worker threads.
    load_dotenv();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(cli::parse()))
}

async fn run(args: cli::Args) -> ExitCode {
    let config = riq_config::load_config(args.config.as_deref());

    let directive = match (&args.log_level, &config) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.directive().to_string(),
        (None, Err(_)) => DEFAULT_LOG_DIRECTIVE.to_string(),
    };
    init_logging(&directive);

    tracing::info!("RestaurantIQ v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let assistant = match Assistant::from_env(&config) {
        Ok(assistant) => assistant,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(model = %config.model.model, "Assistant ready");

    match args.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat(&assistant).await,
        Command::Ask { text } => commands::ask(&assistant, &text.join(" ")).await,
        Command::RegenerateForecasts {
            days_ahead,
            reference_date,
        } => commands::regenerate_forecasts(&assistant, days_ahead, reference_date).await,
        Command::Forecast { days_ahead } => commands::forecast(&assistant, days_ahead).await,
    }
}
