//! Reads HTML from stdin, filters its video cards and prints a JSON report.
//!
//! Usage: `filter_stdin [config.json] < page.html`
//!
//! The optional argument is a saved-settings JSON file (`MIN_VIEWS`,
//! `FILTER_MODE`, ...). Logs go to stderr; `RUST_LOG` overrides the level,
//! otherwise `DEBUG: true` in the config selects debug output.

use std::io::{self, Read};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use yt_card_filter::{filter_html, Config, FilterReport};

fn load_config() -> Result<Config, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
            Config::from_json(&json).map_err(|e| format!("{path}: {e}"))
        }
        None => Ok(Config::default()),
    }
}

fn init_logging(config: &Config) {
    let default_level = if config.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        return ExitCode::FAILURE;
    }

    let outcome = match filter_html(&html, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Filtering failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = FilterReport::from(outcome);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to serialize report: {err}");
            ExitCode::FAILURE
        }
    }
}
