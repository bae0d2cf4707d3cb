//! Operator probe for `wareomofu_core`.
//!
//! # Responsibility
//! - Load configuration from the environment and start file logging.
//! - Open the read database (replica when configured) and print the theme
//!   page summary and the report-reason catalog.

use chrono::Utc;
use log::error;
use std::process::ExitCode;
use wareomofu_core::query::ThemeFilter;
use wareomofu_core::repo::{ReportRepository, ThemeRepository};
use wareomofu_core::{init_logging, open_db, open_db_read_only, Config, Pagination, SqliteStore};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error");
            eprintln!("wareomofu: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = Config::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    println!("wareomofu_core ping={}", wareomofu_core::ping());
    println!("wareomofu_core version={}", wareomofu_core::core_version());

    // The primary open migrates, so it must happen even when reads go to a replica.
    let primary = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let replica = match &config.replica_db_path {
        Some(path) => Some(open_db_read_only(path).map_err(|err| err.to_string())?),
        None => None,
    };
    let store = SqliteStore::try_new(replica.as_ref().unwrap_or(&primary))
        .map_err(|err| err.to_string())?;

    let count = store
        .count_themes(&ThemeFilter::default(), Utc::now())
        .map_err(|err| err.to_string())?;
    let summary = Pagination::default().summarize(count);
    println!("themes count={} pages={}", summary.count, summary.max_page());

    let reasons = store.list_report_reasons().map_err(|err| err.to_string())?;
    for reason in reasons {
        println!("report_reason id={} reason={}", reason.id, reason.reason);
    }
    Ok(())
}
