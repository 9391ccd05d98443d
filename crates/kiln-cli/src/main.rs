//! Kiln CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use kiln_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Panics render through miette like every other report
    miette::set_panic_hook();

    let args = Args::parse();

    // An unparsable --log-level falls back to warn
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Kiln");
    debug!(args:?; "Parsed arguments");

    // Load and check the build file
    if let Err(err) = kiln_cli::run(&args) {
        let reporter = miette::GraphicalReportHandler::new();

        // One report per located diagnostic
        for reportable in to_reportables(&err) {
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &reportable)
                .expect("Writing to String buffer is infallible");

            error!("{writer}");
        }

        process::exit(1);
    }

    info!("Completed successfully");
}
