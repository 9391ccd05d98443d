//! CLI logic for the Kiln build-file checker.
//!
//! This module loads a build file the way a build run would, reports every
//! warning, and optionally lists the targets it declares.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::{info, warn};

use kiln::{KilnError, LoadedProject, ProjectLoader};

use error_adapter::warnings_to_reportables;

/// Run the Kiln CLI application
///
/// This function loads the configuration, applies the command-line
/// overrides, then loads and binds the build file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `KilnError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed build files
/// - Binding errors
pub fn run(args: &Args) -> Result<(), KilnError> {
    info!(build_file = args.build_file; "Checking build file");

    let mut app_config = config::load_config(args.config.as_ref())?;
    for (name, value) in &args.properties {
        app_config = app_config.with_property(name, value);
    }
    if args.strict {
        app_config = app_config.strict();
    }

    let loader = ProjectLoader::new(app_config);
    let loaded = loader.load_file(&args.build_file)?;

    report_warnings(&loaded);

    if args.list {
        print!("{}", format_targets(&loaded));
    }

    info!(
        targets = loaded.targets().len(),
        warnings = loaded.warnings().len();
        "Build file is valid"
    );

    Ok(())
}

fn report_warnings(loaded: &LoadedProject) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in warnings_to_reportables(loaded.warnings(), loaded.project().source()) {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &reportable).is_ok() {
            warn!("{writer}");
        }
    }
}

/// Targets with their descriptions, the default one marked with `*`.
pub fn format_targets(loaded: &LoadedProject) -> String {
    let default = loaded.element().default_target();
    let width = loaded.targets().keys().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (name, target) in loaded.targets() {
        let marker = if Some(name.as_str()) == default { '*' } else { ' ' };
        let description = target.description().unwrap_or_default();
        let line = format!("{marker} {name:width$}  {description}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
