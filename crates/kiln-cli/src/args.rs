//! Command-line argument definitions for the Kiln CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the build file and configuration file,
//! define properties, tighten binding and control logging verbosity.

use clap::Parser;

/// Command-line arguments for the Kiln build-file checker
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the build file
    #[arg(help = "Path to the build file", default_value = "default.build")]
    pub build_file: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Define a property, overriding the build file and configuration
    #[arg(short = 'D', value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Reject undeclared attributes and elements instead of warning
    #[arg(long)]
    pub strict: bool,

    /// Print the targets of the build file
    #[arg(long)]
    pub list: bool,
}

/// Parse a `NAME=VALUE` property definition.
fn parse_property(definition: &str) -> Result<(String, String), String> {
    let (name, value) = definition
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found `{definition}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("property name is empty in `{definition}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
