//! CLI argument parsing for rNGSI-Adapter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--parser` / `-p`: parser plugin to run (env: RNGSI_PARSER)
//! - `--input` / `-i`: read the request body from a file instead of stdin
//! - `--mapping` / `-m`: YAML name mapping table overriding the built-in one
//!   (env: RNGSI_MAPPING)
//! - `--validate`: validate the mapping table without parsing anything
//! - `--list-parsers`: print the known parser names
//! - `--log-level` / `-l`: log level (trace/debug/info/warn/error,
//!   env: RNGSI_LOG_LEVEL)
//! - `--output-format`: output format for parse results (text/json)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to
//! lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Built-in defaults

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// rNGSI-Adapter - NGSI adapter parsers for Monasca and Nagios telemetry
///
/// Runs one parser plugin over a request body and prints the resulting
/// NGSI entity and context attributes.
#[derive(Parser, Debug)]
#[command(name = "rngsi-adapter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Parser plugin to run (see --list-parsers)
    #[arg(short, long, value_name = "NAME", env = "RNGSI_PARSER")]
    pub parser: Option<String>,

    /// Read the request body from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to a YAML name mapping table overriding the built-in one
    #[arg(short, long, value_name = "FILE", env = "RNGSI_MAPPING")]
    pub mapping: Option<PathBuf>,

    /// Validate the mapping table without parsing anything
    #[arg(long)]
    pub validate: bool,

    /// Print the known parser names
    #[arg(long)]
    pub list_parsers: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "RNGSI_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Output format for parse results
    #[arg(long, value_enum, default_value = "text", env = "RNGSI_OUTPUT_FORMAT")]
    pub output_format: OutputFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format options for parse results
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["rngsi-adapter"]);
        assert_eq!(cli.parser, None);
        assert_eq!(cli.input, None);
        assert_eq!(cli.mapping, None);
        assert!(!cli.validate);
        assert!(!cli.list_parsers);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "rngsi-adapter",
            "-p",
            "check_tcp",
            "-i",
            "body.txt",
            "--log-level",
            "debug",
            "--output-format",
            "json",
        ]);
        assert_eq!(cli.parser.as_deref(), Some("check_tcp"));
        assert_eq!(cli.input, Some(PathBuf::from("body.txt")));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_validate_with_mapping() {
        let cli = Cli::parse_from(["rngsi-adapter", "-m", "mapping.yaml", "--validate"]);
        assert_eq!(cli.mapping, Some(PathBuf::from("mapping.yaml")));
        assert!(cli.validate);
    }

    #[test]
    fn test_cli_list_parsers() {
        let cli = Cli::parse_from(["rngsi-adapter", "--list-parsers"]);
        assert!(cli.list_parsers);
    }
}
