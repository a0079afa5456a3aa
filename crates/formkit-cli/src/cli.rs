//! CLI argument definitions for formkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formkit",
    version,
    about = "formkit - schema-driven validation for storefront forms",
    long_about = "Validate form value documents against the storefront profile schema\n\
                  and inspect identity-provider callback URLs the way the session\n\
                  gate does."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw form values (passwords, tokens) in log output.
    ///
    /// Values are redacted by default; only enable this against data you
    /// are comfortable seeing on disk or in a terminal scrollback.
    #[arg(long = "log-values", global = true)]
    pub log_values: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a JSON document of form values against the profile schema.
    Validate(ValidateArgs),

    /// List the profile schema's fields and rules.
    Fields,

    /// Run an identity-provider redirect URL through the session gate.
    Callback(CallbackArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the JSON file holding the form values.
    #[arg(value_name = "VALUES_JSON")]
    pub values_json: PathBuf,

    /// Emit the validation report as JSON on stdout.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct CallbackArgs {
    /// The full redirect URL, including its fragment or query.
    #[arg(value_name = "URL")]
    pub url: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
