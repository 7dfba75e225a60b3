//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for tool responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary with the response body
    #[default]
    Text,
    /// The full response envelope as JSON
    Json,
}

/// CLI arguments for ellen
#[derive(Parser, Debug)]
#[command(name = "ellen")]
#[command(
    author,
    version,
    about = "Ellen - pedagogical tool orchestration with model-tier routing"
)]
#[command(long_about = r#"
Ellen routes tutoring requests to pedagogical tools (Socratic questioning,
formative checks, worked examples, ...), validates them against JSON schema
contracts, enforces the formative-only policy and picks a model tier.

Payloads are given inline as JSON, as @path/to/file.json, or as - for stdin.

Configuration files are loaded from (in priority order):
1. ELLEN_* environment variables
2. --config <path>     Explicit config file
3. ./ellen.toml        Project-level config
4. ~/.config/ellen/config.toml   Global config

Example:
  ellen tools
  ellen invoke formative_check.v1.0 '{"user_response": "F = ma"}'
  ellen route socratic_elenchus.v3.1 @question.json --entitlements @plus.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered tools with their default tier and escalation rule
    Tools,

    /// Run a tool request through the full pipeline
    Invoke {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Caller id; entitlements are looked up for it when not given inline
        #[arg(long, value_name = "ID")]
        user: Option<String>,

        /// Session id recorded in the audit trail
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Show which tier a request would be served at, without calling a model
    Route {
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Check a payload against a tool's schema and the blocked-field policy
    Validate {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Validate against the response schema instead of the request schema
        #[arg(long)]
        response: bool,
    },

    /// Print the default pedagogical loop
    Loop {
        /// Walk the first N steps, resolving alternatives to their first tool
        #[arg(long, value_name = "N")]
        steps: Option<usize>,
    },
}

/// A tool name plus its JSON payload
#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// Versioned tool name, e.g. formative_check.v1.0
    pub tool: String,

    /// JSON payload: inline, @file, or - for stdin
    #[arg(default_value = "{}")]
    pub payload: String,

    /// Entitlements JSON for the caller: inline, @file, or - for stdin
    #[arg(long, value_name = "JSON")]
    pub entitlements: Option<String>,
}
