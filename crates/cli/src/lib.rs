//! Admin hub command-line interface
//!
//! Argument definitions live here so they can be parsed in tests; the
//! binary in `main.rs` only wires them to the client.

pub mod commands;
pub mod logging;
pub mod output;

use std::path::PathBuf;

use adminhub_domain::LogFormat;
// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "adminhub")]
#[command(about = "Manage workflows on a workflow-automation service")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level directive, overrides the configured level
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_parser = parse_log_format, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Workflow operations
    Workflows {
        #[command(subcommand)]
        subcommand: WorkflowCommands,
    },
    /// Check connectivity to the service
    Health {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// List workflows
    List {
        /// Only active workflows
        #[arg(long)]
        active: bool,

        /// Maximum number of workflows to return
        #[arg(long, default_value_t = adminhub_domain::constants::DEFAULT_LIST_LIMIT)]
        limit: u32,

        /// Continuation cursor from a previous listing
        #[arg(long)]
        cursor: Option<String>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a workflow definition
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Export a workflow to a backup file
    Export {
        /// Workflow to export (defaults to the configured workflow)
        #[arg(value_name = "ID")]
        id: Option<String>,

        /// Keep raw credential references in the export
        #[arg(long)]
        include_credentials: bool,

        /// Output file (defaults to <backup_directory>/<id>.json)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets masked
    Show,
    /// Check configuration for problems
    Validate {
        /// Create missing directories
        #[arg(long)]
        fix: bool,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|e| e.to_string())
}
