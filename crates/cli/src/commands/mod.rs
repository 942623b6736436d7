//! Command handlers.

mod config;
mod health;
mod workflows;

use std::io::Write;
use std::process::ExitCode;

use adminhub_domain::AppConfig;
use adminhub_infra::N8nClient;
use anyhow::{Context, Result};

use crate::Commands;

pub use workflows::export_path;

impl Commands {
    /// Run the selected command against `config`.
    pub async fn run(self, config: &AppConfig) -> Result<ExitCode> {
        match self {
            Commands::Workflows { subcommand } => subcommand.run(config).await,
            Commands::Health { json } => health::run(config, json).await,
            Commands::Config { subcommand } => subcommand.run(config),
        }
    }
}

fn build_client(config: &AppConfig) -> Result<N8nClient> {
    let client_config = config.n8n.to_client_config().context("invalid service configuration")?;
    N8nClient::new(client_config).context("failed to create API client")
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).context("failed to write to stdout")?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").context("failed to write to stdout")?;
    }
    Ok(())
}

fn emit_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    emit(&rendered)
}
