use std::process::ExitCode;

use adminhub_common::privacy::mask_secrets;
use adminhub_domain::AppConfig;
use adminhub_infra::config::validate;
use anyhow::{Context, Result};

use super::{emit, emit_json};
use crate::{output, ConfigCommands};

impl ConfigCommands {
    pub fn run(self, config: &AppConfig) -> Result<ExitCode> {
        match self {
            ConfigCommands::Show => {
                let value = serde_json::to_value(config).context("failed to serialize config")?;
                emit_json(&mask_secrets(&value))?;
                Ok(ExitCode::SUCCESS)
            }
            ConfigCommands::Validate { fix } => {
                let report = validate(config, fix);
                emit(&output::config_report(&report))?;
                Ok(if report.is_valid() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
        }
    }
}
