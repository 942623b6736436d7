use std::process::ExitCode;

use adminhub_domain::AppConfig;
use anyhow::Result;

use super::{build_client, emit, emit_json};
use crate::output;

pub(super) async fn run(config: &AppConfig, json: bool) -> Result<ExitCode> {
    let client = build_client(config)?;
    let status = client.session()?.health_check().await;

    if json {
        emit_json(&status)?;
    } else {
        emit(&output::health_report(&status))?;
    }

    Ok(if status.is_healthy() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
