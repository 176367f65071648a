pub mod calculate;
pub mod config;
pub mod init;
pub mod quote;
pub mod reconcile;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tripquote_core::config::{AppConfig, LoadOptions};
use tripquote_core::{ApplicationError, QuotationWorkspace, WorkspaceSnapshot};

/// Process exit code plus what goes to stdout.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Error,
}

/// Single-line JSON envelope printed for status-style commands.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    command: &'a str,
    status: Status,
    error_class: Option<&'a str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Envelope<'_> {
    fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|error| {
            json!({
                "command": self.command,
                "status": "error",
                "error_class": "serialization",
                "message": error.to_string(),
            })
            .to_string()
        })
    }
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let envelope = Envelope {
            command,
            status: Status::Ok,
            error_class: None,
            message: message.into(),
            details: None,
        };
        Self { exit_code: 0, output: envelope.render() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_details(command, error_class, message, None, exit_code)
    }

    pub fn failure_with_details(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        details: Option<Value>,
        exit_code: u8,
    ) -> Self {
        let envelope = Envelope {
            command,
            status: Status::Error,
            error_class: Some(error_class),
            message: message.into(),
            details,
        };
        Self { exit_code, output: envelope.render() }
    }

    /// Report-style output printed as-is, e.g. pretty JSON or text.
    pub fn raw(output: String) -> Self {
        Self { exit_code: 0, output }
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(command, "config_validation", ApplicationError::from(error).to_string(), 2)
    })
}

pub(crate) fn read_snapshot(path: &Path) -> Result<WorkspaceSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read workspace `{}`", path.display()))?;
    WorkspaceSnapshot::from_json(&raw)
        .with_context(|| format!("could not parse workspace `{}`", path.display()))
}

pub(crate) fn write_snapshot(path: &Path, snapshot: &WorkspaceSnapshot) -> Result<()> {
    let raw = snapshot.to_json_pretty().context("could not serialize workspace")?;
    fs::write(path, raw).with_context(|| format!("could not write workspace `{}`", path.display()))
}

pub(crate) fn open_workspace(
    command: &str,
    config: &AppConfig,
    path: &Path,
) -> Result<QuotationWorkspace, CommandResult> {
    read_snapshot(path)
        .map(|snapshot| {
            QuotationWorkspace::from_snapshot(snapshot, config.workspace.home_currency.clone())
        })
        .map_err(|error| CommandResult::failure(command, "workspace_io", format!("{error:#}"), 1))
}
