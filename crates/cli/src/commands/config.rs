use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tripquote_core::config::{AppConfig, LoadOptions};
use tripquote_core::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {}", ApplicationError::from(error)),
                2,
            )
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }

    CommandResult::raw(lines.join("\n"))
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    let workspace = &config.workspace;
    vec![
        ConfigField {
            key_path: "workspace.home_currency",
            env_keys: &["TRIPQUOTE_HOME_CURRENCY"],
            value: workspace.home_currency.clone(),
        },
        ConfigField {
            key_path: "workspace.passenger_count",
            env_keys: &["TRIPQUOTE_DEFAULT_PASSENGER_COUNT"],
            value: workspace.passenger_count.to_string(),
        },
        ConfigField {
            key_path: "workspace.markup_pct",
            env_keys: &["TRIPQUOTE_DEFAULT_MARKUP_PCT"],
            value: workspace.markup_pct.to_string(),
        },
        ConfigField {
            key_path: "workspace.gst_pct",
            env_keys: &["TRIPQUOTE_DEFAULT_GST_PCT"],
            value: workspace.gst_pct.to_string(),
        },
        ConfigField {
            key_path: "workspace.tcs_pct",
            env_keys: &["TRIPQUOTE_DEFAULT_TCS_PCT"],
            value: workspace.tcs_pct.to_string(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["TRIPQUOTE_LOGGING_LEVEL", "TRIPQUOTE_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["TRIPQUOTE_LOGGING_FORMAT", "TRIPQUOTE_LOG_FORMAT"],
            value: config.logging.format.as_str().to_string(),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("tripquote.toml"), PathBuf::from("config/tripquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| is_set(key)) {
        return format!("env ({env_key})");
    }

    let in_file = config_file_doc.is_some_and(|doc| contains_path(doc, key_path));
    if in_file {
        let file_path = config_file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they do not count as a source.
fn is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path
        .split('.')
        .try_fold(root, |current, key| current.get(key))
        .is_some()
}
