//! Layered runtime configuration: built-in defaults, then `tripquote.toml`, then
//! `TRIPQUOTE_*` environment variables, then programmatic overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::numeric::parse_decimal;

const CONFIG_FILE_CANDIDATES: [&str; 2] = ["tripquote.toml", "config/tripquote.toml"];

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub workspace: WorkspaceDefaults,
    pub logging: LoggingConfig,
}

/// Values a freshly opened quotation workspace starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceDefaults {
    pub home_currency: String,
    pub passenger_count: u32,
    pub markup_pct: Decimal,
    pub gst_pct: Decimal,
    pub tcs_pct: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Programmatic values that win over every other source.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub home_currency: Option<String>,
    pub passenger_count: Option<u32>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Explicit file; when unset the working directory candidates are searched.
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("`{path}` is not valid TOML: {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
    #[error("config file `{0}` does not exist")]
    FileNotFound(PathBuf),
    #[error("`${{{var}}}` is referenced in the config file but not set")]
    UnsetVariable { var: String },
    #[error("`${{` placeholder is never closed")]
    UnclosedPlaceholder,
    #[error("`{key}={value}` is not usable: {reason}")]
    BadEnvValue { key: String, value: String, reason: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for WorkspaceDefaults {
    fn default() -> Self {
        Self {
            home_currency: "INR".to_string(),
            passenger_count: 2,
            markup_pct: Decimal::from(10),
            gst_pct: Decimal::from(5),
            tcs_pct: Decimal::from(5),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        [Self::Compact, Self::Pretty, Self::Json]
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| format!("expected compact, pretty or json, got `{raw}`"))
    }
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match locate_file(options.config_path.as_deref()) {
            Some(path) => FileLayer::read(&path)?.merge_into(&mut config),
            None if options.require_file => {
                let expected = options
                    .config_path
                    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
                return Err(ConfigError::FileNotFound(expected));
            }
            None => {}
        }

        for binding in ENV_BINDINGS {
            binding.apply(&mut config)?;
        }
        options.overrides.merge_into(&mut config);

        config.workspace.home_currency = config.workspace.home_currency.trim().to_ascii_uppercase();
        config.logging.level = config.logging.level.trim().to_ascii_lowercase();
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let currency = &self.workspace.home_currency;
        let is_iso_code = currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_alphabetic());
        if !is_iso_code {
            return Err(ConfigError::Invalid(format!(
                "workspace.home_currency must be a 3-letter ISO code, got `{currency}`"
            )));
        }

        let percentages = [
            ("workspace.markup_pct", self.workspace.markup_pct),
            ("workspace.gst_pct", self.workspace.gst_pct),
            ("workspace.tcs_pct", self.workspace.tcs_pct),
        ];
        if let Some((key, value)) = percentages
            .iter()
            .find(|(_, value)| value.is_sign_negative() || *value > Decimal::ONE_HUNDRED)
        {
            return Err(ConfigError::Invalid(format!("{key} must be within 0..=100, got {value}")));
        }

        if !matches!(self.logging.level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::Invalid(format!(
                "logging.level `{}` is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        Ok(())
    }
}

impl ConfigOverrides {
    fn merge_into(self, config: &mut AppConfig) {
        replace(&mut config.workspace.home_currency, self.home_currency);
        replace(&mut config.workspace.passenger_count, self.passenger_count);
        replace(&mut config.logging.level, self.log_level);
        replace(&mut config.logging.format, self.log_format);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn locate_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).find(|path| path.exists()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileLayer {
    workspace: WorkspaceSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorkspaceSection {
    home_currency: Option<String>,
    passenger_count: Option<u32>,
    markup_pct: Option<Decimal>,
    gst_pct: Option<Decimal>,
    tcs_pct: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl FileLayer {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&expand_placeholders(&raw)?)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    }

    fn merge_into(self, config: &mut AppConfig) {
        let workspace = &mut config.workspace;
        replace(&mut workspace.home_currency, self.workspace.home_currency);
        replace(&mut workspace.passenger_count, self.workspace.passenger_count);
        replace(&mut workspace.markup_pct, self.workspace.markup_pct);
        replace(&mut workspace.gst_pct, self.workspace.gst_pct);
        replace(&mut workspace.tcs_pct, self.workspace.tcs_pct);
        replace(&mut config.logging.level, self.logging.level);
        replace(&mut config.logging.format, self.logging.format);
    }
}

/// Substitutes every `${NAME}` with the value of the environment variable `NAME`.
fn expand_placeholders(raw: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some((before, after)) = rest.split_once("${") {
        let (name, tail) = after.split_once('}').ok_or(ConfigError::UnclosedPlaceholder)?;
        let value =
            env::var(name).map_err(|_| ConfigError::UnsetVariable { var: name.to_string() })?;
        expanded.push_str(before);
        expanded.push_str(&value);
        rest = tail;
    }
    expanded.push_str(rest);

    Ok(expanded)
}

type EnvSetter = fn(&mut AppConfig, &str) -> Result<(), String>;

/// One config field settable from the environment; the first alias that is set wins.
struct EnvBinding {
    aliases: &'static [&'static str],
    set: EnvSetter,
}

const ENV_BINDINGS: &[EnvBinding] = &[
    EnvBinding {
        aliases: &["TRIPQUOTE_HOME_CURRENCY"],
        set: |config, raw| {
            config.workspace.home_currency = raw.to_string();
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_DEFAULT_PASSENGER_COUNT"],
        set: |config, raw| {
            config.workspace.passenger_count =
                raw.trim().parse().map_err(|_| "expected a whole passenger count".to_string())?;
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_DEFAULT_MARKUP_PCT"],
        set: |config, raw| {
            config.workspace.markup_pct = percentage(raw)?;
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_DEFAULT_GST_PCT"],
        set: |config, raw| {
            config.workspace.gst_pct = percentage(raw)?;
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_DEFAULT_TCS_PCT"],
        set: |config, raw| {
            config.workspace.tcs_pct = percentage(raw)?;
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_LOGGING_LEVEL", "TRIPQUOTE_LOG_LEVEL"],
        set: |config, raw| {
            config.logging.level = raw.to_string();
            Ok(())
        },
    },
    EnvBinding {
        aliases: &["TRIPQUOTE_LOGGING_FORMAT", "TRIPQUOTE_LOG_FORMAT"],
        set: |config, raw| {
            config.logging.format = raw.parse()?;
            Ok(())
        },
    },
];

impl EnvBinding {
    fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        let found = self.aliases.iter().find_map(|key| {
            env::var(key).ok().filter(|value| !value.trim().is_empty()).map(|value| (*key, value))
        });
        let Some((key, value)) = found else {
            return Ok(());
        };

        (self.set)(config, &value).map_err(|reason| ConfigError::BadEnvValue {
            key: key.to_string(),
            value,
            reason,
        })
    }
}

fn percentage(raw: &str) -> Result<Decimal, String> {
    parse_decimal(raw).ok_or_else(|| "expected a percentage such as 5 or 12.5".to_string())
}
