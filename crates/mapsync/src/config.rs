use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::console::DEFAULT_DISPATCHER;
use crate::reconcile::ReconcileConfig;

pub const DISPATCHER_ENV_VAR: &str = "MAPSYNC_DISPATCHER";
pub const SETTLE_MS_ENV_VAR: &str = "MAPSYNC_SETTLE_MS";
pub const MARKER_Y_ENV_VAR: &str = "MAPSYNC_MARKER_Y";
pub const DRY_RUN_ENV_VAR: &str = "MAPSYNC_DRY_RUN";

pub const DEFAULT_SETTLE_MS: u64 = 5_000;

const ENV_VARS: [&str; 4] = [
    DISPATCHER_ENV_VAR,
    SETTLE_MS_ENV_VAR,
    MARKER_Y_ENV_VAR,
    DRY_RUN_ENV_VAR,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub dispatcher: String,
    /// Wait after `save-all` before reading map files. The server gives no completion
    /// signal, so a map saved later than this is missed until the next run.
    pub settle_delay: Duration,
    pub reconcile: ReconcileConfig,
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dispatcher: DEFAULT_DISPATCHER.to_string(),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
            reconcile: ReconcileConfig::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("invalid {var} value '{value}' (expected {expected})")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = HashMap::<&'static str, String>::new();
        for var in ENV_VARS {
            match env::var(var) {
                Ok(value) => {
                    values.insert(var, value);
                }
                Err(env::VarError::NotPresent) => {}
                Err(source) => return Err(ConfigError::EnvVar { var, source }),
            }
        }
        Self::from_lookup(|var| values.get(var).cloned())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = SyncConfig::default();

        if let Some(value) = get(DISPATCHER_ENV_VAR) {
            config.dispatcher = value;
        }
        if let Some(value) = get(SETTLE_MS_ENV_VAR) {
            let millis = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: SETTLE_MS_ENV_VAR,
                value: value.clone(),
                expected: "milliseconds as u64",
            })?;
            config.settle_delay = Duration::from_millis(millis);
        }
        if let Some(value) = get(MARKER_Y_ENV_VAR) {
            config.reconcile.marker_y =
                value.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                    var: MARKER_Y_ENV_VAR,
                    value: value.clone(),
                    expected: "an integer",
                })?;
        }
        if let Some(value) = get(DRY_RUN_ENV_VAR) {
            config.dry_run = parse_flag(&value).ok_or(ConfigError::InvalidValue {
                var: DRY_RUN_ENV_VAR,
                value,
                expected: "1/0, true/false, yes/no or on/off",
            })?;
        }
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
