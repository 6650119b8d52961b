//! Configuración desde variables de entorno (y `.env` si existe).
//!
//! | variable | default |
//! |---|---|
//! | `QUICKSLOT_DATA_DIR` | `data` |
//! | `QUICKSLOT_BIND` | `127.0.0.1:8080` |
//! | `QUICKSLOT_ADMIN_SECRET` | unset (editing disabled) |
//! | `QUICKSLOT_COMMON_POLICY` | `admin` (`admin` or `checker`) |
//! | `QUICKSLOT_SIMILARITY_THRESHOLD` | preset threshold |
//! | `QUICKSLOT_TIME_SLOTS` | `9-10,10-11,...,4-5` |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::algorithm::{AnalysisOptions, CommonSubjectPolicy};

pub const ENV_DATA_DIR: &str = "QUICKSLOT_DATA_DIR";
pub const ENV_BIND: &str = "QUICKSLOT_BIND";
pub const ENV_ADMIN_SECRET: &str = "QUICKSLOT_ADMIN_SECRET";
pub const ENV_COMMON_POLICY: &str = "QUICKSLOT_COMMON_POLICY";
pub const ENV_SIMILARITY_THRESHOLD: &str = "QUICKSLOT_SIMILARITY_THRESHOLD";
pub const ENV_TIME_SLOTS: &str = "QUICKSLOT_TIME_SLOTS";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{var} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { var: &'static str, value: f64 },

    #[error("{var} must list at least one time slot")]
    EmptyTimeSlots { var: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind: String,
    pub admin_secret: Option<String>,
    pub analysis: AnalysisOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind: DEFAULT_BIND.to_string(),
            admin_secret: None,
            analysis: AnalysisOptions::default(),
        }
    }
}

// load .env if present
fn load_dotenv() {
    let _ = dotenv::dotenv();
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = AppConfig::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = get(ENV_BIND) {
            cfg.bind = bind;
        }
        cfg.admin_secret = get(ENV_ADMIN_SECRET);

        if let Some(name) = get(ENV_COMMON_POLICY) {
            cfg.analysis.policy = CommonSubjectPolicy::from_name(&name).ok_or(ConfigError::InvalidValue {
                var: ENV_COMMON_POLICY,
                value: name,
            })?;
        }
        if let Some(raw) = get(ENV_SIMILARITY_THRESHOLD) {
            let threshold: f64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_SIMILARITY_THRESHOLD,
                value: raw.clone(),
            })?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ThresholdOutOfRange {
                    var: ENV_SIMILARITY_THRESHOLD,
                    value: threshold,
                });
            }
            cfg.analysis.policy = cfg.analysis.policy.with_threshold(threshold);
        }
        if let Some(raw) = get(ENV_TIME_SLOTS) {
            let slots: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if slots.is_empty() {
                return Err(ConfigError::EmptyTimeSlots { var: ENV_TIME_SLOTS });
            }
            cfg.analysis.time_slots = slots;
        }

        Ok(cfg)
    }
}
