//! Run configuration.
//!
//! `ReportConfig` carries the values the report projections depend on: the
//! fiscal year, the expiration check date, the fiscal-year training list and
//! the "expires soon" horizon. `Config` adds the input and output locations.
//!
//! A config file, when present, lives at `~/.config/trainreport/config.json`
//! (platform equivalent) and may set any subset of fields.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Application name used for the config directory path
const APP_NAME: &str = "trainreport";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_INPUT: &str = "content/trainings.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "content/output";

pub const DEFAULT_FISCAL_YEAR: i32 = 2024;

/// Trainings reported in the fiscal-year report unless configured otherwise
pub const DEFAULT_FISCAL_TRAININGS: [&str; 3] = [
    "Electrical Safety for Labs",
    "X-Ray Safety",
    "Laboratory Safety Training",
];

/// The fiscal-year report always covers this many trainings
pub const FISCAL_TRAINING_COUNT: usize = DEFAULT_FISCAL_TRAININGS.len();

/// Days after the check date during which an expiration counts as "soon"
pub const DEFAULT_EXPIRY_HORIZON_DAYS: i64 = 30;

fn default_check_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub fiscal_year: i32,
    /// Serialized as `YYYY-MM-DD`
    pub check_date: NaiveDate,
    pub fiscal_trainings: Vec<String>,
    pub expiry_horizon_days: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fiscal_year: DEFAULT_FISCAL_YEAR,
            check_date: default_check_date(),
            fiscal_trainings: DEFAULT_FISCAL_TRAININGS.iter().map(|s| s.to_string()).collect(),
            expiry_horizon_days: DEFAULT_EXPIRY_HORIZON_DAYS,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fiscal_trainings.len() != FISCAL_TRAINING_COUNT {
            return Err(ConfigError::TrainingCount {
                expected: FISCAL_TRAINING_COUNT,
                found: self.fiscal_trainings.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.fiscal_trainings {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyTrainingName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateTraining(name.clone()));
            }
        }

        if self.expiry_horizon_days < 0 {
            return Err(ConfigError::NegativeHorizon(self.expiry_horizon_days));
        }

        Ok(())
    }

    /// Whether `training` belongs in the fiscal-year report
    pub fn is_fiscal_training(&self, training: &str) -> bool {
        self.fiscal_trainings.iter().any(|t| t == training)
    }

    /// `None` when the horizon is too large to represent
    pub fn expiry_horizon(&self) -> Option<Duration> {
        Duration::try_days(self.expiry_horizon_days)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub reports: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            reports: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the platform config file
    /// is used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| file_error(e.to_string()))?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let file_error = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| file_error(e.to_string()))?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|e| file_error(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| file_error(e.to_string()))?;
        Ok(())
    }

    /// `~/.config/trainreport/config.json` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reports.validate()
    }
}
