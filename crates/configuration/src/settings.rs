use crate::error::ConfigError;
use core_types::DailyBucketPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing values fall back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

/// Where the order records come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// A JSON array of order records.
    pub path: PathBuf,
}

/// Contains parameters for the summary tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows shown in the best/worst product and top customer tables.
    pub top_n: usize,
    /// Whether days without orders appear in the daily series.
    pub daily_buckets: DailyBucketPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `analytics=debug`. `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to daily-rolling files in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/orders.json"),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            daily_buckets: DailyBucketPolicy::Omit,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n must be at least 1".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        if self.dataset.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
