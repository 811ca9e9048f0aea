use crate::error::ConfigError;
use crate::settings::Settings;
use core_types::DailyBucketPolicy;
use std::path::PathBuf;

/// Command-line flags that take precedence over the file and environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SettingsOverrides {
    /// Path to a JSON array of order records.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Rows shown in the best/worst product and top customer tables.
    #[arg(long)]
    pub top: Option<usize>,

    /// Include days without orders in the daily series.
    #[arg(long)]
    pub zero_fill: bool,

    /// Also write logs to daily-rolling files in this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl SettingsOverrides {
    /// Applies the flags that were given and re-validates the result.
    pub fn apply(&self, mut settings: Settings) -> Result<Settings, ConfigError> {
        if let Some(path) = &self.dataset {
            settings.dataset.path = path.clone();
        }
        if let Some(top) = self.top {
            settings.report.top_n = top;
        }
        if self.zero_fill {
            settings.report.daily_buckets = DailyBucketPolicy::ZeroFill;
        }
        if let Some(directory) = &self.log_dir {
            settings.logging.directory = Some(directory.clone());
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_change_nothing() {
        let settings = SettingsOverrides::default().apply(Settings::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn flags_win_over_settings() {
        let overrides = SettingsOverrides {
            dataset: Some(PathBuf::from("orders-2018.json")),
            top: Some(10),
            zero_fill: true,
            log_dir: None,
        };
        let settings = overrides.apply(Settings::default()).unwrap();
        assert_eq!(settings.dataset.path, PathBuf::from("orders-2018.json"));
        assert_eq!(settings.report.top_n, 10);
        assert_eq!(settings.report.daily_buckets, DailyBucketPolicy::ZeroFill);
    }

    #[test]
    fn zero_top_is_rejected() {
        let overrides = SettingsOverrides {
            top: Some(0),
            ..Default::default()
        };
        assert!(overrides.apply(Settings::default()).is_err());
    }
}
