use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
#[cfg(feature = "clap")]
pub mod overrides;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use overrides::SettingsOverrides;
pub use settings::{DatasetSettings, LoggingSettings, ReportSettings, Settings};
pub use telemetry::init_tracing;

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "orderlens.toml";

/// Prefix for environment overrides, e.g. `ORDERLENS_REPORT__TOP_N=10`.
pub const ENV_PREFIX: &str = "ORDERLENS";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `ORDERLENS_*` environment variables. An explicit `path` must exist; the default
/// `orderlens.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(
        source = %path.map_or_else(|| DEFAULT_CONFIG_FILE.into(), |p| p.display().to_string()),
        dataset = %settings.dataset.path.display(),
        "Configuration loaded."
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DailyBucketPolicy;
    use std::fs;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderlens.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_all_sections() {
        let (_dir, path) = write_config(
            r#"
            [dataset]
            path = "/srv/olist/all_data.json"

            [report]
            top_n = 8
            daily_buckets = "zero_fill"

            [logging]
            level = "analytics=debug"
            directory = "/var/log/orderlens"
            "#,
        );
        let settings = load_config(Some(&path)).unwrap();

        assert_eq!(settings.dataset.path, PathBuf::from("/srv/olist/all_data.json"));
        assert_eq!(settings.report.top_n, 8);
        assert_eq!(settings.report.daily_buckets, DailyBucketPolicy::ZeroFill);
        assert_eq!(settings.logging.level, "analytics=debug");
        assert_eq!(settings.logging.directory, Some(PathBuf::from("/var/log/orderlens")));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let (_dir, path) = write_config("[report]\ntop_n = 3\n");
        let settings = load_config(Some(&path)).unwrap();

        assert_eq!(settings.report.top_n, 3);
        assert_eq!(settings.report.daily_buckets, DailyBucketPolicy::Omit);
        assert_eq!(settings.dataset, DatasetSettings::default());
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn rejects_zero_top_n() {
        let (_dir, path) = write_config("[report]\ntop_n = 0\n");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_unknown_bucket_policy() {
        let (_dir, path) = write_config("[report]\ndaily_buckets = \"interpolate\"\n");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(load_config(Some(&missing)), Err(ConfigError::LoadError(_))));
    }
}
