use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DATABASE_PATH, DEFAULT_LOG_LEVEL, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Runtime settings: built-in defaults, then an optional TOML file, then
/// `WEATHER_*` environment variables.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub database_path: PathBuf,

    #[validate(range(min = 1, max = 5_000))]
    pub batch_size: usize,

    #[validate(length(min = 1))]
    pub log_level: String,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("batch_size", DEFAULT_BATCH_SIZE as u64)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            batch_size: DEFAULT_BATCH_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.batch_size, 1000);
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "database_path = \"/tmp/observations.db\"")?;
        writeln!(file, "batch_size = 250")?;

        let settings = Settings::load(Some(file.path()))?;

        assert_eq!(settings.database_path, PathBuf::from("/tmp/observations.db"));
        assert_eq!(settings.batch_size, 250);
        assert_eq!(settings.log_level, "info");
        Ok(())
    }

    #[test]
    fn test_zero_batch_size_fails_validation() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "batch_size = 0")?;

        let result = Settings::load(Some(file.path()));

        assert!(matches!(result, Err(crate::ProcessingError::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_batch_size_above_insert_limit_fails_validation() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "batch_size = 5001")?;

        let result = Settings::load(Some(file.path()));

        assert!(matches!(result, Err(crate::ProcessingError::Validation(_))));
        Ok(())
    }
}
