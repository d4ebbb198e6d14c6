use super::{
    mutation::MutationConfig, rink::RinkConfig, training::TrainingConfig, traits::ConfigSection,
};
use crate::error::CoachError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment overrides look like `RINKCOACH_TRAINING__EPISODE_BUDGET=250`
pub const ENV_PREFIX: &str = "RINKCOACH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub training: TrainingConfig,
    pub mutation: MutationConfig,
    pub rink: RinkConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CoachError> {
        self.training.validate()?;
        self.mutation.validate()?;
        self.rink.validate()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a JSON or TOML file (format from the extension) and `RINKCOACH_*`
    /// environment overrides over the defaults.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CoachError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoachError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;
        self.apply(settings.try_deserialize()?)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Defaults plus environment overrides only
    pub fn load_from_env(&mut self) -> Result<(), CoachError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        self.apply(settings.try_deserialize()?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CoachError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| CoachError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| CoachError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn update<F>(&mut self, f: F) -> Result<(), CoachError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        self.apply(candidate)
    }

    fn apply(&mut self, config: AppConfig) -> Result<(), CoachError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
