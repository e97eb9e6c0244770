use super::{
    evolution::EvolutionConfig,
    flight::{FlightConstraints, ScenarioConfig, SolverOptions},
    rocket::RocketConstraints,
    traits::ConfigSection,
};
use crate::error::TrajectoryError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `MISSILE__EVOLUTION__MAX_GENERATIONS=40`.
pub const ENV_PREFIX: &str = "MISSILE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub rocket: RocketConstraints,
    pub flight: FlightConstraints,
    pub solver: SolverOptions,
    pub scenario: ScenarioConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        self.evolution.validate()?;
        self.rocket.validate()?;
        self.flight.validate()?;
        self.solver.validate()?;
        self.scenario.validate()?;
        Ok(())
    }

    /// Read a TOML file layered with `MISSILE__*` environment overrides.
    /// Missing keys fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrajectoryError> {
        let config = AppConfig::load(path)?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrajectoryError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| TrajectoryError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, TrajectoryError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| TrajectoryError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), TrajectoryError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, TrajectoryError> {
        self.config
            .write()
            .map_err(|_| TrajectoryError::Configuration("Config lock poisoned".to_string()))
    }
}
