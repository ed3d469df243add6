// Thu Jan 22 2026 - Alex

use crate::batch::ColumnMapping;
use crate::error::{ConfigError, ConfigurationError};
use crate::validation::{PacketValidator, ProfileTable};
use crate::validation::validator::DEFAULT_PARALLEL_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything an operator can tune without touching code. Missing keys in a
/// config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profiles: ProfileTable,
    pub columns: ColumnMapping,
    pub threads: usize,
    pub parallel: bool,
    pub parallel_threshold: usize,
    pub payload_features: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profiles: ProfileTable::standard(),
            columns: ColumnMapping::default(),
            threads: num_cpus::get(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            payload_features: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(mut self, profiles: ProfileTable) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;

        if let Err(e) = config.validate() {
            log::warn!("Config {:?} has an invalid profile table: {}", path, e);
            return Err(e.into());
        }

        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Only a missing file is silently replaced by defaults; a file that
    /// exists but is broken is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(path)) => {
                log::debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.profiles.validate()
    }

    pub fn build_validator(&self) -> Result<PacketValidator, ConfigurationError> {
        Ok(PacketValidator::new(self.profiles.clone())?
            .use_parallel(self.parallel)
            .with_parallel_threshold(self.parallel_threshold))
    }
}
