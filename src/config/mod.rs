#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod toml_config;

use crate::core::prober::{
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use directories::BaseDirs;
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DATABASE_FILE_NAME: &str = ".osint_international.db";
pub const RESULTS_DIR_NAME: &str = "osint_results";

/// Fully resolved settings: built-in defaults, then the config file, then
/// command line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub timeout: Duration,
    pub max_in_flight: usize,
    pub max_redirects: usize,
    pub user_agent: String,
    pub database_path: PathBuf,
    pub results_dir: PathBuf,
    pub platforms_file: Option<PathBuf>,
}

fn home_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = home_dir();
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            database_path: home.join(DATABASE_FILE_NAME),
            results_dir: home.join(RESULTS_DIR_NAME),
            platforms_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(file: &TomlConfig) -> Self {
        let mut config = Self::default();
        config.apply_toml(file);
        config
    }

    pub fn apply_toml(&mut self, file: &TomlConfig) {
        if let Some(secs) = file.probe.timeout_seconds {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = file.probe.max_in_flight {
            self.max_in_flight = n;
        }
        if let Some(n) = file.probe.max_redirects {
            self.max_redirects = n;
        }
        if let Some(ua) = &file.probe.user_agent {
            self.user_agent = ua.clone();
        }
        if let Some(path) = &file.probe.platforms_file {
            self.platforms_file = Some(path.clone());
        }
        if let Some(path) = &file.storage.database_path {
            self.database_path = path.clone();
        }
        if let Some(path) = &file.storage.results_dir {
            self.results_dir = path.clone();
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_range("probe.timeout_seconds", self.timeout.as_secs(), 1, 120)?;
        validate_range("probe.max_in_flight", self.max_in_flight, 1, 64)?;
        validate_range("probe.max_redirects", self.max_redirects, 0, 30)?;
        validate_non_empty_string("probe.user_agent", &self.user_agent)?;
        validate_path("storage.database_path", &self.database_path.to_string_lossy())?;
        validate_path("storage.results_dir", &self.results_dir.to_string_lossy())?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn request_timeout(&self) -> Duration {
        self.timeout
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
