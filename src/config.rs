// ⚙️ Configuration - .env file + environment variables
// CLI flags in main.rs override anything loaded here.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cache::CacheCategory;

pub const DEFAULT_CANDIDATES_PATH: &str = "os_congress.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "RepTree.json";
pub const DEFAULT_FALLBACK_CYCLE: &str = "2020";
pub const DEFAULT_CIVIC_BASE_URL: &str = "https://civicinfo.googleapis.com/civicinfo/v2";
pub const DEFAULT_FINANCE_BASE_URL: &str = "https://www.opensecrets.org/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CIVIC_FALLBACK_CYCLE must be a four digit election year, got '{0}'")]
    InvalidCycle(String),
}

/// Top-level configuration for a ledger run
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Key for the address → officials lookup service
    pub civic_api_key: Option<String>,

    /// Key for the campaign-finance service
    pub finance_api_key: Option<String>,

    pub civic_base_url: String,
    pub finance_base_url: String,

    /// Candidate identifier table (CSV, header row first)
    pub candidates_path: PathBuf,

    /// Directory holding the three cache files
    pub cache_dir: PathBuf,

    /// Where the representative tree JSON is written
    pub output_path: PathBuf,

    /// Reporting cycle used for the single finance retry
    pub fallback_cycle: String,

    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            civic_api_key: None,
            finance_api_key: None,
            civic_base_url: DEFAULT_CIVIC_BASE_URL.to_string(),
            finance_base_url: DEFAULT_FINANCE_BASE_URL.to_string(),
            candidates_path: PathBuf::from(DEFAULT_CANDIDATES_PATH),
            cache_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fallback_cycle: DEFAULT_FALLBACK_CYCLE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `.env` (if present) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let fallback_cycle = non_empty("CIVIC_FALLBACK_CYCLE")
            .unwrap_or(defaults.fallback_cycle);
        validate_cycle(&fallback_cycle)?;

        let config = AppConfig {
            civic_api_key: non_empty("CIVIC_API_KEY"),
            finance_api_key: non_empty("FINANCE_API_KEY"),
            civic_base_url: non_empty("CIVIC_BASE_URL").unwrap_or(defaults.civic_base_url),
            finance_base_url: non_empty("FINANCE_BASE_URL").unwrap_or(defaults.finance_base_url),
            candidates_path: non_empty("CIVIC_CANDIDATES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.candidates_path),
            cache_dir: non_empty("CIVIC_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            output_path: non_empty("CIVIC_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            fallback_cycle,
            log_level: non_empty("CIVIC_LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        Ok(config)
    }

    /// Path of the cache file for one category
    pub fn cache_path(&self, category: CacheCategory) -> PathBuf {
        self.cache_dir.join(category.file_name())
    }

    pub fn with_cache_dir(mut self, dir: &Path) -> Self {
        self.cache_dir = dir.to_path_buf();
        self
    }
}

fn validate_cycle(cycle: &str) -> Result<(), ConfigError> {
    if cycle.len() != 4 || !cycle.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidCycle(cycle.to_string()));
    }
    Ok(())
}
