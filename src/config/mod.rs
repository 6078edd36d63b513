//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fetch::{FetcherConfig, Source};
use crate::models::{MapCatalog, MapInfo};
use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where the two exports come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Match table export (file path or http(s) URL)
    #[serde(default = "default_matches")]
    pub matches: String,

    /// Tier side table export (file path or http(s) URL)
    #[serde(default = "default_tiers")]
    pub tiers: String,

    /// Append a timestamp parameter to URL sources
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

fn default_matches() -> String {
    "./data/matches.csv".to_string()
}

fn default_tiers() -> String {
    "./data/tiers.csv".to_string()
}

fn default_cache_bust() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            matches: default_matches(),
            tiers: default_tiers(),
            cache_bust: default_cache_bust(),
        }
    }
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Request timeout, e.g. "30s" or "2m"
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_user_agent() -> String {
    concat!("ladder-stats/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(default)]
    pub server: ServerConfig,

    /// Replaces the built-in map catalog when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<Vec<MapInfo>>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match parse_duration(&self.fetch.timeout) {
            Some(d) if !d.is_zero() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Fetch timeout must be a positive duration, got '{}'",
                    self.fetch.timeout
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        self.matches_source()?;
        self.tiers_source()?;

        if let Some(maps) = &self.maps {
            if let Some(bad) = maps.iter().find(|m| m.code.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "Map '{}' has an empty code",
                    bad.name
                )));
            }
        }

        Ok(())
    }

    pub fn matches_source(&self) -> Result<Source, ConfigError> {
        Source::parse(&self.data.matches)
            .map_err(|e| ConfigError::ValidationError(format!("data.matches: {}", e)))
    }

    pub fn tiers_source(&self) -> Result<Source, ConfigError> {
        Source::parse(&self.data.tiers)
            .map_err(|e| ConfigError::ValidationError(format!("data.tiers: {}", e)))
    }

    /// The map catalog, from `[[maps]]` if configured.
    pub fn map_catalog(&self) -> MapCatalog {
        match &self.maps {
            Some(maps) => MapCatalog::new(
                maps.iter()
                    .map(|m| MapInfo::new(&m.code, &m.name))
                    .collect(),
            ),
            None => MapCatalog::default(),
        }
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        let defaults = FetcherConfig::default();
        FetcherConfig {
            timeout: parse_duration(&self.fetch.timeout).unwrap_or(defaults.timeout),
            user_agent: self.fetch.user_agent.clone(),
            cache_bust: self.data.cache_bust,
            ..defaults
        }
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("./ladder-stats.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data.matches, "./data/matches.csv");
        assert!(config.data.cache_bust);
        assert_eq!(config.fetch.timeout, "30s");
        assert_eq!(config.server.port, 8080);
        assert!(config.maps.is_none());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.fetch.timeout = "soon".to_string();
        assert!(config.validate().is_err());

        config.fetch.timeout = "0s".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_source() {
        let mut config = AppConfig::default();
        config.data.matches = "https://".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_fetcher_config_from_settings() {
        let mut config = AppConfig::default();
        config.fetch.timeout = "2m".to_string();
        config.data.cache_bust = false;

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.timeout, Duration::from_secs(120));
        assert!(!fetcher.cache_bust);
    }

    #[test]
    fn test_from_file_with_map_override() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[data]
matches = "https://example.com/export?format=csv"

[server]
port = 3000

[[maps]]
code = "Sylphid"
name = "Sylphid"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.data.tiers, "./data/tiers.csv");
        assert!(matches!(config.matches_source().unwrap(), Source::Url(_)));

        let catalog = config.map_catalog();
        assert_eq!(catalog.name_for("sylphid"), "Sylphid");
        assert_eq!(catalog.name_for("dejavu"), "dejavu");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/ladder.toml")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data.matches, parsed.data.matches);
    }
}
