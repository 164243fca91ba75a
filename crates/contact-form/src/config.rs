// File: src/config.rs
// Purpose: Configuration parsing from contact-form.toml

use crate::schema::ValidationSchema;
use crate::suggestions::DEFAULT_LOOKUP_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "contact-form.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Form behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Show the country autosuggest and require a country (default: true)
    #[serde(default = "default_true")]
    pub require_country: bool,

    /// Artificial delay before a submit completes
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

/// Country lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_submit_delay_ms() -> u64 {
    500
}

fn default_base_url() -> String {
    DEFAULT_LOOKUP_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_suggestions() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            require_country: true,
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl FormConfig {
    pub fn schema(&self) -> ValidationSchema {
        if self.require_country {
            ValidationSchema::with_country()
        } else {
            ValidationSchema::new()
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./contact-form.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
        assert!(config.form.require_country);
        assert_eq!(config.form.submit_delay(), Duration::from_millis(500));
        assert_eq!(config.lookup.base_url, DEFAULT_LOOKUP_URL);
        assert_eq!(config.lookup.max_suggestions, 10);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.lookup.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [form]
            require_country = false

            [lookup]
            base_url = "http://localhost:9000/v2"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.form.schema().requires_country());
        assert_eq!(config.form.submit_delay_ms, 500);
        assert_eq!(config.lookup.base_url, "http://localhost:9000/v2");
        assert_eq!(config.lookup.max_suggestions, 10);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load("does-not-exist/contact-form.toml").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = std::env::temp_dir().join("contact-form-invalid-config.toml");
        fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));

        let _ = fs::remove_file(&path);
    }
}
