//! Configuration loader
//!
//! Sources are merged in order, later ones overriding earlier:
//!
//! 1. `AppConfig::default()`
//! 2. a TOML file (explicit path, or the first default location found)
//! 3. environment variables such as `MGW_SERVER__PORT` or
//!    `MGW_RATE_LIMIT__MAX_REQUESTS` (`__` separates nesting levels)

use crate::config::{AppConfig, VersionMode};
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mgw_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_NESTING),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate every configuration section
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(config)?;
    validate_security_config(config)?;
    validate_rate_limit_config(config)?;
    validate_session_config(config)?;
    validate_auth_config(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_server_config(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(Error::configuration("Server port cannot be 0"));
    }
    if config.server.body_limit_bytes == 0 {
        return Err(Error::configuration("Request body limit cannot be 0"));
    }
    Ok(())
}

fn validate_security_config(config: &AppConfig) -> Result<()> {
    if config.security.version_mode == VersionMode::Strict
        && config.security.supported_versions.is_empty()
    {
        return Err(Error::configuration(
            "Strict version mode needs at least one supported protocol version",
        ));
    }
    Ok(())
}

fn validate_rate_limit_config(config: &AppConfig) -> Result<()> {
    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            return Err(Error::configuration(
                "Rate limit max_requests cannot be 0 when rate limiting is enabled",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            return Err(Error::configuration(
                "Rate limit window cannot be 0 when rate limiting is enabled",
            ));
        }
    }
    Ok(())
}

fn validate_session_config(config: &AppConfig) -> Result<()> {
    let session = &config.session;
    if session.heartbeat_interval_secs == 0 {
        return Err(Error::configuration("Session heartbeat interval cannot be 0"));
    }
    if session.idle_timeout_secs == 0 {
        return Err(Error::configuration("Session idle timeout cannot be 0"));
    }
    if session.sweep_interval_secs == 0 {
        return Err(Error::configuration("Session sweep interval cannot be 0"));
    }
    Ok(())
}

fn validate_auth_config(config: &AppConfig) -> Result<()> {
    if config.auth.enabled {
        if config.auth.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::configuration(
                "API key cannot be empty when authentication is enabled",
            ));
        }
        if config.auth.header.trim().is_empty() {
            return Err(Error::configuration("Auth header name cannot be empty"));
        }
    }
    Ok(())
}
