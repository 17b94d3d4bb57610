//! Config module contains the top-level config for the app.
use std::env;

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

use crate::models::Locale;

/// Basic settings - storefront API address, panel locale, logging
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: Api,
    pub panel: Panel,
    pub logging: Logging,
}

/// Storefront comments API settings
#[derive(Debug, Deserialize, Clone)]
pub struct Api {
    pub url: String,
    pub token: Option<String>,
    pub thread_count: usize,
    pub timeout_s: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Panel {
    pub locale: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Logging {
    pub level: String,
}

impl Config {
    /// Creates config from base.toml, which are overwritten by <env>.toml, where env is one of
    /// development, test, production. After that it could be overwritten by env variables like
    /// COMMENTS_API__URL (this will override `api.url` field in config).
    pub fn new() -> Result<Self, ConfigError> {
        // Optional file specific for environment
        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Config::with_env(env)
    }

    pub fn with_env(env: impl Into<String>) -> Result<Self, ConfigError> {
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;
        s.merge(File::with_name(&format!("config/{}", env.into())).required(false))?;
        s.merge(Environment::with_prefix("COMMENTS").separator("__"))?;
        s.try_into()
    }

    /// Panel locale, falls back to persian when the configured code is unknown
    pub fn locale(&self) -> Locale {
        self.panel.locale.parse().unwrap_or_else(|_| {
            warn!("Unsupported panel locale '{}', falling back to persian.", self.panel.locale);
            Locale::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_config() {
        let config = Config::with_env("test").unwrap();
        assert_eq!(config.panel.locale, "fa");
        assert_eq!(config.locale(), Locale::Persian);
        assert!(config.api.thread_count > 0);
    }
}
