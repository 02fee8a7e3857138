//! Layered configuration: defaults, then `~/.dq-console/config.yaml`,
//! then `DQ_*` environment variables.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CONFIG_DIR, CONFIG_FILE, DEFAULT_API_DOMAIN, DEFAULT_TIMEOUT_SECS, ENV_PREFIX};
use crate::routes::Route;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),
}

/// Runtime configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is appended to
    pub api_domain: String,
    pub request_timeout_secs: u64,
    /// Skip TLS certificate verification (self-signed staging servers)
    pub accept_invalid_certs: bool,
    /// Route shown after startup, e.g. `/teams/home`
    pub start_route: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: String::from(DEFAULT_API_DOMAIN),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            start_route: Route::Dashboard.path().to_string(),
        }
    }
}

impl Config {
    /// Load from the user config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(default_config_path().as_deref()))
    }

    /// Provider chain, lowest priority first. A missing or empty file is skipped.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = path.filter(|p| has_content(p)) {
            figment = figment.merge(Yaml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Config = figment.extract()?;
        config.api_domain = config.api_domain.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// The configured start route, falling back to the dashboard
    pub fn start_route(&self) -> Route {
        match Route::from_path(&self.start_route) {
            Some(Route::Login) | None => Route::Dashboard,
            Some(route) => route,
        }
    }
}

fn has_content(path: &Path) -> bool {
    path.metadata().is_ok_and(|meta| meta.len() > 0)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}
