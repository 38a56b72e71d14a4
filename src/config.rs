//! Configuration parsing for specsync
//!
//! Handles the TOML configuration file that names the target workspace and
//! where the API key and the list of specification URLs live. The older
//! JSON `config.json` layout with upper-case keys is accepted as well.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "specsync.toml";

/// Legacy JSON configuration file name
pub const LEGACY_CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_API_KEY_FILE: &str = ".postman_api_key";
pub const DEFAULT_URLS_FILE: &str = "swagger_urls.txt";
pub const DEFAULT_COLLECTION_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";
pub const DEFAULT_API_BASE_URL: &str = "https://api.getpostman.com";
pub const DEFAULT_WEB_BASE_URL: &str = "https://web.postman.co";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name of the Postman workspace to create or reuse
    #[serde(alias = "WORKSPACE_NAME")]
    pub workspace_name: String,

    /// Description used when the workspace has to be created
    #[serde(default, alias = "WORKSPACE_DESCRIPTION")]
    pub workspace_description: String,

    /// File holding the Postman API key (relative to the config file)
    #[serde(default = "default_api_key_file", alias = "POSTMAN_API_KEY_FILE")]
    pub api_key_file: PathBuf,

    /// File listing one specification URL per line (relative to the config file)
    #[serde(default = "default_urls_file", alias = "SWAGGER_URLS_FILE")]
    pub urls_file: PathBuf,

    /// Schema tag written into every synchronized collection
    #[serde(default = "default_collection_schema", alias = "POSTMAN_COLLECTION_SCHEMA")]
    pub collection_schema: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Per-request timeout in seconds; 0 waits forever
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_API_KEY_FILE)
}

fn default_urls_file() -> PathBuf {
    PathBuf::from(DEFAULT_URLS_FILE)
}

fn default_collection_schema() -> String {
    DEFAULT_COLLECTION_SCHEMA.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_web_base_url() -> String {
    DEFAULT_WEB_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from a file
    ///
    /// Files ending in `.json` are read as the legacy JSON layout, anything
    /// else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let config: Config = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace_name.trim().is_empty() {
            return Err(ConfigError::EmptyWorkspaceName);
        }
        Ok(())
    }

    /// Find configuration file by searching up from the start directory
    pub fn find_config(start_dir: &Path) -> Result<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }

            let legacy_path = current.join(LEGACY_CONFIG_FILE_NAME);
            if legacy_path.exists() {
                return Ok(legacy_path);
            }

            if !current.pop() {
                anyhow::bail!(
                    "Could not find {} or {} in {} or any parent directory",
                    CONFIG_FILE_NAME,
                    LEGACY_CONFIG_FILE_NAME,
                    start_dir.display()
                );
            }
        }
    }

    /// Location of the API key file
    pub fn api_key_path(&self, config_path: &Path) -> PathBuf {
        resolve_relative(config_path, &self.api_key_file)
    }

    /// Location of the specification URL list
    pub fn urls_path(&self, config_path: &Path) -> PathBuf {
        resolve_relative(config_path, &self.urls_file)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Browser link to a workspace
    pub fn workspace_link(&self, workspace_id: &str) -> String {
        format!(
            "{}/workspace/{}",
            self.web_base_url.trim_end_matches('/'),
            workspace_id
        )
    }
}

fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let config_dir = config_path.parent().unwrap_or(config_path);
    config_dir.join(path)
}
