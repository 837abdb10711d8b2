//! Configuration and settings management
//!
//! Loads settings from configuration files and environment variables and
//! defines the defaults for the Instagram lookup.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Instagram web origin.
pub const DEFAULT_INSTAGRAM_BASE_URL: &str = "https://www.instagram.com";
/// Desktop browser user agent sent with every lookup.
pub const DEFAULT_INSTAGRAM_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36";
/// Public web application id expected in the `X-IG-App-ID` header.
pub const DEFAULT_INSTAGRAM_APP_ID: &str = "936619743392459";
/// Persisted GraphQL document resolving a post by shortcode.
pub const DEFAULT_INSTAGRAM_DOC_ID: &str = "8845758582119845";

/// Builds the layered configuration shared by all settings structs.
///
/// Sources, later ones overriding earlier ones:
/// `config/default`, `config/{RUN_MODE}`, `config/local`, `APP__*` variables
/// and finally the plain environment.
///
/// # Errors
///
/// Returns a `ConfigError` if a present configuration file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps to snake_case; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Settings for the Instagram media lookup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Instagram web origin, without trailing slash.
    #[serde(default = "default_base_url")]
    pub instagram_base_url: String,
    /// User agent for lookup requests.
    #[serde(default = "default_user_agent")]
    pub instagram_user_agent: String,
    /// Value of the `X-IG-App-ID` header.
    #[serde(default = "default_app_id")]
    pub instagram_app_id: String,
    /// GraphQL document id for the shortcode query.
    #[serde(default = "default_doc_id")]
    pub instagram_doc_id: String,
    /// Request timeout in seconds. Unset means requests may block indefinitely.
    #[serde(default)]
    pub instagram_fetch_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_INSTAGRAM_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_INSTAGRAM_USER_AGENT.to_string()
}

fn default_app_id() -> String {
    DEFAULT_INSTAGRAM_APP_ID.to_string()
}

fn default_doc_id() -> String {
    DEFAULT_INSTAGRAM_DOC_ID.to_string()
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            instagram_base_url: default_base_url(),
            instagram_user_agent: default_user_agent(),
            instagram_app_id: default_app_id(),
            instagram_doc_id: default_doc_id(),
            instagram_fetch_timeout_secs: None,
        }
    }
}

impl FetchSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(build_config()?)
    }

    /// Deserialize settings from an already built configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a value has the wrong type.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// Request timeout, if one is configured.
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.instagram_fetch_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// GraphQL query endpoint derived from the base URL.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "{}/graphql/query",
            self.instagram_base_url.trim_end_matches('/')
        )
    }
}
