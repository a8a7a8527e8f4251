//! Typed application configuration, read once from the environment at startup and
//! passed by reference to whatever needs it.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LISTINGS_URL: &str = "https://api.auto.dev/listings";
pub const DEFAULT_LLM_MODEL: &str = "nvidia/NVIDIA-Nemotron-Nano-9B-v2";
pub const DEFAULT_LLM_API_KEY: &str = "no-key-required";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// `AUTO_DEV_API_KEY`; optional so a missing token degrades to per-call error records.
    pub listings_api_key: Option<String>,
    /// `AUTO_DEV_BASE_URL`
    pub listings_base_url: String,
    /// `AUTO_DEV_TIMEOUT_SECS`
    pub listings_timeout: Duration,
    /// `LLM_BASE_URL`; required for live model calls.
    pub llm_base_url: Option<String>,
    /// `LLM_MODEL`
    pub llm_model: String,
    /// `LLM_API_KEY`
    pub llm_api_key: String,
    /// `CARSCOUT_TOOL_MAX_TOKENS`
    pub tool_max_tokens: u32,
    /// `CARSCOUT_SUMMARY_MAX_TOKENS`
    pub summary_max_tokens: u32,
    /// `CARSCOUT_MAX_STEPS`; `0` in the environment means unbounded.
    pub max_steps: Option<usize>,
    /// `CARSCOUT_TRACE_NODES`; logs enter/exit of every graph node at info level.
    pub trace_nodes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listings_api_key: None,
            listings_base_url: DEFAULT_LISTINGS_URL.to_string(),
            listings_timeout: Duration::from_secs(15),
            llm_base_url: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: DEFAULT_LLM_API_KEY.to_string(),
            tool_max_tokens: 32,
            summary_max_tokens: 4000,
            max_steps: Some(25),
            trace_nodes: false,
        }
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

/// `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`, case-insensitive.
fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

impl AppConfig {
    /// Reads the process environment. Call after [`load_and_apply`](crate::load_and_apply).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.listings_api_key = get("AUTO_DEV_API_KEY");
        if let Some(url) = get("AUTO_DEV_BASE_URL") {
            config.listings_base_url = url;
        }
        if let Some(raw) = get("AUTO_DEV_TIMEOUT_SECS") {
            config.listings_timeout =
                Duration::from_secs(parse_num("AUTO_DEV_TIMEOUT_SECS", raw)?);
        }
        config.llm_base_url = get("LLM_BASE_URL");
        if let Some(model) = get("LLM_MODEL") {
            config.llm_model = model;
        }
        if let Some(key) = get("LLM_API_KEY") {
            config.llm_api_key = key;
        }
        if let Some(raw) = get("CARSCOUT_TOOL_MAX_TOKENS") {
            config.tool_max_tokens = parse_num("CARSCOUT_TOOL_MAX_TOKENS", raw)?;
        }
        if let Some(raw) = get("CARSCOUT_SUMMARY_MAX_TOKENS") {
            config.summary_max_tokens = parse_num("CARSCOUT_SUMMARY_MAX_TOKENS", raw)?;
        }
        if let Some(raw) = get("CARSCOUT_MAX_STEPS") {
            let steps: usize = parse_num("CARSCOUT_MAX_STEPS", raw)?;
            config.max_steps = (steps > 0).then_some(steps);
        }
        if let Some(raw) = get("CARSCOUT_TRACE_NODES") {
            config.trace_nodes = parse_flag("CARSCOUT_TRACE_NODES", raw)?;
        }
        Ok(config)
    }

    /// Model endpoint, or `ConfigError::Missing` when `LLM_BASE_URL` is unset.
    pub fn llm_base_url(&self) -> Result<&str, ConfigError> {
        self.llm_base_url
            .as_deref()
            .ok_or(ConfigError::Missing("LLM_BASE_URL"))
    }

    /// Fail-fast check for strict startup: both the listings token and the model URL must be set.
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        if self.listings_api_key.is_none() {
            return Err(ConfigError::Missing("AUTO_DEV_API_KEY"));
        }
        self.llm_base_url().map(|_| ())
    }
}
