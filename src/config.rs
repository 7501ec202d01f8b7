//! Client configuration from the environment

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://chatbotbackend-1wds.onrender.com";

/// How long the "deleted" notice stays visible unless configured otherwise
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Configuration for the remote store and the engines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that `/content` and `/chat` are joined onto
    pub base_url: String,
    /// Per-request timeout. `None` leaves a hung call outstanding.
    pub request_timeout: Option<Duration>,
    pub notice_duration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = match lookup("HELPDESK_BASE_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    var: "HELPDESK_BASE_URL",
                })
            }
            Some(url) => url.trim().to_string(),
            None => defaults.base_url,
        };

        let request_timeout = lookup("HELPDESK_REQUEST_TIMEOUT_SECS")
            .map(|v| parse_seconds("HELPDESK_REQUEST_TIMEOUT_SECS", &v))
            .transpose()?;

        let notice_duration = lookup("HELPDESK_NOTICE_SECS")
            .map(|v| parse_seconds("HELPDESK_NOTICE_SECS", &v))
            .transpose()?
            .unwrap_or(defaults.notice_duration);

        Ok(Self {
            base_url,
            request_timeout,
            notice_duration,
        })
    }
}

fn parse_seconds(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidSeconds {
            var,
            value: value.to_string(),
        })
}
