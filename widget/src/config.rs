//! Widget configuration.
//!
//! Defaults match a local development backend. `from_env` overlays
//! `STOREFRONT_*` environment variables on the defaults.

use reqwest::Url;
use thiserror::Error;

/// Environment variable for [`WidgetConfig::api_url`]
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
/// Environment variable for [`WidgetConfig::cdn_url`]
pub const ENV_CDN_URL: &str = "STOREFRONT_CDN_URL";
/// Environment variable for [`WidgetConfig::address_min_chars`]
pub const ENV_ADDRESS_MIN_CHARS: &str = "STOREFRONT_ADDRESS_MIN_CHARS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A URL setting is not an absolute http(s) URL
    #[error("{key} is not an absolute http(s) URL: {value}")]
    InvalidUrl {
        /// Setting name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// A numeric setting did not parse
    #[error("{key} is not a number: {value}")]
    InvalidNumber {
        /// Setting name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// A setting is out of range
    #[error("invalid {key}: {reason}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// What is wrong
        reason: String,
    },
}

/// Storefront widget settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Backend API base URL
    pub api_url: String,
    /// Base URL prefixed to product image paths
    pub cdn_url: String,
    /// Minimum delivery address length, in characters
    pub address_min_chars: usize,
    /// Message shown when a failed submission carries no usable text
    pub fallback_failure_message: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/weblarek".to_string(),
            cdn_url: "http://localhost:3000/content/weblarek".to_string(),
            address_min_chars: 7,
            fallback_failure_message: "Something went wrong while placing the order."
                .to_string(),
        }
    }
}

impl WidgetConfig {
    /// Set the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the CDN base URL
    #[must_use]
    pub fn with_cdn_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_url = url.into();
        self
    }

    /// Set the minimum address length
    #[must_use]
    pub const fn with_address_min_chars(mut self, min: usize) -> Self {
        self.address_min_chars = min;
        self
    }

    /// Set the fallback failure message
    #[must_use]
    pub fn with_fallback_failure_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_failure_message = message.into();
        self
    }

    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or the result fails
    /// [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names; unset names keep defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is malformed or the result fails
    /// [`validate`](Self::validate).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(url) = lookup(ENV_CDN_URL) {
            config.cdn_url = url;
        }
        if let Some(raw) = lookup(ENV_ADDRESS_MIN_CHARS) {
            config.address_min_chars =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_ADDRESS_MIN_CHARS,
                        value: raw.clone(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every setting
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api_url", &self.api_url)?;
        check_url("cdn_url", &self.cdn_url)?;

        if self.address_min_chars == 0 {
            return Err(ConfigError::InvalidValue {
                key: "address_min_chars",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.fallback_failure_message.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "fallback_failure_message",
                reason: "must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}
