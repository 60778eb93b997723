//! Backend endpoint configuration

use crate::error::{Error, Result};
use std::env;

/// Base URL used when `BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Path of the email-fetch action, relative to the base URL.
pub const FETCH_EMAILS_PATH: &str = "/actions/fetch_emails";

/// Where the backend under test lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub base_url: String,
}

impl ProbeConfig {
    /// Build a configuration for an explicit base URL.
    ///
    /// Trailing slashes are dropped so that [`ProbeConfig::endpoint`]
    /// never produces `//actions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL has no `http://` or
    /// `https://` scheme.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');

        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Invalid BACKEND_URL '{base_url}': expected an http:// or https:// URL"
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Load the backend configuration from the environment
    ///
    /// Reads from `.env` file if present. Optional (with default):
    /// - `BACKEND_URL` (default: `http://localhost:3001`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `BACKEND_URL` is not an HTTP URL.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::new(env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()))
    }

    /// Full URL of the email-fetch action.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{FETCH_EMAILS_PATH}", self.base_url)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}
