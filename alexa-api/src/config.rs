//! Client configuration.
//!
//! Every hostname the client talks to is derived from a [`Storefront`]
//! (the national retail domain, e.g. `amazon.co.uk`):
//!
//! | Host                        | Used for                          |
//! |-----------------------------|-----------------------------------|
//! | `https://alexa.<domain>`    | status probe, CSRF probes, reads  |
//! | `https://api.<domain>`      | token exchange                    |
//!
//! Both base URLs can be overridden, which is how tests point the client at
//! a local mock server.

use crate::error::{AlexaError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storefront used when none is configured.
pub const DEFAULT_STOREFRONT: &str = "amazon.co.uk";

/// Cookie file used when none is configured, relative to the home directory.
pub const DEFAULT_COOKIE_PATH: &str = ".alexa-query/cookies.json";

/// Synthetic user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:1.0) bash-script/1.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// National storefront domain, without scheme or leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storefront(String);

impl Storefront {
    pub fn new(domain: &str) -> Self {
        Self(domain.trim().trim_start_matches('.').to_owned())
    }

    pub fn domain(&self) -> &str {
        &self.0
    }

    /// Web console origin, e.g. `https://alexa.amazon.co.uk`.
    pub fn console_url(&self) -> String {
        format!("https://alexa.{}", self.0)
    }

    /// Identity service origin, e.g. `https://api.amazon.co.uk`.
    pub fn api_url(&self) -> String {
        format!("https://api.{}", self.0)
    }

    /// Host sent in `x-amzn-identity-auth-domain`.
    pub fn auth_domain(&self) -> String {
        format!("api.{}", self.0)
    }

    /// `domain` field of the token exchange request.
    pub fn www_domain(&self) -> String {
        format!("www.{}", self.0)
    }

    /// Key of the cookie list in the token exchange response.
    pub fn cookie_domain(&self) -> String {
        format!(".{}", self.0)
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(DEFAULT_STOREFRONT)
    }
}

/// Settings for a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone)]
pub struct Config {
    /// Storefront all hostnames are derived from.
    pub storefront: Storefront,
    /// Credential store location. Relative paths resolve against `$HOME`.
    pub cookie_path: PathBuf,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// User agent for every request.
    pub user_agent: String,
    /// Overrides [`Storefront::console_url`].
    pub console_url: Option<String>,
    /// Overrides [`Storefront::api_url`].
    pub api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storefront: Storefront::default(),
            cookie_path: PathBuf::from(DEFAULT_COOKIE_PATH),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: USER_AGENT.to_owned(),
            console_url: None,
            api_url: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `ALEXA_STOREFRONT`, `ALEXA_COOKIE_PATH` and
    /// `ALEXA_TIMEOUT_SECS` (`0` disables the timeout). Empty values count
    /// as unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(storefront) = var("ALEXA_STOREFRONT") {
            config.storefront = Storefront::new(&storefront);
        }

        if let Some(path) = var("ALEXA_COOKIE_PATH") {
            config.cookie_path = PathBuf::from(path);
        }

        if let Some(secs) = var("ALEXA_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| AlexaError::Other(format!("invalid ALEXA_TIMEOUT_SECS: {e}")))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_storefront(mut self, domain: &str) -> Self {
        self.storefront = Storefront::new(domain);
        self
    }

    #[must_use]
    pub fn with_cookie_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_path = path.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send both console and identity requests to `base` (scheme + host).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        self.console_url = Some(base.clone());
        self.api_url = Some(base);
        self
    }

    pub fn console_url(&self) -> String {
        self.console_url
            .clone()
            .unwrap_or_else(|| self.storefront.console_url())
    }

    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| self.storefront.api_url())
    }

    /// Absolute credential store path.
    pub fn resolved_cookie_path(&self) -> Result<PathBuf> {
        resolve_against_home(&self.cookie_path)
    }
}

fn resolve_against_home(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let home = dirs::home_dir()
        .ok_or_else(|| AlexaError::Other("cannot determine home directory".into()))?;
    Ok(home.join(path))
}
