//! Blocking HTTP client and per-account credential owner.
//!
//! [`SessionManager`] holds a [`reqwest::blocking::Client`] and the in-memory
//! [`CredentialStore`]. Operations are implemented in separate modules
//! (`auth`, `devices`, `notifications`, `player`) as `impl SessionManager`
//! blocks.
//!
//! Every request carries the synthetic user agent and `DNT: 1`. Console
//! requests made on behalf of an account also send `Referer`/`Origin` set to
//! the console origin, the account's `Cookie` header and, for reads, the
//! `csrf` header.

use crate::config::Config;
use crate::error::Result;
use crate::session::{CredentialStore, Session};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Account id used by the single-account convenience API.
pub const DEFAULT_ACCOUNT: &str = "default";

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Owns the credential store and drives the authentication protocol.
pub struct SessionManager {
    http: Client,
    config: Config,
    store_path: PathBuf,
    store: CredentialStore,
}

impl SessionManager {
    /// Create a manager from `config`, loading the credential store from
    /// its configured path.
    ///
    /// A missing or malformed store file is not an error; the manager
    /// starts with no sessions.
    pub fn new(config: Config) -> Result<Self> {
        let store_path = config.resolved_cookie_path()?;
        let store = CredentialStore::load_or_default(&store_path);
        Self::with_store(config, store_path, store)
    }

    /// Create a manager with [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Create a manager with an explicit store (useful for testing or when
    /// credentials come from elsewhere). `store_path` is where successful
    /// logins will write.
    pub fn with_store(config: Config, store_path: PathBuf, store: CredentialStore) -> Result<Self> {
        // `None` must be passed explicitly; the blocking client otherwise
        // defaults to 30s.
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            store_path,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage_path(&self) -> &Path {
        &self.store_path
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut CredentialStore {
        &mut self.store
    }

    /// Session for `account`, if one was loaded or logged in.
    pub fn session(&self, account: &str) -> Option<&Session> {
        self.store.get(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.store.accounts()
    }

    /// Write the whole credential store to [`storage_path`](Self::storage_path).
    pub fn persist(&self) -> Result<()> {
        self.store.save(&self.store_path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn console_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.console_url())
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url())
    }

    /// GET a console URL with the account's cookies and the browser-like
    /// `Referer`/`Origin` headers, without `csrf`.
    pub(crate) fn console_get(&self, account: &str, url: &str) -> RequestBuilder {
        let origin = self.config.console_url();
        self.http
            .get(url)
            .header("DNT", "1")
            .header("Referer", format!("{origin}/spa/index.html"))
            .header("Origin", origin)
            .header("Cookie", self.store.cookie_header(account))
    }

    /// Authenticated console GET, decoding the JSON body as `T`.
    ///
    /// The HTTP status is not checked; an unexpected body surfaces as
    /// [`AlexaError::Json`](crate::AlexaError::Json).
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        account: &str,
        path: &str,
        content_type: Option<&str>,
    ) -> Result<T> {
        let url = self.console_url(path);
        let mut req = self
            .console_get(account, &url)
            .header("csrf", self.store.csrf(account));
        if let Some(ct) = content_type {
            req = req.header("Content-Type", ct);
        }

        tracing::debug!(account, %url, "GET");
        let resp: Response = req.send()?;
        let status = resp.status();
        let body = resp.text()?;
        tracing::debug!(account, %url, %status, bytes = body.len(), "response");
        Ok(serde_json::from_str(&body)?)
    }
}
