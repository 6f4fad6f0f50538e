//! Per-account sessions and their on-disk store.
//!
//! The store file holds one JSON object mapping account id to cookie header
//! string:
//!
//! ```json
//! { "living-room": "session-id=123-456; at-acbuk=Atza|...; csrf=1234" }
//! ```
//!
//! CSRF tokens are not written; they are rediscovered on every login.

use crate::cookie::CookieJar;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Credentials for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Cookies from the token exchange, plus the CSRF cookie once found.
    pub cookies: CookieJar,
    /// Bare CSRF token, sent as the `csrf` request header.
    pub csrf: Option<String>,
}

impl Session {
    pub fn new(cookies: CookieJar) -> Self {
        Self {
            cookies,
            csrf: None,
        }
    }

    /// `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies.header()
    }
}

/// Account id → session mapping, persisted as a single JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    sessions: BTreeMap<String, Session>,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct StoreFile(BTreeMap<String, CookieJar>);

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path`, falling back to an empty store when the
    /// file is missing, unreadable or not a JSON object of strings.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => {
                tracing::debug!(
                    path = %path.display(),
                    accounts = store.len(),
                    "loaded credential store"
                );
                store
            }
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable credential store");
                } else {
                    tracing::debug!(path = %path.display(), "no credential store found");
                }
                Self::default()
            }
        }
    }

    /// Load the store from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let StoreFile(jars) = serde_json::from_str(&data)?;
        Ok(Self {
            sessions: jars
                .into_iter()
                .map(|(id, jar)| (id, Session::new(jar)))
                .collect(),
        })
    }

    /// Overwrite `path` with every account's cookies, creating parent
    /// directories if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile(
            self.sessions
                .iter()
                .map(|(id, s)| (id.clone(), s.cookies.clone()))
                .collect(),
        );
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        tracing::info!(path = %path.display(), accounts = self.len(), "saved credential store");
        Ok(())
    }

    pub fn get(&self, account: &str) -> Option<&Session> {
        self.sessions.get(account)
    }

    pub fn get_mut(&mut self, account: &str) -> Option<&mut Session> {
        self.sessions.get_mut(account)
    }

    /// Replace the session for `account`.
    pub fn insert(&mut self, account: &str, session: Session) {
        self.sessions.insert(account.to_owned(), session);
    }

    /// Cookie header for `account`, empty if the account is unknown.
    pub fn cookie_header(&self, account: &str) -> String {
        self.get(account)
            .map(Session::cookie_header)
            .unwrap_or_default()
    }

    /// CSRF token for `account`, empty if none was discovered.
    pub fn csrf(&self, account: &str) -> &str {
        self.get(account)
            .and_then(|s| s.csrf.as_deref())
            .unwrap_or_default()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
