//! Session status probe and the login protocol.
//!
//! # Login
//!
//! 1. `POST https://api.<storefront>/ap/exchangetoken/cookies` (form body)
//!    trades a long-lived refresh token for session cookies:
//!
//!    ```json
//!    { "response": { "tokens": { "cookies": {
//!        ".amazon.co.uk": [ { "Name": "session-id", "Value": "\"123-456\"" }, ... ]
//!    } } } }
//!    ```
//!
//! 2. The cookies are normalized and stored for the account right away. They
//!    stay in memory even if the next step fails.
//! 3. A fixed list of console pages is fetched in order until one answers with
//!    a `Set-Cookie: csrf=...` header. That cookie joins the account's cookie
//!    set and its value becomes the account's CSRF token.
//! 4. On success the whole credential store is written to disk.

use crate::client::SessionManager;
use crate::cookie::{Cookie, CookieJar, RawCookie};
use crate::error::{AlexaError, Result};
use crate::session::Session;
use reqwest::StatusCode;
use reqwest::header::SET_COOKIE;
use serde::Deserialize;
use std::collections::HashMap;

const BOOTSTRAP_PATH: &str = "/api/bootstrap?version=0";
const EXCHANGE_PATH: &str = "/ap/exchangetoken/cookies";

/// Console pages probed, in order, for a CSRF cookie.
pub const CSRF_PROBE_PATHS: [&str; 3] = [
    "/api/language",
    "/templates/oobe/d-device-pick.handlebars",
    "/api/devices-v2/device?cached=false",
];

const APP_NAME: &str = "Amazon Alexa";
const CSRF_NAME: &str = "csrf";
const CSRF_MARKER: &str = "csrf=";

#[derive(Deserialize)]
struct ExchangeResponse {
    response: ExchangeBody,
}

#[derive(Deserialize)]
struct ExchangeBody {
    tokens: ExchangeTokens,
}

#[derive(Deserialize)]
struct ExchangeTokens {
    cookies: HashMap<String, Vec<RawCookie>>,
}

impl SessionManager {
    /// Check whether `account`'s stored cookies are still accepted.
    ///
    /// Returns `true` iff the bootstrap endpoint answers exactly `200`.
    /// Unknown accounts are probed with an empty cookie header.
    pub fn check_status(&self, account: &str) -> Result<bool> {
        let url = self.console_url(BOOTSTRAP_PATH);
        tracing::debug!(account, %url, "checking session status");
        let resp = self
            .http()
            .get(&url)
            .header("DNT", "1")
            .header("Cookie", self.store().cookie_header(account))
            .send()?;
        let status = resp.status();
        tracing::debug!(account, %status, "status probe answered");
        Ok(status == StatusCode::OK)
    }

    /// Log `account` in with a refresh token.
    ///
    /// Returns `Ok(false)` when the token exchange is rejected (nothing is
    /// changed) or when no CSRF cookie could be found. In the latter case the
    /// exchanged cookies remain stored in memory but are not written to disk.
    pub fn login(&mut self, account: &str, source_token: &str) -> Result<bool> {
        let Some(cookies) = self.exchange_token(source_token)? else {
            tracing::warn!(account, "token exchange rejected");
            return Ok(false);
        };
        tracing::debug!(account, cookies = cookies.len(), "token exchange succeeded");
        self.store_mut().insert(account, Session::new(cookies));

        let Some(csrf) = self.discover_csrf(account)? else {
            tracing::warn!(account, "CSRF cookie not found");
            return Ok(false);
        };
        tracing::info!(account, "CSRF cookie found");

        if let Some(session) = self.store_mut().get_mut(account) {
            session.csrf = Some(csrf.value.clone());
            session.cookies.insert(csrf);
        }

        self.persist()?;
        Ok(true)
    }

    /// Trade `source_token` for the storefront's session cookies.
    ///
    /// `Ok(None)` when the endpoint answers anything but `200`.
    fn exchange_token(&self, source_token: &str) -> Result<Option<CookieJar>> {
        let storefront = &self.config().storefront;
        let www_domain = storefront.www_domain();
        let form = [
            ("app_name", APP_NAME),
            ("requested_token_type", "auth_cookies"),
            ("domain", www_domain.as_str()),
            ("source_token_type", "refresh_token"),
            ("source_token", source_token),
        ];

        let url = self.api_url(EXCHANGE_PATH);
        tracing::debug!(%url, "exchanging refresh token");
        let resp = self
            .http()
            .post(&url)
            .header("x-amzn-identity-auth-domain", storefront.auth_domain())
            .form(&form)
            .send()?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::debug!(%status, "token exchange answered");
            return Ok(None);
        }

        let body: ExchangeResponse = serde_json::from_str(&resp.text()?)?;
        let domain = storefront.cookie_domain();
        let raw = body
            .response
            .tokens
            .cookies
            .get(&domain)
            .ok_or(AlexaError::MissingCookies { domain })?;
        Ok(Some(CookieJar::from_raw(raw)))
    }

    /// Probe [`CSRF_PROBE_PATHS`] in order and return the first CSRF cookie.
    fn discover_csrf(&self, account: &str) -> Result<Option<Cookie>> {
        for path in CSRF_PROBE_PATHS {
            let url = self.console_url(path);
            let resp = self.console_get(account, &url).send()?;
            let set_cookies: Vec<&str> = resp
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            tracing::debug!(account, %url, set_cookies = set_cookies.len(), "CSRF probe");

            if let Some(cookie) = find_csrf_cookie(&set_cookies) {
                return Ok(Some(cookie));
            }
        }
        Ok(None)
    }
}

/// Pick the CSRF cookie out of a response's `Set-Cookie` header values.
///
/// Entries are scanned in order; within an entry, `;`- and `,`-separated
/// fragments are searched for a `csrf=` pair, so comma-folded headers and
/// attributes ahead of the pair are handled.
pub fn find_csrf_cookie<S: AsRef<str>>(set_cookies: &[S]) -> Option<Cookie> {
    set_cookies
        .iter()
        .map(AsRef::as_ref)
        .filter(|h| h.contains(CSRF_MARKER))
        .find_map(|entry| {
            entry
                .split([';', ','])
                .filter_map(Cookie::parse_pair)
                .find(|c| c.name == CSRF_NAME)
        })
}
