//! Structured cookie set for one account.
//!
//! Cookies are kept as ordered `Name=Value` pairs and only rendered to the
//! `Cookie` header form (`a=1; b=2`) when a request is built or the store is
//! written to disk.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters stripped from both ends of every cookie value.
const TRIM_CHARS: [char; 2] = ['"', ' '];

/// One cookie as returned by the token exchange endpoint.
///
/// API JSON fields: `Name`, `Value` (plus `Path`, `Secure`, `Expires`, ...
/// which are ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct RawCookie {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// A single `Name=Value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    /// Build a cookie, trimming quotes and spaces off both ends of `value`.
    pub fn normalized(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            value: normalize_value(value).to_owned(),
        }
    }

    /// Parse a single `Name=Value` fragment.
    ///
    /// Attributes after the first `;` (`Path`, `Expires`, ...) are dropped,
    /// so a full `Set-Cookie` header value is accepted too. Returns `None`
    /// for fragments without `=` or with an empty name.
    pub fn parse(fragment: &str) -> Option<Self> {
        Self::parse_pair(fragment.split(';').next()?)
    }

    /// Parse a bare `Name=Value` pair; the value is everything after the
    /// first `=`, `;` included.
    pub fn parse_pair(pair: &str) -> Option<Self> {
        let (name, value) = pair.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            value: value.trim().to_owned(),
        })
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Strip leading and trailing `"` and space characters from a cookie value.
pub fn normalize_value(value: &str) -> &str {
    value.trim_matches(&TRIM_CHARS[..])
}

/// Ordered cookie set, persisted as its header string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from the token exchange cookie list, normalizing values.
    pub fn from_raw(raw: &[RawCookie]) -> Self {
        Self {
            cookies: raw
                .iter()
                .map(|c| Cookie::normalized(c.name.clone(), &c.value))
                .collect(),
        }
    }

    /// Parse a `Cookie` header string (`a=1; b=2`).
    ///
    /// Fragments that are not `Name=Value` pairs are skipped. Only `"; "`
    /// separates cookies, so values holding a bare `;` survive a reload.
    pub fn parse_header(header: &str) -> Self {
        Self {
            cookies: header.split("; ").filter_map(Cookie::parse_pair).collect(),
        }
    }

    /// Insert a cookie, replacing the value of an existing cookie with the
    /// same name in place.
    pub fn insert(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => existing.value = cookie.value,
            None => self.cookies.push(cookie),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    /// Render the `Cookie` request header value.
    pub fn header(&self) -> String {
        self.cookies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<String> for CookieJar {
    fn from(header: String) -> Self {
        Self::parse_header(&header)
    }
}

impl From<CookieJar> for String {
    fn from(jar: CookieJar) -> Self {
        jar.header()
    }
}
