//! Alexa web console API client library.
//!
//! Provides cookie-session authentication against the Alexa web console and
//! read access to the device list, notifications and now-playing state.
//!
//! # Authentication
//!
//! A long-lived refresh token is exchanged for session cookies, then a CSRF
//! cookie is harvested from the console. Cookies are persisted per account id
//! to `~/.alexa-query/cookies.json` (configurable, see [`Config`]).
//!
//! ```no_run
//! use alexa_api::{Config, SessionManager};
//!
//! let mut manager = SessionManager::new(Config::default()).unwrap();
//! let mut account = manager.account("living-room");
//! if !account.check_status().unwrap() && !account.login("Atnr|...").unwrap() {
//!     eprintln!("login failed");
//! }
//! for device in account.devices().unwrap() {
//!     println!("{} ({})", device.account_name, device.serial_number);
//! }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                               | Endpoint                                  | Description          |
//! |--------------------------------------|-------------------------------------------|----------------------|
//! | [`SessionManager::check_status`]     | `GET /api/bootstrap?version=0`            | Session still valid? |
//! | [`SessionManager::login`]            | `POST /ap/exchangetoken/cookies` + probes | Log in               |
//! | [`SessionManager::devices`]          | `GET /api/devices-v2/device?cached=false` | Speakers             |
//! | [`SessionManager::notifications`]    | `GET /api/notifications`                  | Alarms, timers, ...  |
//! | [`SessionManager::queue`]            | `GET /api/np/player`                      | Now playing          |
//!
//! Calls are blocking and never retried. Transport failures and unexpected
//! response bodies are returned as [`AlexaError`].

pub mod account;
mod auth;
pub mod client;
pub mod config;
pub mod cookie;
mod devices;
pub mod error;
mod notifications;
mod player;
pub mod session;
pub mod types;

pub use account::Account;
pub use auth::{CSRF_PROBE_PATHS, find_csrf_cookie};
pub use client::{DEFAULT_ACCOUNT, SessionManager};
pub use config::{Config, Storefront};
pub use devices::{SPEAKER_FAMILIES, sort_by_name};
pub use error::{AlexaError, Result};
