//! Data types for Alexa web API responses.
//!
//! Field names follow Rust conventions (`snake_case`); serde renames map them
//! to the console's camelCase JSON. Most notification and player fields are
//! `null` for at least some item types, so they are optional here.

use serde::{Deserialize, Serialize};

/// A speaker, projected from the console's device record.
///
/// Returned by [`SessionManager::devices`](crate::SessionManager::devices)
/// and passed to [`SessionManager::queue`](crate::SessionManager::queue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Display name chosen by the owner, e.g. "Kitchen Echo".
    pub account_name: String,
    /// Hardware model id, e.g. `A3S5BH2HU6VAYF`.
    pub device_type: String,
    /// Device serial number.
    pub serial_number: String,
    /// Family tag: `ECHO`, `ROOK` or `KNIGHT`.
    pub device_family: String,
}

/// An alarm, reminder or timer.
///
/// Returned by [`SessionManager::notifications`](crate::SessionManager::notifications).
/// `type` is one of `Alarm`, `MusicAlarm`, `Reminder`, `Timer`; the label
/// field matching the type is the one that is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// `ON`, `OFF` or `PAUSED`.
    pub status: String,
    pub device_name: Option<String>,
    pub device_serial_number: Option<String>,
    pub alarm_label: Option<String>,
    pub reminder_label: Option<String>,
    pub timer_label: Option<String>,
    /// Epoch millis.
    pub alarm_time: Option<i64>,
    pub created_date: Option<i64>,
    pub last_updated_date: Option<i64>,
    pub last_occurrence_time_in_milli: Option<i64>,
    pub last_trigger_time_in_utc: Option<String>,
    pub deferred_at_time: Option<String>,
    pub snoozed_to_time: Option<String>,
    /// Local date, `YYYY-MM-DD`.
    pub original_date: Option<String>,
    /// Local time, `HH:MM:SS.mmm`.
    pub original_time: Option<String>,
    pub original_duration_in_millis: Option<i64>,
    /// Millis left on a running timer.
    pub remaining_time: Option<i64>,
    pub trigger_time: Option<i64>,
    pub loop_count: Option<i64>,
}

/// What a speaker is currently playing.
///
/// Returned by [`SessionManager::queue`](crate::SessionManager::queue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    /// `PLAYING`, `PAUSED`, `IDLE`; absent when nothing was ever played.
    pub state: Option<String>,
    pub info_text: Option<InfoText>,
    pub main_art: Option<MainArt>,
    pub progress: Option<Progress>,
    pub provider: Option<Provider>,
}

/// Title lines shown by the console's player card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoText {
    pub title: Option<String>,
    /// Usually the artist.
    pub sub_text1: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainArt {
    pub url: Option<String>,
}

/// Playback position, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub media_length: Option<i64>,
    pub media_progress: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// e.g. "Spotify", "Amazon Music".
    pub provider_name: Option<String>,
}
