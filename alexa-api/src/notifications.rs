//! Notification list API.
//!
//! Endpoint: `GET /api/notifications`
//!
//! Response:
//! ```json
//! {
//!   "notifications": [
//!     {
//!       "id": "G090LF1180040NBL-A3S5BH2HU6VAYF-...",
//!       "type": "Alarm",
//!       "status": "ON",
//!       "alarmTime": 1671262200000,
//!       "originalDate": "2022-12-17",
//!       "originalTime": "07:30:00.000",
//!       "deviceSerialNumber": "G090LF1180040NBL",
//!       ...
//!     }
//!   ]
//! }
//! ```

use crate::client::{JSON_CONTENT_TYPE, SessionManager};
use crate::error::Result;
use crate::types::Notification;
use serde::Deserialize;

#[derive(Deserialize)]
struct NotificationList {
    notifications: Vec<Notification>,
}

impl SessionManager {
    /// List every alarm, reminder and timer on the account.
    pub fn notifications(&self, account: &str) -> Result<Vec<Notification>> {
        let list: NotificationList =
            self.get_json(account, "/api/notifications", Some(JSON_CONTENT_TYPE))?;
        tracing::debug!(account, count = list.notifications.len(), "fetched notifications");
        Ok(list.notifications)
    }
}
