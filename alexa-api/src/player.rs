//! Now-playing API.
//!
//! Endpoint: `GET /api/np/player?deviceSerialNumber=<serial>&deviceType=<type>`
//!
//! Response:
//! ```json
//! {
//!   "playerInfo": {
//!     "state": "PLAYING",
//!     "infoText": { "title": "Song", "subText1": "Artist" },
//!     "mainArt": { "url": "https://m.media-amazon.com/images/..." },
//!     "progress": { "mediaLength": 215, "mediaProgress": 42 },
//!     "provider": { "providerName": "Amazon Music" }
//!   }
//! }
//! ```

use crate::client::{JSON_CONTENT_TYPE, SessionManager};
use crate::error::Result;
use crate::types::{Device, Queue};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    player_info: Queue,
}

impl SessionManager {
    /// Fetch what `device` is currently playing.
    pub fn queue(&self, account: &str, device: &Device) -> Result<Queue> {
        let path = player_path(device);
        let resp: PlayerResponse = self.get_json(account, &path, Some(JSON_CONTENT_TYPE))?;
        Ok(resp.player_info)
    }
}

fn player_path(device: &Device) -> String {
    format!(
        "/api/np/player?deviceSerialNumber={}&deviceType={}",
        urlencoding::encode(&device.serial_number),
        urlencoding::encode(&device.device_type),
    )
}
