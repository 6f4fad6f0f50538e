//! Device list API.
//!
//! Endpoint: `GET /api/devices-v2/device?cached=false`
//!
//! Response (abridged):
//! ```json
//! {
//!   "devices": [
//!     {
//!       "accountName": "Kitchen Echo",
//!       "deviceFamily": "ECHO",
//!       "deviceType": "A3S5BH2HU6VAYF",
//!       "serialNumber": "G090LF1180040NBL",
//!       "online": true,
//!       ...
//!     }
//!   ]
//! }
//! ```
//!
//! Only speaker families are returned; apps, phones and third-party devices
//! listed by the console are dropped.

use crate::client::SessionManager;
use crate::error::{AlexaError, Result};
use crate::types::Device;
use icu_collator::{Collator, CollatorOptions};
use serde::Deserialize;

const DEVICES_PATH: &str = "/api/devices-v2/device?cached=false";

/// Device families kept by [`SessionManager::devices`].
pub const SPEAKER_FAMILIES: [&str; 3] = ["ECHO", "ROOK", "KNIGHT"];

#[derive(Deserialize)]
struct DeviceList {
    devices: Vec<RawDevice>,
}

/// Records are only read after the family filter, so every field may be
/// absent or `null` on devices that end up dropped.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDevice {
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    device_type: Option<String>,
    #[serde(default)]
    serial_number: Option<String>,
    #[serde(default)]
    device_family: Option<String>,
}

impl SessionManager {
    /// List the account's speakers, sorted by display name.
    pub fn devices(&self, account: &str) -> Result<Vec<Device>> {
        let list: DeviceList = self.get_json(account, DEVICES_PATH, None)?;
        let total = list.devices.len();
        let devices = filter_and_sort(list.devices)?;
        tracing::debug!(account, total, kept = devices.len(), "fetched devices");
        Ok(devices)
    }
}

fn filter_and_sort(raw: Vec<RawDevice>) -> Result<Vec<Device>> {
    let mut devices: Vec<Device> = raw
        .into_iter()
        .filter_map(|d| {
            let family = d.device_family?;
            SPEAKER_FAMILIES.contains(&family.as_str()).then(|| Device {
                account_name: d.account_name.unwrap_or_default(),
                device_type: d.device_type.unwrap_or_default(),
                serial_number: d.serial_number.unwrap_or_default(),
                device_family: family,
            })
        })
        .collect();
    sort_by_name(&mut devices)?;
    Ok(devices)
}

/// Sort by account name using Unicode collation (root locale), so accented
/// and differently-cased names land next to their base letters.
pub fn sort_by_name(devices: &mut [Device]) -> Result<()> {
    let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| AlexaError::Collation(e.to_string()))?;
    devices.sort_by(|a, b| collator.compare(&a.account_name, &b.account_name));
    Ok(())
}
