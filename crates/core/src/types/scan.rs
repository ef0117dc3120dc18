//! Body-scan records.
//!
//! Scan records are written once at the end of a capture window and never
//! mutated. The capture flow in this codebase performs no measurement
//! extraction, so the height/weight/image fields are absent on every record
//! it produces; consumers must not assume real measurements.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ScanRecordId, UserId};

/// The class of device a scan was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Classify from a `User-Agent` header value.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        const MOBILE_MARKERS: [&str; 4] = ["Mobile", "Android", "iPhone", "iPad"];
        if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Stable string form used in persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl std::str::FromStr for DeviceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            _ => Err(format!("invalid device class: {s}")),
        }
    }
}

/// A completed body-scan capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Record identifier.
    pub id: ScanRecordId,
    /// Owning account.
    pub user_id: UserId,
    /// Human-facing scan identifier (e.g. `SCAN-1734...`).
    pub scan_id: String,
    /// Measured height, if a sensing step produced one. Always absent here.
    pub height: Option<Decimal>,
    /// Measured weight, if a sensing step produced one. Always absent here.
    pub weight: Option<Decimal>,
    /// Captured image URL, if one was stored. Always absent here.
    pub image_url: Option<String>,
    /// When the capture window completed.
    pub scan_time: DateTime<Utc>,
    /// Device class the capture ran on.
    pub device: DeviceClass,
    /// How many times this scan has been used for try-on.
    pub try_on_count: u32,
}

/// The measurement snapshot embedded in an account document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Measured height, if any.
    pub height: Option<Decimal>,
    /// Measured weight, if any.
    pub weight: Option<Decimal>,
    /// Captured image URL, if any.
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_classification() {
        assert_eq!(
            DeviceClass::from_user_agent(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
            ),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::from_user_agent("Mozilla/5.0 (Linux; Android 14)"),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::from_user_agent("Mozilla/5.0 (X11; Linux x86_64)"),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn device_class_round_trips_through_str() {
        for device in [DeviceClass::Mobile, DeviceClass::Desktop] {
            let parsed: DeviceClass = device.as_str().parse().expect("parse");
            assert_eq!(parsed, device);
        }
    }
}
