// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw provider readings.
//!
//! Samples are immutable once produced. The orchestrator keeps only the most
//! recent one of each kind; the activity log is the sole history.

use chrono::{DateTime, Utc};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns a map URL centred on this point.
    pub fn map_link(&self) -> String {
        format!(
            "https://maps.google.com/?q={:.6},{:.6}",
            self.latitude, self.longitude
        )
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A position fix from the location provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude above sea level in metres, when the fix includes it.
    pub altitude: Option<f64>,
    /// Horizontal accuracy radius in metres.
    pub accuracy_meters: Option<f64>,
    pub captured_at: DateTime<Utc>,
    /// Reverse-geocoded street address, if the provider resolved one.
    pub address: Option<String>,
}

impl PositionSample {
    /// Creates a bare fix with no optional fields.
    pub fn new(latitude: f64, longitude: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy_meters: None,
            captured_at,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_meters = Some(meters);
        self
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn map_link(&self) -> String {
        self.point().map_link()
    }
}

/// A battery reading from the power provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PowerSample {
    /// Charge level in percent, always within `0..=100`.
    pub level_percent: u8,
    pub is_charging: bool,
    pub low_power_mode: Option<bool>,
    pub captured_at: DateTime<Utc>,
}

impl PowerSample {
    /// Creates a reading, clamping the level into `0..=100`.
    pub fn new(level_percent: u8, is_charging: bool, captured_at: DateTime<Utc>) -> Self {
        Self {
            level_percent: level_percent.min(100),
            is_charging,
            low_power_mode: None,
            captured_at,
        }
    }
}

/// An accelerometer-derived motion reading.
///
/// `magnitude` is opaque to the engine: it is only compared against the
/// configured movement threshold.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSample {
    pub magnitude: f64,
    pub captured_at: DateTime<Utc>,
}

impl MotionSample {
    pub fn new(magnitude: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            magnitude,
            captured_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_map_link_uses_six_decimals() {
        let p = PositionSample::new(37.7749, -122.4194, t0());
        assert_eq!(
            p.map_link(),
            "https://maps.google.com/?q=37.774900,-122.419400"
        );
    }

    #[test]
    fn test_power_level_clamped() {
        let s = PowerSample::new(140, false, t0());
        assert_eq!(s.level_percent, 100);
    }

    #[test]
    fn test_builder_fields() {
        let p = PositionSample::new(1.0, 2.0, t0())
            .with_address("1 Main St")
            .with_accuracy(5.0);
        assert_eq!(p.address.as_deref(), Some("1 Main St"));
        assert_eq!(p.accuracy_meters, Some(5.0));
        assert_eq!(p.point(), GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = PositionSample::new(51.5, -0.12, t0()).with_address("London");
        let json = serde_json::to_string(&p).unwrap();
        let back: PositionSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
