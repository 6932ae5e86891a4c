// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! User-tunable monitoring thresholds and the optional alert profile.

use crate::ModelError;
use std::time::Duration;

/// Thresholds and switches that drive the monitoring loop.
///
/// Read-only to the engine; a settings provider supplies fresh copies.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    /// Idle minutes before an inactivity warning is raised (`>= 1`).
    pub inactivity_threshold_minutes: u32,
    /// Battery percentage at or below which the battery is critical (`1..=100`).
    pub battery_threshold_percent: u8,
    /// Provider sampling and tick period in seconds (`>= 5`).
    pub update_interval_seconds: u32,
    pub monitoring_enabled: bool,
    /// Whether detectors may dispatch alerts without user action.
    pub auto_sos_enabled: bool,
    /// Try the secondary (richer) channel before the primary one.
    pub prefer_mms: bool,
}

impl MonitoringSettings {
    /// Checks every field against its permitted range.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.inactivity_threshold_minutes < 1 {
            return Err(ModelError::InvalidSettings {
                field: "inactivity_threshold_minutes",
                detail: format!("must be >= 1, got {}", self.inactivity_threshold_minutes),
            });
        }
        if !(1..=100).contains(&self.battery_threshold_percent) {
            return Err(ModelError::InvalidSettings {
                field: "battery_threshold_percent",
                detail: format!("must be in 1..=100, got {}", self.battery_threshold_percent),
            });
        }
        if self.update_interval_seconds < 5 {
            return Err(ModelError::InvalidSettings {
                field: "update_interval_seconds",
                detail: format!("must be >= 5, got {}", self.update_interval_seconds),
            });
        }
        Ok(())
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(u64::from(self.inactivity_threshold_minutes) * 60)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.update_interval_seconds))
    }
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            inactivity_threshold_minutes: 30,
            battery_threshold_percent: 20,
            update_interval_seconds: 60,
            monitoring_enabled: true,
            auto_sos_enabled: true,
            prefer_mms: false,
        }
    }
}

/// Personal details appended to outgoing alerts. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub medical_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        MonitoringSettings::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let s = MonitoringSettings {
            inactivity_threshold_minutes: 0,
            ..Default::default()
        };
        let err = s.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidSettings { field: "inactivity_threshold_minutes", .. }
        ));
    }

    #[test]
    fn test_rejects_battery_out_of_range() {
        for pct in [0u8, 101] {
            let s = MonitoringSettings {
                battery_threshold_percent: pct,
                ..Default::default()
            };
            assert!(s.validate().is_err(), "{pct} should be rejected");
        }
    }

    #[test]
    fn test_rejects_short_interval() {
        let s = MonitoringSettings {
            update_interval_seconds: 4,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_durations() {
        let s = MonitoringSettings::default();
        assert_eq!(s.inactivity_threshold(), Duration::from_secs(30 * 60));
        assert_eq!(s.update_interval(), Duration::from_secs(60));
    }
}
