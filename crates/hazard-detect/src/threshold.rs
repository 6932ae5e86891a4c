// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Threshold evaluators for battery level and idle time.

use chrono::{DateTime, Utc};
use safety_model::PowerSample;
use std::time::Duration;

/// Classification of a single battery reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStatus {
    Normal,
    /// At or below the threshold and discharging.
    Low,
    /// Charging; never considered critical regardless of level.
    Charging,
}

/// Classifies a reading against `threshold_percent`.
///
/// The comparison is inclusive: a 20 % reading with a 20 % threshold is low.
pub fn classify_battery(sample: &PowerSample, threshold_percent: u8) -> BatteryStatus {
    if sample.is_charging {
        BatteryStatus::Charging
    } else if sample.level_percent <= threshold_percent {
        BatteryStatus::Low
    } else {
        BatteryStatus::Normal
    }
}

/// Idle time measured against the inactivity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InactivityStatus {
    pub is_inactive: bool,
    pub idle_ms: u64,
    /// `true` while a warning is outstanding and awaiting confirmation.
    pub warning_raised: bool,
}

/// Computes idle time since `last_activity_at`.
///
/// A `now` earlier than the last activity (clock skew between providers)
/// counts as zero idle time.
pub fn classify_inactivity(
    last_activity_at: DateTime<Utc>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> InactivityStatus {
    let idle_ms = now
        .signed_duration_since(last_activity_at)
        .num_milliseconds()
        .max(0) as u64;
    InactivityStatus {
        is_inactive: u128::from(idle_ms) >= threshold.as_millis(),
        idle_ms,
        warning_raised: false,
    }
}

/// Edge trigger for the battery-low alert.
///
/// Fires once when the battery first becomes [`BatteryStatus::Low`] and
/// re-arms only after a reading that is no longer low (recharged above the
/// threshold, or plugged in).
#[derive(Debug, Clone, Default)]
pub struct BatteryAlertLatch {
    fired: bool,
}

impl BatteryAlertLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a classification; returns `true` exactly when an alert is due.
    pub fn observe(&mut self, status: BatteryStatus) -> bool {
        match status {
            BatteryStatus::Low if !self.fired => {
                self.fired = true;
                true
            }
            BatteryStatus::Low => false,
            BatteryStatus::Normal | BatteryStatus::Charging => {
                self.fired = false;
                false
            }
        }
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }
}
