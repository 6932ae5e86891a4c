// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Monitor configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! movement_threshold = 1.5
//! grace_period_seconds = 60
//! emergency_cooldown_seconds = 300
//! channel_timeout_seconds = 15
//! log_capacity = 100
//! queue_capacity = 256
//!
//! [settings]
//! inactivity_threshold_minutes = 30
//! battery_threshold_percent = 20
//! update_interval_seconds = 60
//! monitoring_enabled = true
//! auto_sos_enabled = true
//! prefer_mms = false
//!
//! [profile]
//! name = "Ada"
//! medical_notes = "asthma"
//! ```

use crate::MonitorError;
use safety_model::{MonitoringSettings, UserProfile};
use std::path::Path;
use std::time::Duration;

/// Engine tuning plus the initial settings and profile.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonitorConfig {
    /// Motion magnitude above which a sample counts as movement.
    #[serde(default = "default_movement_threshold")]
    pub movement_threshold: f64,
    /// Time the user has to confirm safety after an inactivity warning.
    #[serde(default = "default_grace_period")]
    pub grace_period_seconds: u64,
    /// How long emergency mode stays active after a dispatch.
    #[serde(default = "default_cooldown")]
    pub emergency_cooldown_seconds: u64,
    /// Upper bound on a single channel send.
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_seconds: u64,
    /// Maximum retained log entries.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Maximum queued provider samples before the oldest are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    pub settings: MonitoringSettings,
    #[serde(default)]
    pub profile: UserProfile,
}

fn default_movement_threshold() -> f64 {
    1.5
}

fn default_grace_period() -> u64 {
    60
}

fn default_cooldown() -> u64 {
    300
}

fn default_channel_timeout() -> u64 {
    15
}

fn default_log_capacity() -> usize {
    activity_log::DEFAULT_LOG_CAPACITY
}

fn default_queue_capacity() -> usize {
    256
}

impl MonitorConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MonitorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, MonitorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, MonitorError> {
        toml::to_string_pretty(self)
            .map_err(|e| MonitorError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks engine tuning and the embedded settings.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !self.movement_threshold.is_finite() || self.movement_threshold < 0.0 {
            return Err(MonitorError::Config(format!(
                "movement_threshold must be a non-negative number, got {}",
                self.movement_threshold
            )));
        }
        for (field, value) in [
            ("grace_period_seconds", self.grace_period_seconds),
            ("emergency_cooldown_seconds", self.emergency_cooldown_seconds),
            ("channel_timeout_seconds", self.channel_timeout_seconds),
            ("log_capacity", self.log_capacity as u64),
            ("queue_capacity", self.queue_capacity as u64),
        ] {
            if value == 0 {
                return Err(MonitorError::Config(format!("{field} must be > 0")));
            }
        }
        self.settings.validate()?;
        Ok(())
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }

    pub fn emergency_cooldown(&self) -> Duration {
        Duration::from_secs(self.emergency_cooldown_seconds)
    }

    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_seconds)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            movement_threshold: default_movement_threshold(),
            grace_period_seconds: default_grace_period(),
            emergency_cooldown_seconds: default_cooldown(),
            channel_timeout_seconds: default_channel_timeout(),
            log_capacity: default_log_capacity(),
            queue_capacity: default_queue_capacity(),
            settings: MonitoringSettings::default(),
            profile: UserProfile::default(),
        }
    }
}
