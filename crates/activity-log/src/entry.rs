// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Log entry types.

use chrono::{DateTime, Utc};
use safety_model::{AlertOutcome, GeoPoint};
use uuid::Uuid;

/// Unique identifier of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LogId(Uuid);

impl LogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant of a [`LogEvent`], ordered by display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    LocationUpdate,
    BatteryCheck,
    MotionDetected,
    InactivityAlert,
    SosSent,
    SosFailed,
    Note,
}

impl LogKind {
    /// Rank used when several kinds share a merge bucket; higher wins.
    ///
    /// SosSent > InactivityAlert > MotionDetected > LocationUpdate >
    /// BatteryCheck > everything else.
    pub fn priority(self) -> u8 {
        match self {
            LogKind::SosSent => 5,
            LogKind::InactivityAlert => 4,
            LogKind::MotionDetected => 3,
            LogKind::LocationUpdate => 2,
            LogKind::BatteryCheck => 1,
            LogKind::SosFailed | LogKind::Note => 0,
        }
    }
}

/// What happened, with a payload specific to each kind.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LogEvent {
    LocationUpdate { accuracy_meters: Option<f64> },
    BatteryCheck { is_charging: bool, is_low: bool },
    MotionDetected { magnitude: f64 },
    InactivityAlert(String),
    SosSent(AlertOutcome),
    SosFailed(String),
    Note(String),
}

impl LogEvent {
    pub fn kind(&self) -> LogKind {
        match self {
            LogEvent::LocationUpdate { .. } => LogKind::LocationUpdate,
            LogEvent::BatteryCheck { .. } => LogKind::BatteryCheck,
            LogEvent::MotionDetected { .. } => LogKind::MotionDetected,
            LogEvent::InactivityAlert(_) => LogKind::InactivityAlert,
            LogEvent::SosSent(_) => LogKind::SosSent,
            LogEvent::SosFailed(_) => LogKind::SosFailed,
            LogEvent::Note(_) => LogKind::Note,
        }
    }

    /// Returns the payload if it is plain text.
    pub fn text(&self) -> Option<&str> {
        match self {
            LogEvent::InactivityAlert(s) | LogEvent::SosFailed(s) | LogEvent::Note(s) => Some(s),
            _ => None,
        }
    }
}

/// A single write-once activity log entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonitoringLog {
    pub id: LogId,
    pub timestamp: DateTime<Utc>,
    pub battery_level: Option<u8>,
    pub location: Option<GeoPoint>,
    pub event: LogEvent,
}

impl MonitoringLog {
    pub fn new(timestamp: DateTime<Utc>, event: LogEvent) -> Self {
        Self {
            id: LogId::new(),
            timestamp,
            battery_level: None,
            location: None,
            event,
        }
    }

    pub fn with_battery(mut self, level: Option<u8>) -> Self {
        self.battery_level = level;
        self
    }

    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.location = location;
        self
    }

    pub fn kind(&self) -> LogKind {
        self.event.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let ordered = [
            LogKind::SosSent,
            LogKind::InactivityAlert,
            LogKind::MotionDetected,
            LogKind::LocationUpdate,
            LogKind::BatteryCheck,
            LogKind::Note,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].priority() > pair[1].priority(), "{pair:?}");
        }
        assert_eq!(LogKind::SosFailed.priority(), LogKind::Note.priority());
    }

    #[test]
    fn test_text_variants() {
        assert_eq!(LogEvent::Note("hi".into()).text(), Some("hi"));
        assert_eq!(LogEvent::SosFailed("x".into()).text(), Some("x"));
        assert!(LogEvent::MotionDetected { magnitude: 1.0 }.text().is_none());
    }

    #[test]
    fn test_serde_tagged() {
        let e = MonitoringLog::new(Utc::now(), LogEvent::InactivityAlert("idle".into()))
            .with_battery(Some(50));
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"type\":\"inactivity_alert\""));
        let back: MonitoringLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
