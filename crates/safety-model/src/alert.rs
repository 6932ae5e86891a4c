// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Alert identifiers, trigger reasons and dispatch outcomes.

use crate::ContactId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unique identifier for a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AlertId(Uuid);

impl AlertId {
    /// Creates a new random alert id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a dispatch was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// The user pressed the SOS control.
    Manual,
    /// The inactivity grace period expired without confirmation.
    Automatic,
    /// The battery crossed the critical threshold.
    BatteryLow,
}

impl TriggerType {
    /// Headline used in the outgoing message.
    pub fn label(&self) -> &'static str {
        match self {
            TriggerType::Manual => "SOS - manual emergency alert",
            TriggerType::Automatic => "SOS - no movement detected",
            TriggerType::BatteryLow => "SOS - phone battery critically low",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TriggerType::Manual => "manual",
            TriggerType::Automatic => "automatic",
            TriggerType::BatteryLow => "battery-low",
        };
        f.write_str(s)
    }
}

/// Which message transport produced the final delivery report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Plain text messaging (SMS equivalent).
    Primary,
    /// Rich messaging (MMS equivalent).
    Secondary,
}

/// The write-once result of a dispatch attempt.
///
/// `sent_to` and `failed` only ever contain contacts that were attempted;
/// inactive contacts filtered before sending appear in neither.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlertOutcome {
    pub alert_id: AlertId,
    pub trigger: TriggerType,
    pub sent_to: Vec<ContactId>,
    pub failed: Vec<ContactId>,
    /// Channel whose report is recorded above.
    pub channel: ChannelKind,
    /// `true` when the secondary channel failed and the primary was used.
    pub fell_back: bool,
    pub dispatched_at: DateTime<Utc>,
}

impl AlertOutcome {
    /// Partial delivery counts as success.
    pub fn is_success(&self) -> bool {
        !self.sent_to.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        self.is_success() && !self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "alert {} ({}): {} sent, {} failed via {:?}{}",
            self.alert_id,
            self.trigger,
            self.sent_to.len(),
            self.failed.len(),
            self.channel,
            if self.fell_back { " after fallback" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(sent: &[&str], failed: &[&str]) -> AlertOutcome {
        AlertOutcome {
            alert_id: AlertId::new(),
            trigger: TriggerType::Manual,
            sent_to: sent.iter().map(|s| ContactId::from(*s)).collect(),
            failed: failed.iter().map(|s| ContactId::from(*s)).collect(),
            channel: ChannelKind::Primary,
            fell_back: false,
            dispatched_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_success_is_success() {
        let o = outcome(&["a"], &["b"]);
        assert!(o.is_success());
        assert!(o.is_partial());
    }

    #[test]
    fn test_total_failure() {
        let o = outcome(&[], &["a", "b"]);
        assert!(!o.is_success());
        assert!(!o.is_partial());
    }

    #[test]
    fn test_summary_mentions_counts() {
        let s = outcome(&["a", "b"], &[]).summary();
        assert!(s.contains("2 sent"));
        assert!(s.contains("manual"));
    }

    #[test]
    fn test_alert_ids_unique() {
        assert_ne!(AlertId::new(), AlertId::new());
    }
}
