// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Emergency mode: a time-bounded flag set after a successful dispatch.

use crate::Deadline;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default time emergency mode stays active after the last dispatch.
pub const DEFAULT_EMERGENCY_COOLDOWN: Duration = Duration::from_secs(300);

/// Published view of the emergency mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmergencyModeState {
    pub active: bool,
    /// When the current activation began (or was last renewed).
    pub entered_at: Option<DateTime<Utc>>,
}

/// `Normal ⇄ Active` with a single cool-down deadline.
///
/// ```text
///  Normal ──enter──► Active ──expire / cancel──► Normal
///                      └──enter── restarts the cool-down
/// ```
#[derive(Debug, Clone)]
pub struct EmergencyMode {
    state: EmergencyModeState,
    cooldown: Duration,
    deadline: Deadline,
}

impl EmergencyMode {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: EmergencyModeState::default(),
            cooldown,
            deadline: Deadline::disarmed(),
        }
    }

    /// Enters (or renews) emergency mode. Returns `true` on a
    /// `Normal → Active` transition.
    pub fn enter(&mut self, now: DateTime<Utc>) -> bool {
        let was_active = self.state.active;
        self.state = EmergencyModeState {
            active: true,
            entered_at: Some(now),
        };
        self.deadline.arm(self.cooldown);
        !was_active
    }

    /// Clears emergency mode early. Returns `true` if it was active.
    pub fn cancel(&mut self) -> bool {
        self.deadline.disarm();
        std::mem::take(&mut self.state).active
    }

    /// The cool-down elapsed. Same transition as [`cancel`](Self::cancel).
    pub fn expire(&mut self) -> bool {
        self.cancel()
    }

    pub fn state(&self) -> EmergencyModeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Completes when the cool-down runs out; pending while Normal.
    pub async fn expired(&self) {
        self.deadline.fired().await
    }
}

impl Default for EmergencyMode {
    fn default() -> Self {
        Self::new(DEFAULT_EMERGENCY_COOLDOWN)
    }
}
