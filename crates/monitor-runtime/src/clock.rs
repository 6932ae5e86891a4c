// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Wall-clock timestamps derived from the Tokio clock.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Maps the Tokio monotonic clock onto UTC timestamps.
///
/// The wall time is sampled once at construction and then advanced by
/// Tokio's elapsed time. Log timestamps therefore never go backwards when
/// the system clock is adjusted, and they follow paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct MonitorClock {
    anchor: Instant,
    anchor_wall: DateTime<Utc>,
}

impl MonitorClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// A clock whose current instant reads as `wall`.
    pub fn anchored_at(wall: DateTime<Utc>) -> Self {
        Self {
            anchor: Instant::now(),
            anchor_wall: wall,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.anchor.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.anchor_wall + elapsed
    }
}

impl Default for MonitorClock {
    fn default() -> Self {
        Self::new()
    }
}
