// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Monitoring counters.
//!
//! [`MonitorMetrics`] is updated by the control loop and published with
//! every snapshot. It is cumulative across start/stop cycles.

/// Aggregate counters for one orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MonitorMetrics {
    /// Periodic evaluations performed.
    pub ticks: u64,
    pub position_samples: u64,
    pub power_samples: u64,
    pub motion_samples: u64,
    /// Motion samples above the movement threshold.
    pub qualifying_motion: u64,
    /// Samples discarded by the event queue under backlog.
    pub samples_dropped: u64,
    pub warnings_raised: u64,
    pub warnings_confirmed: u64,
    /// Warnings whose grace period ran out.
    pub escalations: u64,
    pub dispatches_attempted: u64,
    pub dispatches_succeeded: u64,
    pub dispatches_failed: u64,
    /// Triggers ignored because a dispatch was already in flight.
    pub triggers_coalesced: u64,
    pub log_entries: u64,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples_received(&self) -> u64 {
        self.position_samples + self.power_samples + self.motion_samples
    }

    /// Records the result of a finished dispatch.
    pub fn record_dispatch(&mut self, success: bool) {
        if success {
            self.dispatches_succeeded += 1;
        } else {
            self.dispatches_failed += 1;
        }
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Monitor: {} ticks, {} samples ({} position, {} power, {} motion, {} dropped), \
             {} warnings ({} confirmed, {} escalated), \
             {} dispatches ({} ok, {} failed, {} coalesced), {} log entries",
            self.ticks,
            self.samples_received(),
            self.position_samples,
            self.power_samples,
            self.motion_samples,
            self.samples_dropped,
            self.warnings_raised,
            self.warnings_confirmed,
            self.escalations,
            self.dispatches_attempted,
            self.dispatches_succeeded,
            self.dispatches_failed,
            self.triggers_coalesced,
            self.log_entries,
        )
    }
}
