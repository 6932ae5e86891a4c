// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Observer hooks for presentation and persistence layers.

use crate::EmergencyModeState;
use activity_log::MonitoringLog;
use safety_model::{PositionSample, PowerSample};

/// Receives notifications from the control loop.
///
/// Called synchronously on the control task, so implementations must not
/// block; hand work off to a channel if it is slow. Every method defaults
/// to a no-op.
pub trait MonitorObserver: Send + Sync {
    fn on_location_updated(&self, _sample: &PositionSample) {}

    fn on_battery_updated(&self, _sample: &PowerSample) {}

    /// Called for every appended log entry; the natural persistence hook.
    fn on_log_appended(&self, _entry: &MonitoringLog) {}

    fn on_emergency_mode_changed(&self, _state: &EmergencyModeState) {}
}

/// An observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MonitorObserver for NoopObserver {}
