// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # hazard-detect
//!
//! Pure hazard classification for the monitoring loop.
//!
//! - [`classify_battery`] / [`BatteryAlertLatch`]: critical-battery detection
//!   with one alert per discharge episode.
//! - [`classify_inactivity`]: idle time against the configured threshold.
//! - [`InactivityDetector`]: the `Active → WarningRaised → Active` state
//!   machine fed by motion samples.
//!
//! Nothing here reads a clock or spawns a timer: every evaluation takes
//! `now` from the caller, so the orchestrator's tick decides when things
//! happen and tests can replay any timeline.

mod inactivity;
mod threshold;

pub use inactivity::{DetectorState, InactivityDetector};
pub use threshold::{
    classify_battery, classify_inactivity, BatteryAlertLatch, BatteryStatus, InactivityStatus,
};
