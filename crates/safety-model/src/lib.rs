// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # safety-model
//!
//! The shared vocabulary of the lifeline monitoring engine.
//!
//! - [`PositionSample`], [`PowerSample`], [`MotionSample`]: immutable
//!   readings produced by the platform providers.
//! - [`EmergencyContact`] and [`ContactList`]: who gets notified, with the
//!   at-most-one-primary invariant enforced by the list.
//! - [`MonitoringSettings`] and [`UserProfile`]: read-only configuration
//!   consumed by the detectors and the alert composer.
//! - [`AlertOutcome`]: the write-once record of a dispatch attempt.
//!
//! Every type is a plain value: `Clone`, comparable, and serialisable with
//! `serde` so that presentation layers can persist or ship it as-is.

mod alert;
mod contact;
mod error;
mod sample;
mod settings;

pub use alert::{AlertId, AlertOutcome, ChannelKind, TriggerType};
pub use contact::{ContactId, ContactList, EmergencyContact};
pub use error::ModelError;
pub use sample::{GeoPoint, MotionSample, PositionSample, PowerSample};
pub use settings::{MonitoringSettings, UserProfile};
