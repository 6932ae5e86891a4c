// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # monitor-runtime
//!
//! The monitoring orchestrator: owns the provider subscriptions, the
//! periodic tick, the inactivity and battery evaluators, the emergency-mode
//! state machine and the activity log.
//!
//! ```text
//!  providers ──SampleSink──► EventQueue ─┐
//!  commands  ──mpsc────────────────────► ├─► ControlLoop (one task) ──► AlertDispatcher
//!  tick / grace / cool-down deadlines ──►┘         │
//!                                                  ▼
//!                                  Arc<RwLock<SharedState>> ◄── Orchestrator accessors
//! ```
//!
//! All mutable monitoring state lives in a single Tokio task. The
//! [`Orchestrator`] handle only sends commands and reads published
//! snapshots, so there is no lock held across an `.await` anywhere.
//!
//! # Lifecycle
//! [`Orchestrator::start`] is idempotent and tolerates failing providers
//! (they are reported as degraded). [`Orchestrator::stop`] is idempotent and
//! guarantees no side effect happens after it returns.

mod clock;
mod config;
mod control;
mod emergency;
mod error;
mod metrics;
mod observer;
mod orchestrator;
mod provider;
mod queue;
mod timer;

pub use clock::MonitorClock;
pub use config::MonitorConfig;
pub use emergency::{EmergencyMode, EmergencyModeState, DEFAULT_EMERGENCY_COOLDOWN};
pub use error::{MonitorError, ProviderError};
pub use metrics::MonitorMetrics;
pub use observer::{MonitorObserver, NoopObserver};
pub use orchestrator::{Collaborators, Orchestrator, ProviderKind, Started};
pub use provider::{
    ContactRegistry, MotionProvider, PositionProvider, PowerProvider, SampleSink,
    SettingsProvider, SharedContacts, SharedSettings, SubscriptionHandle,
};
pub use queue::{EventQueue, MonitorEvent};
pub use timer::Deadline;
