// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # activity-log
//!
//! The durable record of everything the monitor observed and did.
//!
//! - [`MonitoringLog`]: one write-once entry; its [`LogEvent`] payload is a
//!   tagged union keyed by [`LogKind`].
//! - [`ActivityLogStore`]: an append-only ring holding the most recent
//!   entries (100 by default), evicting the oldest first.
//! - [`merge`]: coalesces entries into one [`MergedEntry`] per time bucket
//!   for timeline views.
//!
//! # Example
//! ```
//! use activity_log::{merge, ActivityLogStore, LogEvent, MonitoringLog, DEFAULT_BUCKET_MS};
//! use chrono::Utc;
//!
//! let mut store = ActivityLogStore::new();
//! let now = Utc::now();
//! store.append(MonitoringLog::new(now, LogEvent::MotionDetected { magnitude: 2.0 }));
//! store.append(MonitoringLog::new(now, LogEvent::Note("checked in".into())).with_battery(Some(80)));
//!
//! let timeline = merge(store.iter(), DEFAULT_BUCKET_MS);
//! assert_eq!(timeline.len(), 1);
//! assert_eq!(timeline[0].battery_level, Some(80));
//! ```

mod entry;
pub mod merge;
mod store;

pub use entry::{LogEvent, LogId, LogKind, MonitoringLog};
pub use merge::{merge, MergedEntry, MergedPayload, DEFAULT_BUCKET_MS};
pub use store::{ActivityLogStore, DEFAULT_LOG_CAPACITY};
