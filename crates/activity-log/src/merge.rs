// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Time-bucket merging of log entries.
//!
//! Entries are grouped by `floor(timestamp_ms / bucket_size_ms)` and each
//! bucket collapses into a single [`MergedEntry`]:
//!
//! | field | rule |
//! |---|---|
//! | `timestamp` | latest timestamp in the bucket |
//! | `kind` | highest [`LogKind::priority`] present; ties go to the latest entry |
//! | `battery_level`, `location` | value of the latest entry carrying one |
//! | `payload` | text + text concatenates with `\n`; otherwise the later entry overwrites |
//!
//! "Latest" for values is decided by `(timestamp, id)`, so every field
//! except the payload is independent of input order. The payload follows
//! arrival order: concatenated text reads in the order entries were fed in.

use crate::{LogEvent, LogId, LogKind, MonitoringLog};
use chrono::{DateTime, Utc};
use safety_model::GeoPoint;
use std::collections::BTreeMap;

/// Default bucket width: one minute.
pub const DEFAULT_BUCKET_MS: i64 = 60_000;

/// Payload of a merged record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergedPayload {
    /// One or more plain-text payloads, newline separated.
    Text(String),
    /// A structured payload from the last non-text entry.
    Event(LogEvent),
}

/// One display record per time bucket.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MergedEntry {
    /// Bucket index: `timestamp_ms.div_euclid(bucket_size_ms)`.
    pub bucket: i64,
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub battery_level: Option<u8>,
    pub location: Option<GeoPoint>,
    pub payload: MergedPayload,
    /// Number of raw entries folded into this record.
    pub merged_count: usize,
}

/// Ordering key for "latest wins" value fields.
type Stamp = (DateTime<Utc>, LogId);

struct Accumulator {
    timestamp: DateTime<Utc>,
    kind: (Stamp, LogKind),
    battery: Option<(Stamp, u8)>,
    location: Option<(Stamp, GeoPoint)>,
    payload: MergedPayload,
    count: usize,
}

impl Accumulator {
    fn start(entry: &MonitoringLog) -> Self {
        let stamp = (entry.timestamp, entry.id);
        Self {
            timestamp: entry.timestamp,
            kind: (stamp, entry.kind()),
            battery: entry.battery_level.map(|b| (stamp, b)),
            location: entry.location.map(|l| (stamp, l)),
            payload: payload_of(&entry.event),
            count: 1,
        }
    }

    fn fold(&mut self, entry: &MonitoringLog) {
        let stamp = (entry.timestamp, entry.id);

        if entry.timestamp > self.timestamp {
            self.timestamp = entry.timestamp;
        }
        // Equal priorities fall back to the latest stamp.
        let (kind_stamp, kind) = self.kind;
        let incoming = entry.kind();
        if (incoming.priority(), stamp) > (kind.priority(), kind_stamp) {
            self.kind = (stamp, incoming);
        }
        if let Some(level) = entry.battery_level {
            if self.battery.map_or(true, |(s, _)| stamp > s) {
                self.battery = Some((stamp, level));
            }
        }
        if let Some(loc) = entry.location {
            if self.location.map_or(true, |(s, _)| stamp > s) {
                self.location = Some((stamp, loc));
            }
        }

        self.payload = match (&self.payload, entry.event.text()) {
            (MergedPayload::Text(existing), Some(incoming)) => {
                MergedPayload::Text(format!("{existing}\n{incoming}"))
            }
            _ => payload_of(&entry.event),
        };
        self.count += 1;
    }

    fn finish(self, bucket: i64) -> MergedEntry {
        MergedEntry {
            bucket,
            timestamp: self.timestamp,
            kind: self.kind.1,
            battery_level: self.battery.map(|(_, b)| b),
            location: self.location.map(|(_, l)| l),
            payload: self.payload,
            merged_count: self.count,
        }
    }
}

fn payload_of(event: &LogEvent) -> MergedPayload {
    match event.text() {
        Some(text) => MergedPayload::Text(text.to_string()),
        None => MergedPayload::Event(event.clone()),
    }
}

/// Merges `entries` into one record per bucket, ascending by bucket.
///
/// A non-positive `bucket_size_ms` is treated as 1 ms.
pub fn merge<'a, I>(entries: I, bucket_size_ms: i64) -> Vec<MergedEntry>
where
    I: IntoIterator<Item = &'a MonitoringLog>,
{
    let bucket_size_ms = bucket_size_ms.max(1);
    let mut buckets: BTreeMap<i64, Accumulator> = BTreeMap::new();

    for entry in entries {
        let bucket = entry.timestamp.timestamp_millis().div_euclid(bucket_size_ms);
        buckets
            .entry(bucket)
            .and_modify(|acc| acc.fold(entry))
            .or_insert_with(|| Accumulator::start(entry));
    }

    buckets
        .into_iter()
        .map(|(bucket, acc)| acc.finish(bucket))
        .collect()
}
