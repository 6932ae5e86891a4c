// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded append-only log store.
//!
//! The store is a ring over a `VecDeque`: `append` is O(1) and, once the
//! ring is full, evicts exactly the oldest entry. Entries are never edited
//! in place.

use crate::merge::{merge, MergedEntry};
use crate::MonitoringLog;
use std::collections::VecDeque;

/// Number of entries retained when no capacity is given.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// FIFO-evicting log of the most recent activity.
#[derive(Debug, Clone)]
pub struct ActivityLogStore {
    entries: VecDeque<MonitoringLog>,
    capacity: usize,
    /// Cumulative entries appended over the store's lifetime.
    total_appended: u64,
    /// Cumulative entries evicted to stay within capacity.
    evicted: u64,
}

impl ActivityLogStore {
    /// Creates a store holding [`DEFAULT_LOG_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Creates a store holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_appended: 0,
            evicted: 0,
        }
    }

    /// Appends an entry, returning the evicted oldest entry if the store was full.
    pub fn append(&mut self, entry: MonitoringLog) -> Option<MonitoringLog> {
        let evicted = if self.entries.len() >= self.capacity {
            self.evicted += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        self.total_appended += 1;
        evicted
    }

    /// Returns clones of the entries matching `predicate`, oldest first.
    pub fn query<P>(&self, predicate: P) -> Vec<MonitoringLog>
    where
        P: Fn(&MonitoringLog) -> bool,
    {
        self.entries.iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Iterates over retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MonitoringLog> + '_ {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&MonitoringLog> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&MonitoringLog> {
        self.entries.front()
    }

    /// Merges the retained entries into one record per time bucket.
    pub fn merged(&self, bucket_size_ms: i64) -> Vec<MergedEntry> {
        merge(self.entries.iter(), bucket_size_ms)
    }

    pub fn to_vec(&self) -> Vec<MonitoringLog> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for ActivityLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogEvent, LogKind};
    use chrono::{TimeZone, Utc};

    fn entry(i: i64) -> MonitoringLog {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(i);
        MonitoringLog::new(ts, LogEvent::Note(format!("#{i}")))
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut store = ActivityLogStore::new();
        for i in 0..250 {
            store.append(entry(i));
            assert!(store.len() <= DEFAULT_LOG_CAPACITY);
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.total_appended(), 250);
        assert_eq!(store.evicted(), 150);
    }

    #[test]
    fn test_101st_evicts_exactly_oldest() {
        let mut store = ActivityLogStore::new();
        let first = entry(0);
        let first_id = first.id;
        store.append(first);
        for i in 1..100 {
            assert!(store.append(entry(i)).is_none());
        }
        let second_id = store.iter().nth(1).unwrap().id;

        let evicted = store.append(entry(100)).expect("store was full");
        assert_eq!(evicted.id, first_id);
        assert_eq!(store.len(), 100);
        assert_eq!(store.oldest().unwrap().id, second_id);
        assert_eq!(store.latest().unwrap().event.text(), Some("#100"));
    }

    #[test]
    fn test_query_filters_in_order() {
        let mut store = ActivityLogStore::with_capacity(10);
        store.append(entry(1));
        store.append(MonitoringLog::new(Utc::now(), LogEvent::MotionDetected { magnitude: 3.0 }));
        store.append(entry(2));

        let notes = store.query(|e| e.kind() == LogKind::Note);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].event.text(), Some("#1"));
        assert_eq!(notes[1].event.text(), Some("#2"));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut store = ActivityLogStore::with_capacity(0);
        store.append(entry(1));
        store.append(entry(2));
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.len(), 1);
    }
}
