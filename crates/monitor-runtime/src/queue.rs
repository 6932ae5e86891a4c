// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded drop-oldest queue between providers and the control loop.

use parking_lot::Mutex;
use safety_model::{MotionSample, PositionSample, PowerSample};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// A raw sample as delivered by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    Position(PositionSample),
    Power(PowerSample),
    Motion(MotionSample),
}

/// Multi-producer, single-consumer sample queue.
///
/// `push` never blocks: when the queue is full the oldest sample is
/// discarded and counted. Only the latest value of each sample kind matters
/// to the control loop, so losing stale readings under a burst is harmless.
#[derive(Debug)]
pub struct EventQueue {
    inner: Mutex<VecDeque<MonitorEvent>>,
    capacity: usize,
    notify: Notify,
    dropped: AtomicU64,
}

impl EventQueue {
    /// Creates a queue holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Enqueues an event. Returns `false` if an older event was dropped to
    /// make room.
    pub fn push(&self, event: MonitorEvent) -> bool {
        let kept = {
            let mut q = self.inner.lock();
            let kept = if q.len() >= self.capacity {
                q.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            } else {
                true
            };
            q.push_back(event);
            kept
        };
        self.notify.notify_one();
        kept
    }

    pub fn pop(&self) -> Option<MonitorEvent> {
        self.inner.lock().pop_front()
    }

    /// Waits for the next event. Cancel-safe: an event is only removed in
    /// the same poll that returns it.
    pub async fn recv(&self) -> MonitorEvent {
        loop {
            if let Some(event) = self.pop() {
                return event;
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events discarded since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn motion(m: f64) -> MonitorEvent {
        MonitorEvent::Motion(MotionSample::new(m, Utc::now()))
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let q = EventQueue::new(2);
        assert!(q.push(motion(1.0)));
        assert!(q.push(motion(2.0)));
        assert!(!q.push(motion(3.0)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.dropped(), 1);
        match q.pop() {
            Some(MonitorEvent::Motion(s)) => assert_eq!(s.magnitude, 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let q = EventQueue::new(0);
        assert_eq!(q.capacity(), 1);
        q.push(motion(1.0));
        q.push(motion(2.0));
        assert_eq!(q.len(), 1);
    }

    #[tokio::test]
    async fn test_recv_wakes_on_push() {
        let q = Arc::new(EventQueue::new(4));
        let producer = q.clone();
        let handle = tokio::spawn(async move { producer.push(motion(5.0)) });
        let event = q.recv().await;
        assert!(matches!(event, MonitorEvent::Motion(_)));
        assert!(handle.await.unwrap());
        assert!(q.is_empty());
    }
}
