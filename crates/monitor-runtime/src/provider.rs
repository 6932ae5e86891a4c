// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Capability traits for the platform collaborators.
//!
//! The engine never talks to sensors, storage or settings screens directly.
//! Each is reached through one of the traits here, so the host application
//! (or a test) decides what backs them.

use crate::{EventQueue, MonitorClock, MonitorEvent, ProviderError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use safety_model::{
    ContactList, EmergencyContact, ModelError, MonitoringSettings, MotionSample, PositionSample,
    PowerSample,
};
use std::sync::Arc;
use std::time::Duration;

// ── Sample delivery ────────────────────────────────────────────

/// Opaque token identifying one provider subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Write end handed to a provider on subscribe.
///
/// Pushing never blocks and never fails; when the engine falls behind the
/// oldest queued samples are discarded.
pub struct SampleSink<T> {
    queue: Arc<EventQueue>,
    clock: MonitorClock,
    wrap: fn(T) -> MonitorEvent,
}

impl<T> SampleSink<T> {
    pub(crate) fn new(queue: Arc<EventQueue>, clock: MonitorClock, wrap: fn(T) -> MonitorEvent) -> Self {
        Self { queue, clock, wrap }
    }

    /// Delivers a sample. Returns `false` if an older sample was dropped.
    pub fn push(&self, sample: T) -> bool {
        self.queue.push((self.wrap)(sample))
    }

    /// The engine's current time, for stamping samples.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl<T> Clone for SampleSink<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            clock: self.clock,
            wrap: self.wrap,
        }
    }
}

impl<T> std::fmt::Debug for SampleSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleSink")
            .field("queued", &self.queue.len())
            .finish()
    }
}

// ── Providers ──────────────────────────────────────────────────

/// Periodic position fixes.
#[async_trait::async_trait]
pub trait PositionProvider: Send + Sync {
    /// Asks the platform for location access. `false` means denied.
    async fn request_permission(&self) -> bool;

    async fn subscribe(
        &self,
        interval: Duration,
        sink: SampleSink<PositionSample>,
    ) -> Result<SubscriptionHandle, ProviderError>;

    async fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Periodic battery readings.
#[async_trait::async_trait]
pub trait PowerProvider: Send + Sync {
    async fn subscribe(
        &self,
        interval: Duration,
        sink: SampleSink<PowerSample>,
    ) -> Result<SubscriptionHandle, ProviderError>;

    async fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Continuous accelerometer magnitudes. Optional hardware.
#[async_trait::async_trait]
pub trait MotionProvider: Send + Sync {
    fn is_available(&self) -> bool;

    async fn subscribe(
        &self,
        sink: SampleSink<MotionSample>,
    ) -> Result<SubscriptionHandle, ProviderError>;

    async fn unsubscribe(&self, handle: SubscriptionHandle);
}

// ── Contacts and settings ──────────────────────────────────────

/// Source of the contacts to notify.
pub trait ContactRegistry: Send + Sync {
    fn active_contacts(&self) -> Vec<EmergencyContact>;
}

impl ContactRegistry for ContactList {
    fn active_contacts(&self) -> Vec<EmergencyContact> {
        self.active()
    }
}

/// A contact list that can be edited while monitoring runs.
#[derive(Debug, Default)]
pub struct SharedContacts {
    inner: RwLock<ContactList>,
}

impl SharedContacts {
    pub fn new(list: ContactList) -> Self {
        Self {
            inner: RwLock::new(list),
        }
    }

    /// Applies an edit under the write lock. The list's own invariants
    /// (single primary, unique ids) are enforced by `ContactList`.
    pub fn update<R>(&self, edit: impl FnOnce(&mut ContactList) -> R) -> R {
        edit(&mut self.inner.write())
    }

    pub fn snapshot(&self) -> Vec<EmergencyContact> {
        self.inner.read().snapshot()
    }
}

impl ContactRegistry for SharedContacts {
    fn active_contacts(&self) -> Vec<EmergencyContact> {
        self.inner.read().active()
    }
}

/// Source of the current monitoring settings, read on every tick.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> MonitoringSettings;
}

impl SettingsProvider for MonitoringSettings {
    fn settings(&self) -> MonitoringSettings {
        self.clone()
    }
}

/// Settings that can be replaced while monitoring runs.
///
/// Threshold and auto-SOS changes apply from the next tick. The tick period
/// itself is fixed at start.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<MonitoringSettings>,
}

impl SharedSettings {
    pub fn new(settings: MonitoringSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Replaces the settings after validating them.
    pub fn update(&self, settings: MonitoringSettings) -> Result<(), ModelError> {
        settings.validate()?;
        *self.inner.write() = settings;
        Ok(())
    }
}

impl SettingsProvider for SharedSettings {
    fn settings(&self) -> MonitoringSettings {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_wraps_and_counts() {
        let queue = Arc::new(EventQueue::new(1));
        let sink = SampleSink::new(queue.clone(), MonitorClock::new(), MonitorEvent::Motion);
        assert!(sink.push(MotionSample::new(1.0, sink.now())));
        assert!(!sink.clone().push(MotionSample::new(2.0, sink.now())));
        assert_eq!(queue.dropped(), 1);
        assert!(matches!(queue.pop(), Some(MonitorEvent::Motion(_))));
    }

    #[test]
    fn test_shared_settings_rejects_invalid() {
        let shared = SharedSettings::new(MonitoringSettings::default());
        let bad = MonitoringSettings {
            update_interval_seconds: 1,
            ..Default::default()
        };
        assert!(shared.update(bad).is_err());
        assert_eq!(shared.settings().update_interval_seconds, 60);

        let good = MonitoringSettings {
            prefer_mms: true,
            ..Default::default()
        };
        shared.update(good).unwrap();
        assert!(shared.settings().prefer_mms);
    }

    #[test]
    fn test_shared_contacts_live_edit() {
        let shared = SharedContacts::new(
            ContactList::from_contacts([EmergencyContact::new("a", "Alice", "+100")]).unwrap(),
        );
        assert_eq!(shared.active_contacts().len(), 1);
        shared
            .update(|list| list.set_active(&"a".into(), false))
            .unwrap();
        assert!(shared.active_contacts().is_empty());
        assert_eq!(shared.snapshot().len(), 1);
    }
}
