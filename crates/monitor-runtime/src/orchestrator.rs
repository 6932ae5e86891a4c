// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Orchestrator`] handle: lifecycle, commands and read accessors.

use crate::control::{Command, ControlLoop, LoopContext, SharedState};
use crate::{
    ContactRegistry, EmergencyModeState, EventQueue, MonitorClock, MonitorConfig, MonitorError,
    MonitorEvent, MonitorMetrics, MonitorObserver, MotionProvider, NoopObserver,
    PositionProvider, PowerProvider, SampleSink, SettingsProvider, SubscriptionHandle,
};
use activity_log::{MergedEntry, MonitoringLog};
use alert_dispatch::{AlertDispatcher, MessageChannel};
use chrono::{DateTime, Utc};
use hazard_detect::InactivityStatus;
use parking_lot::RwLock;
use safety_model::{AlertOutcome, PositionSample, PowerSample};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The external collaborators an orchestrator is wired to.
pub struct Collaborators {
    pub position: Arc<dyn PositionProvider>,
    pub power: Arc<dyn PowerProvider>,
    pub motion: Arc<dyn MotionProvider>,
    /// SMS-style channel; always available as the fallback.
    pub primary_channel: Arc<dyn MessageChannel>,
    /// MMS-style channel, tried first when `prefer_mms` is set.
    pub secondary_channel: Arc<dyn MessageChannel>,
    pub contacts: Arc<dyn ContactRegistry>,
    pub settings: Arc<dyn SettingsProvider>,
    pub observer: Arc<dyn MonitorObserver>,
}

impl Collaborators {
    /// Wires the required collaborators with a no-op observer.
    pub fn new(
        position: Arc<dyn PositionProvider>,
        power: Arc<dyn PowerProvider>,
        motion: Arc<dyn MotionProvider>,
        primary_channel: Arc<dyn MessageChannel>,
        secondary_channel: Arc<dyn MessageChannel>,
        contacts: Arc<dyn ContactRegistry>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self {
            position,
            power,
            motion,
            primary_channel,
            secondary_channel,
            contacts,
            settings,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MonitorObserver>) -> Self {
        self.observer = observer;
        self
    }
}

/// A sample provider, as reported in [`Started::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ProviderKind {
    Position,
    Power,
    Motion,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProviderKind::Position => "position",
            ProviderKind::Power => "power",
            ProviderKind::Motion => "motion",
        })
    }
}

/// Result of [`Orchestrator::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Started {
    /// Monitoring was already running; nothing changed.
    AlreadyRunning,
    /// Monitoring started. `degraded` lists providers that could not be
    /// subscribed; monitoring runs without them.
    Running { degraded: Vec<ProviderKind> },
}

#[derive(Debug, Default)]
struct Subscriptions {
    position: Option<SubscriptionHandle>,
    power: Option<SubscriptionHandle>,
    motion: Option<SubscriptionHandle>,
}

struct Running {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
    subscriptions: Subscriptions,
}

/// Drives monitoring for one user.
///
/// Owned by the host application; there is no global instance. Commands
/// are fire-and-forget messages to the control task, and accessors read the
/// latest published snapshot, so none of them block on monitoring work.
pub struct Orchestrator {
    collaborators: Collaborators,
    config: MonitorConfig,
    dispatcher: Arc<AlertDispatcher>,
    clock: MonitorClock,
    shared: Arc<RwLock<SharedState>>,
    running: Option<Running>,
}

impl Orchestrator {
    /// Creates a stopped orchestrator. Fails if `config` is out of range.
    pub fn new(collaborators: Collaborators, config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let dispatcher = AlertDispatcher::new(
            collaborators.primary_channel.clone(),
            collaborators.secondary_channel.clone(),
        )
        .with_profile(config.profile.clone())
        .with_timeout(config.channel_timeout());
        let shared = Arc::new(RwLock::new(SharedState::new(config.log_capacity)));

        Ok(Self {
            collaborators,
            config,
            dispatcher: Arc::new(dispatcher),
            clock: MonitorClock::new(),
            shared,
            running: None,
        })
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Starts monitoring.
    ///
    /// Idempotent: a second call returns [`Started::AlreadyRunning`]. Provider
    /// failures never abort the start; they are logged and reported in
    /// [`Started::Running::degraded`](Started::Running).
    pub async fn start(&mut self) -> Result<Started, MonitorError> {
        if self.running.is_some() {
            return Ok(Started::AlreadyRunning);
        }

        let settings = self.collaborators.settings.settings();
        settings.validate()?;
        if !settings.monitoring_enabled {
            return Err(MonitorError::Disabled);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| MonitorError::SchedulerUnavailable)?;

        let queue = Arc::new(EventQueue::new(self.config.queue_capacity));
        let interval = settings.update_interval();
        let mut degraded = Vec::new();
        let mut subscriptions = Subscriptions::default();

        // Position: permission first.
        let position = &self.collaborators.position;
        if position.request_permission().await {
            let sink = SampleSink::new(queue.clone(), self.clock, MonitorEvent::Position);
            match position.subscribe(interval, sink).await {
                Ok(handle) => subscriptions.position = Some(handle),
                Err(e) => {
                    tracing::warn!(provider = "position", error = %e, "subscription failed");
                    degraded.push(ProviderKind::Position);
                }
            }
        } else {
            tracing::warn!(provider = "position", "location permission denied");
            degraded.push(ProviderKind::Position);
        }

        // Power.
        let sink = SampleSink::new(queue.clone(), self.clock, MonitorEvent::Power);
        match self.collaborators.power.subscribe(interval, sink).await {
            Ok(handle) => subscriptions.power = Some(handle),
            Err(e) => {
                tracing::warn!(provider = "power", error = %e, "subscription failed");
                degraded.push(ProviderKind::Power);
            }
        }

        // Motion: optional hardware.
        let motion = &self.collaborators.motion;
        if motion.is_available() {
            let sink = SampleSink::new(queue.clone(), self.clock, MonitorEvent::Motion);
            match motion.subscribe(sink).await {
                Ok(handle) => subscriptions.motion = Some(handle),
                Err(e) => {
                    tracing::warn!(provider = "motion", error = %e, "subscription failed");
                    degraded.push(ProviderKind::Motion);
                }
            }
        } else {
            tracing::warn!(provider = "motion", "motion sensor unavailable, inactivity detection disabled");
            degraded.push(ProviderKind::Motion);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = LoopContext {
            settings: self.collaborators.settings.clone(),
            contacts: self.collaborators.contacts.clone(),
            observer: self.collaborators.observer.clone(),
            dispatcher: self.dispatcher.clone(),
            shared: self.shared.clone(),
            clock: self.clock,
            grace_period: self.config.grace_period(),
            emergency_cooldown: self.config.emergency_cooldown(),
            movement_threshold: self.config.movement_threshold,
        };
        let control = ControlLoop::new(ctx, queue, rx, interval, subscriptions.motion.is_some());
        let task = runtime.spawn(control.run());

        tracing::info!(
            interval_secs = interval.as_secs(),
            degraded = degraded.len(),
            "monitoring started"
        );
        self.running = Some(Running {
            commands: tx,
            task,
            subscriptions,
        });
        Ok(Started::Running { degraded })
    }

    /// Stops monitoring. Idempotent.
    ///
    /// When this returns the control task has exited, any in-flight dispatch
    /// has been aborted and every provider is unsubscribed. Logs and the
    /// latest readings are kept.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        // The receiver only disappears if the task already ended.
        let _ = running.commands.send(Command::Stop);
        if let Err(e) = running.task.await {
            tracing::warn!(error = %e, "control task ended abnormally");
        }

        let subs = running.subscriptions;
        if let Some(handle) = subs.position {
            self.collaborators.position.unsubscribe(handle).await;
        }
        if let Some(handle) = subs.power {
            self.collaborators.power.unsubscribe(handle).await;
        }
        if let Some(handle) = subs.motion {
            self.collaborators.motion.unsubscribe(handle).await;
        }
        tracing::info!("monitoring stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    // ── Commands ───────────────────────────────────────────────

    /// Sends a manual SOS to every active contact.
    pub fn trigger_sos(&self) -> Result<(), MonitorError> {
        self.send(Command::TriggerSos)
    }

    /// Answers an inactivity warning and cancels its escalation.
    pub fn confirm_safety(&self) -> Result<(), MonitorError> {
        self.send(Command::ConfirmSafety)
    }

    /// Leaves emergency mode before the cool-down ends.
    pub fn cancel_emergency(&self) -> Result<(), MonitorError> {
        self.send(Command::CancelEmergency)
    }

    fn send(&self, cmd: Command) -> Result<(), MonitorError> {
        let running = self.running.as_ref().ok_or(MonitorError::NotRunning)?;
        running
            .commands
            .send(cmd)
            .map_err(|_| MonitorError::NotRunning)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn last_location(&self) -> Option<PositionSample> {
        self.shared.read().last_location.clone()
    }

    pub fn last_power(&self) -> Option<PowerSample> {
        self.shared.read().last_power.clone()
    }

    pub fn emergency_mode(&self) -> EmergencyModeState {
        self.shared.read().emergency
    }

    /// Idle time as of now. `None` before the first start.
    pub fn inactivity_status(&self) -> Option<InactivityStatus> {
        let now = self.clock.now();
        self.shared
            .read()
            .detector
            .as_ref()
            .map(|d| d.status(now))
    }

    /// Every retained log entry, oldest first.
    pub fn logs(&self) -> Vec<MonitoringLog> {
        self.shared.read().logs.to_vec()
    }

    pub fn query_logs<P>(&self, predicate: P) -> Vec<MonitoringLog>
    where
        P: Fn(&MonitoringLog) -> bool,
    {
        self.shared.read().logs.query(predicate)
    }

    /// The retained log merged into time buckets of `bucket_size_ms`.
    pub fn merged_timeline(&self, bucket_size_ms: i64) -> Vec<MergedEntry> {
        self.shared.read().logs.merged(bucket_size_ms)
    }

    /// The outcome of the most recent dispatch that reached a channel.
    pub fn last_outcome(&self) -> Option<AlertOutcome> {
        self.shared.read().last_outcome.clone()
    }

    pub fn metrics(&self) -> MonitorMetrics {
        self.shared.read().metrics.clone()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// The engine's current time, as used for log timestamps.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("running", &self.is_running())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
