// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The control loop: the single task that owns all mutable monitoring state.
//!
//! Every input (provider samples, commands, the tick, the grace and
//! cool-down deadlines, the in-flight dispatch) is a branch of one
//! `tokio::select!`. Handlers run to completion without awaiting, so state
//! transitions never interleave.

use crate::{
    ContactRegistry, Deadline, EmergencyMode, EmergencyModeState, EventQueue, MonitorClock,
    MonitorEvent, MonitorMetrics, MonitorObserver, SettingsProvider,
};
use activity_log::{ActivityLogStore, LogEvent, MonitoringLog};
use alert_dispatch::{AlertDispatcher, DispatchError};
use hazard_detect::{classify_battery, BatteryAlertLatch, BatteryStatus, InactivityDetector};
use parking_lot::RwLock;
use safety_model::{AlertOutcome, MotionSample, PositionSample, PowerSample, TriggerType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Requests from the [`Orchestrator`](crate::Orchestrator) handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Stop,
    TriggerSos,
    ConfirmSafety,
    CancelEmergency,
}

/// Snapshot published by the control loop for the accessors.
///
/// Only the control task writes it; readers take short read locks.
#[derive(Debug)]
pub(crate) struct SharedState {
    pub last_location: Option<PositionSample>,
    pub last_power: Option<PowerSample>,
    pub emergency: EmergencyModeState,
    pub detector: Option<InactivityDetector>,
    pub logs: ActivityLogStore,
    pub last_outcome: Option<AlertOutcome>,
    pub metrics: MonitorMetrics,
}

impl SharedState {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            last_location: None,
            last_power: None,
            emergency: EmergencyModeState::default(),
            detector: None,
            logs: ActivityLogStore::with_capacity(log_capacity),
            last_outcome: None,
            metrics: MonitorMetrics::new(),
        }
    }
}

type DispatchResult = (TriggerType, Result<AlertOutcome, DispatchError>);

/// Everything the loop needs that outlives a single start/stop cycle.
pub(crate) struct LoopContext {
    pub settings: Arc<dyn SettingsProvider>,
    pub contacts: Arc<dyn ContactRegistry>,
    pub observer: Arc<dyn MonitorObserver>,
    pub dispatcher: Arc<AlertDispatcher>,
    pub shared: Arc<RwLock<SharedState>>,
    pub clock: MonitorClock,
    pub grace_period: Duration,
    pub emergency_cooldown: Duration,
    pub movement_threshold: f64,
}

pub(crate) struct ControlLoop {
    ctx: LoopContext,
    queue: Arc<EventQueue>,
    commands: mpsc::UnboundedReceiver<Command>,
    tick: Interval,
    detector: InactivityDetector,
    motion_enabled: bool,
    battery_latch: BatteryAlertLatch,
    emergency: EmergencyMode,
    grace: Deadline,
    inflight: Option<JoinHandle<DispatchResult>>,
    last_location: Option<PositionSample>,
    last_power: Option<PowerSample>,
    dropped_seen: u64,
}

impl ControlLoop {
    pub fn new(
        ctx: LoopContext,
        queue: Arc<EventQueue>,
        commands: mpsc::UnboundedReceiver<Command>,
        tick_period: Duration,
        motion_enabled: bool,
    ) -> Self {
        let settings = ctx.settings.settings();
        let now = ctx.clock.now();
        let detector = InactivityDetector::new(
            settings.inactivity_threshold(),
            ctx.movement_threshold,
            now,
        );
        let mut tick = tokio::time::interval_at(Instant::now() + tick_period, tick_period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Carry the latest readings and emergency mode across a restart.
        let (last_location, last_power, emergency_state) = {
            let shared = ctx.shared.read();
            (shared.last_location.clone(), shared.last_power.clone(), shared.emergency)
        };
        let mut emergency = EmergencyMode::new(ctx.emergency_cooldown);
        if emergency_state.active {
            emergency.enter(emergency_state.entered_at.unwrap_or(now));
        }

        ctx.shared.write().detector = Some(detector.clone());

        Self {
            ctx,
            queue,
            commands,
            tick,
            detector,
            motion_enabled,
            battery_latch: BatteryAlertLatch::new(),
            emergency,
            grace: Deadline::disarmed(),
            inflight: None,
            last_location,
            last_power,
            dropped_seen: 0,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!("control loop running");
        loop {
            tokio::select! {
                biased;

                cmd = self.commands.recv() => match cmd {
                    Some(Command::Stop) | None => break,
                    Some(cmd) => self.on_command(cmd),
                },
                joined = join_inflight(&mut self.inflight) => {
                    self.inflight = None;
                    self.on_dispatch_finished(joined);
                }
                () = self.grace.fired() => self.on_grace_expired(),
                () = self.emergency.expired() => self.on_cooldown_expired(),
                _ = self.tick.tick() => self.on_tick(),
                // Last, so a saturated queue cannot hold back the timers.
                event = self.queue.recv() => self.on_event(event),
            }
        }
        tracing::debug!("control loop exiting");
    }

    // ── Commands ───────────────────────────────────────────────

    fn on_command(&mut self, cmd: Command) {
        match cmd {
            Command::TriggerSos => {
                tracing::info!("manual SOS requested");
                self.request_dispatch(TriggerType::Manual);
            }
            Command::ConfirmSafety => {
                let now = self.ctx.clock.now();
                let was_raised = self.detector.confirm_safety(now);
                self.grace.disarm();
                if was_raised {
                    tracing::info!("user confirmed safety, escalation cancelled");
                    self.ctx.shared.write().metrics.warnings_confirmed += 1;
                    self.append_log(LogEvent::Note("User confirmed they are safe".into()));
                }
                self.publish_detector();
            }
            Command::CancelEmergency => {
                if self.emergency.cancel() {
                    tracing::info!("emergency mode cancelled");
                    self.publish_emergency();
                }
            }
            Command::Stop => {}
        }
    }

    // ── Samples ────────────────────────────────────────────────

    fn on_event(&mut self, event: MonitorEvent) {
        self.note_dropped();
        match event {
            MonitorEvent::Position(sample) => self.on_position(sample),
            MonitorEvent::Power(sample) => self.on_power(sample),
            MonitorEvent::Motion(sample) => self.on_motion(sample),
        }
    }

    fn on_position(&mut self, sample: PositionSample) {
        tracing::debug!(lat = sample.latitude, lon = sample.longitude, "position sample");
        self.ctx.observer.on_location_updated(&sample);
        let accuracy_meters = sample.accuracy_meters;
        {
            let mut shared = self.ctx.shared.write();
            shared.metrics.position_samples += 1;
            shared.last_location = Some(sample.clone());
        }
        self.last_location = Some(sample);
        self.append_log(LogEvent::LocationUpdate { accuracy_meters });
    }

    fn on_power(&mut self, sample: PowerSample) {
        tracing::debug!(level = sample.level_percent, charging = sample.is_charging, "power sample");
        self.ctx.observer.on_battery_updated(&sample);
        {
            let mut shared = self.ctx.shared.write();
            shared.metrics.power_samples += 1;
            shared.last_power = Some(sample.clone());
        }
        self.last_power = Some(sample);
    }

    fn on_motion(&mut self, sample: MotionSample) {
        self.ctx.shared.write().metrics.motion_samples += 1;
        let was_raised = self.detector.is_warning_raised();
        if !self.detector.on_motion_sample(&sample) {
            return;
        }
        if was_raised {
            self.grace.disarm();
            tracing::info!(magnitude = sample.magnitude, "movement cleared inactivity warning");
        }
        self.ctx.shared.write().metrics.qualifying_motion += 1;
        self.publish_detector();
        self.append_log(LogEvent::MotionDetected {
            magnitude: sample.magnitude,
        });
    }

    // ── Tick ───────────────────────────────────────────────────

    fn on_tick(&mut self) {
        let now = self.ctx.clock.now();
        let settings = self.ctx.settings.settings();
        self.ctx.shared.write().metrics.ticks += 1;
        self.detector.set_threshold(settings.inactivity_threshold());
        self.note_dropped();

        // Battery threshold.
        let battery = self
            .last_power
            .as_ref()
            .map(|p| (p.clone(), classify_battery(p, settings.battery_threshold_percent)));
        if let Some((power, status)) = &battery {
            if self.battery_latch.observe(*status) {
                tracing::warn!(
                    level = power.level_percent,
                    threshold = settings.battery_threshold_percent,
                    "battery critically low"
                );
                if settings.auto_sos_enabled {
                    self.request_dispatch(TriggerType::BatteryLow);
                }
            }
        }

        // Inactivity.
        if self.motion_enabled && self.detector.check_inactivity(now) {
            self.detector.raise_warning(now);
            let idle = Duration::from_millis(self.detector.status(now).idle_ms);
            tracing::warn!(
                idle_secs = idle.as_secs(),
                grace_secs = self.ctx.grace_period.as_secs(),
                "inactivity warning raised"
            );
            self.grace.arm(self.ctx.grace_period);
            self.ctx.shared.write().metrics.warnings_raised += 1;
            self.publish_detector();
            self.append_log(LogEvent::InactivityAlert(format!(
                "No movement detected for {} minutes",
                idle.as_secs() / 60
            )));
        }

        // Periodic battery record.
        if let Some((power, status)) = battery {
            self.append_log(LogEvent::BatteryCheck {
                is_charging: power.is_charging,
                is_low: status == BatteryStatus::Low,
            });
        }
        tracing::debug!("tick complete");
    }

    // ── Timers ─────────────────────────────────────────────────

    fn on_grace_expired(&mut self) {
        self.grace.disarm();
        let now = self.ctx.clock.now();
        if !self.detector.escalate(now) {
            return;
        }
        self.ctx.shared.write().metrics.escalations += 1;
        self.publish_detector();
        let settings = self.ctx.settings.settings();
        if settings.auto_sos_enabled {
            tracing::warn!("inactivity warning unanswered, sending alert");
            self.request_dispatch(TriggerType::Automatic);
        } else {
            tracing::warn!("inactivity warning unanswered, auto-SOS disabled");
        }
    }

    fn on_cooldown_expired(&mut self) {
        if self.emergency.expire() {
            tracing::info!("emergency mode cleared after cool-down");
            self.publish_emergency();
        }
    }

    // ── Dispatch ───────────────────────────────────────────────

    fn request_dispatch(&mut self, trigger: TriggerType) {
        if self.inflight.is_some() {
            self.ctx.shared.write().metrics.triggers_coalesced += 1;
            tracing::warn!(%trigger, "dispatch already in flight, trigger coalesced");
            return;
        }
        let settings = self.ctx.settings.settings();
        let contacts = self.ctx.contacts.active_contacts();
        let location = self.last_location.clone();
        let battery = self.last_power.as_ref().map(|p| p.level_percent);
        let dispatcher = self.ctx.dispatcher.clone();
        let now = self.ctx.clock.now();

        self.ctx.shared.write().metrics.dispatches_attempted += 1;
        self.inflight = Some(tokio::spawn(async move {
            let result = dispatcher
                .dispatch(trigger, now, location.as_ref(), battery, &contacts, &settings)
                .await;
            (trigger, result)
        }));
    }

    fn on_dispatch_finished(&mut self, joined: Result<DispatchResult, JoinError>) {
        match joined {
            Ok((_, Ok(outcome))) => {
                self.ctx.shared.write().metrics.record_dispatch(true);
                let now = self.ctx.clock.now();
                if self.emergency.enter(now) {
                    tracing::info!(alert_id = %outcome.alert_id, "emergency mode entered");
                } else {
                    tracing::info!(alert_id = %outcome.alert_id, "emergency mode renewed");
                }
                self.publish_emergency();
                self.ctx.shared.write().last_outcome = Some(outcome.clone());
                self.append_log(LogEvent::SosSent(outcome));
            }
            Ok((trigger, Err(e))) => {
                tracing::warn!(%trigger, error = %e, "alert dispatch failed");
                {
                    let mut shared = self.ctx.shared.write();
                    shared.metrics.record_dispatch(false);
                    if let Some(outcome) = e.outcome() {
                        shared.last_outcome = Some(outcome.clone());
                    }
                }
                self.append_log(LogEvent::SosFailed(format!("{}: {e}", trigger.label())));
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::warn!(error = %e, "dispatch task failed");
                self.ctx.shared.write().metrics.record_dispatch(false);
                self.append_log(LogEvent::SosFailed(format!("dispatch task failed: {e}")));
            }
        }
    }

    // ── Publishing ─────────────────────────────────────────────

    fn append_log(&mut self, event: LogEvent) {
        let entry = MonitoringLog::new(self.ctx.clock.now(), event)
            .with_battery(self.last_power.as_ref().map(|p| p.level_percent))
            .with_location(self.last_location.as_ref().map(PositionSample::point));
        {
            let mut shared = self.ctx.shared.write();
            shared.logs.append(entry.clone());
            shared.metrics.log_entries += 1;
        }
        self.ctx.observer.on_log_appended(&entry);
    }

    fn publish_detector(&self) {
        self.ctx.shared.write().detector = Some(self.detector.clone());
    }

    fn publish_emergency(&self) {
        let state = self.emergency.state();
        self.ctx.shared.write().emergency = state;
        self.ctx.observer.on_emergency_mode_changed(&state);
    }

    fn note_dropped(&mut self) {
        let dropped = self.queue.dropped();
        if dropped > self.dropped_seen {
            tracing::warn!(
                dropped = dropped - self.dropped_seen,
                "event queue overflowed, oldest samples dropped"
            );
            self.ctx.shared.write().metrics.samples_dropped += dropped - self.dropped_seen;
            self.dropped_seen = dropped;
        }
    }
}

impl Drop for ControlLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
            tracing::debug!("in-flight dispatch aborted");
        }
    }
}

/// Awaits the in-flight dispatch, or never completes when there is none.
async fn join_inflight(
    slot: &mut Option<JoinHandle<DispatchResult>>,
) -> Result<DispatchResult, JoinError> {
    match slot.as_mut() {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
