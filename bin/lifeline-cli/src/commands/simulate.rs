// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lifeline simulate` command: run the engine against scripted providers.
//!
//! The providers are in-process tasks that emit samples on the engine's
//! clock. Messages go to a [`LogChannel`], which confirms every recipient,
//! or to a channel that always fails when `--fail-mms` is given.

use activity_log::{LogKind, MergedEntry, MergedPayload, DEFAULT_BUCKET_MS};
use alert_dispatch::{ChannelError, DeliveryReport, LogChannel, MessageChannel};
use chrono::{DateTime, Utc};
use monitor_runtime::{
    Collaborators, MotionProvider, Orchestrator, PositionProvider, PowerProvider, ProviderError,
    SampleSink, SharedSettings, Started, SubscriptionHandle,
};
use parking_lot::Mutex;
use safety_model::{ContactList, EmergencyContact, MotionSample, PositionSample, PowerSample};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Motion sensors report far more often than the tick.
const MOTION_PERIOD: Duration = Duration::from_secs(2);

/// What the simulated user and device do.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub seconds: u64,
    pub still: bool,
    pub battery_drain: f64,
    pub fail_mms: bool,
}

pub async fn execute(config: Option<PathBuf>, scenario: Scenario) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            lifeline · Monitoring Simulator           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    let config = super::load_config(config.as_deref())?;
    let s = &config.settings;
    println!("  Scenario:");
    println!("   Duration:     {} s (simulated)", scenario.seconds);
    println!("   User:         {}", if scenario.still { "not moving" } else { "moving" });
    println!("   Battery:      -{}% per sample", scenario.battery_drain);
    println!("   MMS channel:  {}", if scenario.fail_mms { "failing" } else { "working" });
    println!(
        "   Thresholds:   {} min idle, {}% battery, {} s tick, {} s grace",
        s.inactivity_threshold_minutes,
        s.battery_threshold_percent,
        s.update_interval_seconds,
        config.grace_period_seconds,
    );
    println!();

    // ── Wiring ─────────────────────────────────────────────────
    let sms = Arc::new(LogChannel::new("sms"));
    let mms: Arc<dyn MessageChannel> = if scenario.fail_mms {
        Arc::new(FailingChannel)
    } else {
        Arc::new(LogChannel::new("mms"))
    };
    let contacts = ContactList::from_contacts([
        EmergencyContact::new("c1", "Primary Contact", "+15550100").primary(),
        EmergencyContact::new("c2", "Neighbour", "+15550101"),
        EmergencyContact::new("c3", "Former Contact", "+15550102").inactive(),
    ])?;
    let collaborators = Collaborators::new(
        Arc::new(ScriptedPosition::default()),
        Arc::new(ScriptedPower::new(scenario.battery_drain)),
        Arc::new(ScriptedMotion::new(scenario.still)),
        sms.clone(),
        mms,
        Arc::new(contacts),
        Arc::new(SharedSettings::new(config.settings.clone())),
    );
    let mut orch = Orchestrator::new(collaborators, config)?;

    // ── Run ────────────────────────────────────────────────────
    println!("  [1/2] Monitoring...");
    match orch.start().await? {
        Started::Running { degraded } if degraded.is_empty() => {
            println!("        all providers subscribed");
        }
        Started::Running { degraded } => {
            let names: Vec<String> = degraded.iter().map(|k| k.to_string()).collect();
            println!("        degraded: {}", names.join(", "));
        }
        Started::AlreadyRunning => {}
    }
    tokio::time::sleep(Duration::from_secs(scenario.seconds)).await;
    orch.stop().await;
    println!("        stopped after {} s", scenario.seconds);
    println!();

    // ── Report ─────────────────────────────────────────────────
    println!("  [2/2] Timeline ({}-second buckets)", DEFAULT_BUCKET_MS / 1000);
    for entry in orch.merged_timeline(DEFAULT_BUCKET_MS) {
        println!("   {}", timeline_row(&entry));
    }
    println!();

    if let Some(outcome) = orch.last_outcome() {
        println!("  Last alert:   {}", outcome.summary());
    }
    let mode = orch.emergency_mode();
    println!(
        "  Emergency:    {}",
        if mode.active { "ACTIVE" } else { "normal" }
    );
    if let Some(body) = sms.sent_messages().last() {
        println!();
        println!("  Last SMS body:");
        for line in body.lines() {
            println!("   | {line}");
        }
    }
    println!();
    println!("{}", orch.metrics().summary());

    Ok(())
}

fn timeline_row(entry: &MergedEntry) -> String {
    let battery = entry
        .battery_level
        .map(|b| format!("{b:>3}%"))
        .unwrap_or_else(|| "   -".into());
    let detail = match &entry.payload {
        MergedPayload::Text(text) => text.replace('\n', " / "),
        MergedPayload::Event(_) if entry.kind == LogKind::SosSent => "alert sent".into(),
        MergedPayload::Event(_) => String::new(),
    };
    format!(
        "{}  {:<16} {}  x{:<3} {}",
        entry.timestamp.format("%H:%M:%S"),
        format!("{:?}", entry.kind),
        battery,
        entry.merged_count,
        detail,
    )
}

// ── Scripted providers ─────────────────────────────────────────

/// Runs `next` every `period`, pushing its sample into `sink`.
fn spawn_feed<T, F>(period: Duration, sink: SampleSink<T>, mut next: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnMut(DateTime<Utc>) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            sink.push(next(sink.now()));
        }
    })
}

/// One subscription at a time; unsubscribing stops the feed.
#[derive(Default)]
struct Feed(Mutex<Option<JoinHandle<()>>>);

impl Feed {
    fn attach(&self, handle: JoinHandle<()>) -> SubscriptionHandle {
        if let Some(old) = self.0.lock().replace(handle) {
            old.abort();
        }
        SubscriptionHandle::new(1)
    }

    fn detach(&self) {
        if let Some(handle) = self.0.lock().take() {
            handle.abort();
        }
    }
}

/// A user walking slowly north-east from central London.
#[derive(Default)]
struct ScriptedPosition {
    feed: Feed,
}

#[async_trait::async_trait]
impl PositionProvider for ScriptedPosition {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn subscribe(
        &self,
        interval: Duration,
        sink: SampleSink<PositionSample>,
    ) -> Result<SubscriptionHandle, ProviderError> {
        let mut step = 0.0;
        let handle = spawn_feed(interval, sink, move |now| {
            step += 1.0;
            PositionSample::new(51.5074 + step * 1e-4, -0.1278 + step * 1e-4, now)
                .with_accuracy(12.0)
                .with_address("Trafalgar Square, London")
        });
        Ok(self.feed.attach(handle))
    }

    async fn unsubscribe(&self, _handle: SubscriptionHandle) {
        self.feed.detach();
    }
}

/// A battery discharging at a fixed rate per sample.
struct ScriptedPower {
    drain: f64,
    feed: Feed,
}

impl ScriptedPower {
    fn new(drain: f64) -> Self {
        Self {
            drain: drain.max(0.0),
            feed: Feed::default(),
        }
    }
}

#[async_trait::async_trait]
impl PowerProvider for ScriptedPower {
    async fn subscribe(
        &self,
        interval: Duration,
        sink: SampleSink<PowerSample>,
    ) -> Result<SubscriptionHandle, ProviderError> {
        let drain = self.drain;
        let mut level = 100.0_f64;
        let handle = spawn_feed(interval, sink, move |now| {
            let sample = PowerSample::new(level.round() as u8, false, now);
            level = (level - drain).max(0.0);
            sample
        });
        Ok(self.feed.attach(handle))
    }

    async fn unsubscribe(&self, _handle: SubscriptionHandle) {
        self.feed.detach();
    }
}

/// Accelerometer magnitudes: a walking gait, or near-zero when still.
struct ScriptedMotion {
    still: bool,
    feed: Feed,
}

impl ScriptedMotion {
    fn new(still: bool) -> Self {
        Self {
            still,
            feed: Feed::default(),
        }
    }
}

#[async_trait::async_trait]
impl MotionProvider for ScriptedMotion {
    fn is_available(&self) -> bool {
        true
    }

    async fn subscribe(
        &self,
        sink: SampleSink<MotionSample>,
    ) -> Result<SubscriptionHandle, ProviderError> {
        let still = self.still;
        let mut n = 0_u32;
        let handle = spawn_feed(MOTION_PERIOD, sink, move |now| {
            n = n.wrapping_add(1);
            let magnitude = match (still, n % 2) {
                (true, _) => 0.05,
                (false, 0) => 2.4,
                (false, _) => 0.6,
            };
            MotionSample::new(magnitude, now)
        });
        Ok(self.feed.attach(handle))
    }

    async fn unsubscribe(&self, _handle: SubscriptionHandle) {
        self.feed.detach();
    }
}

/// A transport that rejects every send.
struct FailingChannel;

#[async_trait::async_trait]
impl MessageChannel for FailingChannel {
    fn name(&self) -> &str {
        "mms"
    }

    async fn send(&self, _recipients: &[String], _body: &str) -> Result<DeliveryReport, ChannelError> {
        Err(ChannelError::SendFailed {
            channel: "mms".into(),
            detail: "simulated carrier rejection".into(),
        })
    }
}
