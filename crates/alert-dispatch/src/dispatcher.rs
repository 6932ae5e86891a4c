// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The alert dispatcher: fan-out with a single channel fallback.

use crate::{message, DeliveryReport, DispatchError, MessageChannel};
use chrono::{DateTime, Utc};
use safety_model::{
    AlertId, AlertOutcome, ChannelKind, EmergencyContact, MonitoringSettings, PositionSample,
    TriggerType, UserProfile,
};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on a single channel send.
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(15);

/// Sends emergency messages to contacts over a primary and a secondary channel.
///
/// Holds only immutable configuration, so a single instance can be shared
/// behind an `Arc` by the orchestrator's dispatch task.
pub struct AlertDispatcher {
    primary: Arc<dyn MessageChannel>,
    secondary: Arc<dyn MessageChannel>,
    profile: UserProfile,
    timeout: Duration,
}

impl AlertDispatcher {
    pub fn new(primary: Arc<dyn MessageChannel>, secondary: Arc<dyn MessageChannel>) -> Self {
        Self {
            primary,
            secondary,
            profile: UserProfile::default(),
            timeout: DEFAULT_CHANNEL_TIMEOUT,
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Dispatches one alert stamped `dispatched_at`.
    ///
    /// Steps:
    /// 1. Keep only active contacts; none → [`DispatchError::NoActiveContacts`].
    /// 2. Require a location → [`DispatchError::NoLocation`].
    /// 3. Compose the message once.
    /// 4. With `prefer_mms`, try the secondary channel and fall back to the
    ///    primary exactly once if it confirmed nobody. Otherwise use the
    ///    primary only.
    /// 5. Attribute the report back to contacts. Any confirmed contact makes
    ///    the dispatch a success; none yields [`DispatchError::Undelivered`].
    pub async fn dispatch(
        &self,
        trigger: TriggerType,
        dispatched_at: DateTime<Utc>,
        location: Option<&PositionSample>,
        battery_level: Option<u8>,
        contacts: &[EmergencyContact],
        settings: &MonitoringSettings,
    ) -> Result<AlertOutcome, DispatchError> {
        let recipients: Vec<&EmergencyContact> = contacts.iter().filter(|c| c.is_active).collect();
        if recipients.is_empty() {
            tracing::warn!(%trigger, "dispatch aborted: no active contacts");
            return Err(DispatchError::NoActiveContacts);
        }
        let location = location.ok_or_else(|| {
            tracing::warn!(%trigger, "dispatch aborted: no location fix");
            DispatchError::NoLocation
        })?;

        let alert_id = AlertId::new();
        let body = message::compose(trigger, dispatched_at, location, battery_level, &self.profile);
        let phones: Vec<String> = recipients.iter().map(|c| c.phone_number.clone()).collect();

        tracing::info!(
            alert_id = %alert_id,
            %trigger,
            recipients = phones.len(),
            prefer_mms = settings.prefer_mms,
            "dispatching alert"
        );

        let (channel, report, fell_back) = if settings.prefer_mms {
            let report = self.attempt(ChannelKind::Secondary, &phones, &body).await;
            if report.sent_to.is_empty() {
                tracing::warn!(alert_id = %alert_id, "secondary channel confirmed nobody, falling back to primary");
                let report = self.attempt(ChannelKind::Primary, &phones, &body).await;
                (ChannelKind::Primary, report, true)
            } else {
                (ChannelKind::Secondary, report, false)
            }
        } else {
            let report = self.attempt(ChannelKind::Primary, &phones, &body).await;
            (ChannelKind::Primary, report, false)
        };

        let (sent_to, failed) = recipients
            .iter()
            .partition::<Vec<&&EmergencyContact>, _>(|c| report.confirmed(&c.phone_number));

        let outcome = AlertOutcome {
            alert_id,
            trigger,
            sent_to: sent_to.into_iter().map(|c| c.id.clone()).collect(),
            failed: failed.into_iter().map(|c| c.id.clone()).collect(),
            channel,
            fell_back,
            dispatched_at,
        };

        if outcome.is_success() {
            tracing::info!(alert_id = %alert_id, "{}", outcome.summary());
            Ok(outcome)
        } else {
            tracing::warn!(alert_id = %alert_id, "{}", outcome.summary());
            Err(DispatchError::Undelivered(Box::new(outcome)))
        }
    }

    /// One bounded send. Errors and timeouts become an all-failed report.
    async fn attempt(&self, kind: ChannelKind, phones: &[String], body: &str) -> DeliveryReport {
        let channel = match kind {
            ChannelKind::Primary => &self.primary,
            ChannelKind::Secondary => &self.secondary,
        };
        match tokio::time::timeout(self.timeout, channel.send(phones, body)).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                tracing::warn!(channel = channel.name(), error = %e, "channel send failed");
                DeliveryReport::all_failed(phones)
            }
            Err(_) => {
                tracing::warn!(
                    channel = channel.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "channel send timed out"
                );
                DeliveryReport::all_failed(phones)
            }
        }
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
