// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`MessageChannel`] trait: the seam to the platform's messaging stack.

use crate::ChannelError;

/// Per-recipient result of one send, keyed by phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent_to: Vec<String>,
    pub failed: Vec<String>,
}

impl DeliveryReport {
    /// A report in which every recipient failed.
    pub fn all_failed(recipients: &[String]) -> Self {
        Self {
            sent_to: Vec::new(),
            failed: recipients.to_vec(),
        }
    }

    /// A report in which every recipient was confirmed.
    pub fn all_sent(recipients: &[String]) -> Self {
        Self {
            sent_to: recipients.to_vec(),
            failed: Vec::new(),
        }
    }

    pub fn confirmed(&self, phone: &str) -> bool {
        self.sent_to.iter().any(|p| p == phone)
    }
}

/// A message transport (SMS, MMS or equivalent).
///
/// Implementations report per-recipient results rather than failing the
/// whole call when only some recipients fail. An `Err` means nothing was
/// sent.
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Sends `body` to each phone number in `recipients`.
    async fn send(&self, recipients: &[String], body: &str) -> Result<DeliveryReport, ChannelError>;
}

/// A channel that writes messages to the `tracing` log and confirms every
/// recipient. Useful for dry runs and simulations.
#[derive(Debug, Default)]
pub struct LogChannel {
    name: String,
    sent: parking_lot::Mutex<Vec<String>>,
}

impl LogChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Bodies of every message sent so far.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl MessageChannel for LogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, recipients: &[String], body: &str) -> Result<DeliveryReport, ChannelError> {
        tracing::info!(
            channel = %self.name,
            recipients = recipients.len(),
            "message sent:\n{body}"
        );
        self.sent.lock().push(body.to_string());
        Ok(DeliveryReport::all_sent(recipients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_helpers() {
        let r = vec!["+1".to_string(), "+2".to_string()];
        assert!(DeliveryReport::all_sent(&r).confirmed("+2"));
        assert!(!DeliveryReport::all_failed(&r).confirmed("+1"));
        assert_eq!(DeliveryReport::all_failed(&r).failed.len(), 2);
    }

    #[tokio::test]
    async fn test_log_channel_confirms_all() {
        let ch = LogChannel::new("dry-run");
        let r = vec!["+1".to_string()];
        let report = ch.send(&r, "hello").await.unwrap();
        assert_eq!(report.sent_to, r);
        assert_eq!(ch.sent_messages(), vec!["hello".to_string()]);
    }
}
