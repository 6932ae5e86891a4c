// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for alert dispatch.

use safety_model::AlertOutcome;

/// Reasons a dispatch did not reach any contact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No contact is active; no message was composed or sent.
    #[error("no active emergency contacts")]
    NoActiveContacts,

    /// No position fix is available; alerts are never sent without coordinates.
    #[error("no location available")]
    NoLocation,

    /// Every channel attempt failed for every contact.
    #[error("alert {} was not delivered to any of {} contacts", .0.alert_id, .0.failed.len())]
    Undelivered(Box<AlertOutcome>),
}

impl DispatchError {
    /// The outcome of the attempt, if any message was actually sent.
    pub fn outcome(&self) -> Option<&AlertOutcome> {
        match self {
            DispatchError::Undelivered(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Errors reported by a message transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    /// The transport is not usable on this device.
    #[error("channel '{0}' unavailable")]
    Unavailable(String),

    /// The transport accepted the request but failed to send.
    #[error("send failed on '{channel}': {detail}")]
    SendFailed { channel: String, detail: String },
}
