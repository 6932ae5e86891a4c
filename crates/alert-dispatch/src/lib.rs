// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # alert-dispatch
//!
//! Composes an emergency message and delivers it to every active contact.
//!
//! ```text
//! contacts ──filter active──► compose ──► secondary channel (prefer_mms)
//!                                              │ zero confirmed / error / timeout
//!                                              ▼
//!                                         primary channel (once)
//!                                              │
//!                                              ▼
//!                                  AlertOutcome { sent_to, failed }
//! ```
//!
//! The dispatcher is stateless between calls: it reads the inputs it is
//! given and returns a typed outcome. Serialising concurrent dispatches and
//! applying the outcome (emergency mode, logging) is the orchestrator's job.

mod channel;
mod dispatcher;
mod error;
pub mod message;

pub use channel::{DeliveryReport, LogChannel, MessageChannel};
pub use dispatcher::{AlertDispatcher, DEFAULT_CHANNEL_TIMEOUT};
pub use error::{ChannelError, DispatchError};
