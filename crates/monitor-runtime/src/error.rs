// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the monitoring runtime.

use safety_model::ModelError;

/// Errors returned by the orchestrator and its configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Settings failed range validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] ModelError),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// `monitoring_enabled` is off in the current settings.
    #[error("monitoring is disabled in settings")]
    Disabled,

    /// No Tokio runtime is available to drive the control loop.
    #[error("no async runtime available to schedule monitoring")]
    SchedulerUnavailable,

    /// A command was issued while monitoring is stopped.
    #[error("monitoring is not running")]
    NotRunning,
}

/// Errors reported by sample providers when subscribing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
