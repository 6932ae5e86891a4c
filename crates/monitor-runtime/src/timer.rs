// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A single cancellable deadline, usable as a `tokio::select!` branch.

use std::time::Duration;
use tokio::time::Instant;

/// An optional point in time at which something should happen.
///
/// Re-arming replaces the previous deadline, so timers never stack. A
/// disarmed deadline never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn disarmed() -> Self {
        Self::default()
    }

    /// Arms the deadline `after` from now, replacing any earlier one.
    pub fn arm(&mut self, after: Duration) {
        self.at = Some(Instant::now() + after);
    }

    pub fn disarm(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Time left until the deadline fires; zero if already due.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Completes when the deadline is reached. Pending forever while
    /// disarmed. The caller disarms after handling.
    pub async fn fired(&self) {
        match self.at {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_duration() {
        let mut d = Deadline::disarmed();
        d.arm(Duration::from_secs(60));
        let start = Instant::now();
        d.fired().await;
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces() {
        let mut d = Deadline::disarmed();
        d.arm(Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(5)).await;
        d.arm(Duration::from_secs(10));
        assert_eq!(d.remaining(), Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_never_fires() {
        let d = Deadline::disarmed();
        let fired = tokio::time::timeout(Duration::from_secs(3600), d.fired()).await;
        assert!(fired.is_err());
        assert!(!d.is_armed());
    }
}
