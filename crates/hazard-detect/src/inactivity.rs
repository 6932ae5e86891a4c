// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inactivity detection from motion samples.
//!
//! ```text
//!            idle >= threshold
//!   Active ─────────────────────► WarningRaised
//!     ▲   raise_warning()               │
//!     │                                 │ confirm_safety() / escalate()
//!     │                                 │ qualifying motion sample
//!     └─────────────────────────────────┘
//! ```
//!
//! The detector keeps a single "last activity" timestamp, never a history.
//! The grace-period timer belongs to the caller; the detector only records
//! when the warning was raised so the caller can tell a stale timer from a
//! live one.

use crate::threshold::{classify_inactivity, InactivityStatus};
use chrono::{DateTime, Utc};
use safety_model::MotionSample;
use std::time::Duration;

/// Current state of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Active,
    WarningRaised { raised_at: DateTime<Utc> },
}

/// Tracks idle time and the inactivity warning.
#[derive(Debug, Clone)]
pub struct InactivityDetector {
    threshold: Duration,
    movement_threshold: f64,
    last_activity_at: DateTime<Utc>,
    state: DetectorState,
}

impl InactivityDetector {
    /// Creates a detector whose idle clock starts at `now`.
    pub fn new(threshold: Duration, movement_threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            threshold,
            movement_threshold,
            last_activity_at: now,
            state: DetectorState::Active,
        }
    }

    /// Updates the idle threshold; takes effect on the next check.
    pub fn set_threshold(&mut self, threshold: Duration) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Feeds a motion sample. Returns `true` if it counted as movement.
    ///
    /// Movement resets idle time and clears any outstanding warning,
    /// whatever state the detector is in.
    pub fn on_motion_sample(&mut self, sample: &MotionSample) -> bool {
        if sample.magnitude <= self.movement_threshold {
            return false;
        }
        if sample.captured_at > self.last_activity_at {
            self.last_activity_at = sample.captured_at;
        }
        if let DetectorState::WarningRaised { .. } = self.state {
            tracing::debug!("movement cleared outstanding inactivity warning");
        }
        self.state = DetectorState::Active;
        true
    }

    /// Returns `true` if idle time at `now` has reached the threshold and no
    /// warning is outstanding yet. Pure with respect to `now`.
    pub fn check_inactivity(&self, now: DateTime<Utc>) -> bool {
        matches!(self.state, DetectorState::Active)
            && classify_inactivity(self.last_activity_at, now, self.threshold).is_inactive
    }

    /// Moves to `WarningRaised`. Returns `false` if a warning was already out.
    pub fn raise_warning(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            DetectorState::WarningRaised { .. } => false,
            DetectorState::Active => {
                self.state = DetectorState::WarningRaised { raised_at: now };
                true
            }
        }
    }

    /// The user confirmed they are fine: back to `Active` with idle time reset.
    ///
    /// Returns `true` if a warning was outstanding.
    pub fn confirm_safety(&mut self, now: DateTime<Utc>) -> bool {
        let was_raised = self.is_warning_raised();
        self.reset(now);
        was_raised
    }

    /// The grace period expired: back to `Active` with idle time reset, so
    /// the same idle stretch cannot re-trigger immediately.
    ///
    /// Returns `false` (and changes nothing) if no warning was outstanding.
    pub fn escalate(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_warning_raised() {
            return false;
        }
        self.reset(now);
        true
    }

    /// Restarts the idle clock at `now` and clears any warning.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
        self.state = DetectorState::Active;
    }

    pub fn status(&self, now: DateTime<Utc>) -> InactivityStatus {
        let mut status = classify_inactivity(self.last_activity_at, now, self.threshold);
        status.warning_raised = self.is_warning_raised();
        status
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_warning_raised(&self) -> bool {
        matches!(self.state, DetectorState::WarningRaised { .. })
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MOVE: f64 = 1.5;

    fn t(min: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(min)
    }

    fn detector() -> InactivityDetector {
        InactivityDetector::new(Duration::from_secs(30 * 60), MOVE, t(0))
    }

    fn moving(at: DateTime<Utc>) -> MotionSample {
        MotionSample::new(MOVE + 1.0, at)
    }

    #[test]
    fn test_thirty_minute_scenario() {
        let mut d = detector();
        d.on_motion_sample(&moving(t(0)));
        assert!(d.check_inactivity(t(31)));
        assert!(d.raise_warning(t(31)));
        assert!(d.confirm_safety(t(31)));
        assert!(!d.check_inactivity(t(32)));
        assert_eq!(d.state(), DetectorState::Active);
    }

    #[test]
    fn test_gap_longer_than_threshold_is_detected() {
        // Qualifying samples at these minutes; any gap > 30 must be flagged
        // by a check made just before the next sample lands.
        let samples = [0, 10, 45, 50, 90, 95];
        let mut d = detector();
        let mut flagged = 0;
        let mut prev = 0;
        for &m in &samples {
            if m - prev > 30 {
                assert!(d.check_inactivity(t(m)), "gap {prev}..{m} missed");
                flagged += 1;
            }
            d.on_motion_sample(&moving(t(m)));
            assert!(!d.check_inactivity(t(m)));
            prev = m;
        }
        assert_eq!(flagged, 2);
    }

    #[test]
    fn test_small_motion_does_not_reset() {
        let mut d = detector();
        assert!(!d.on_motion_sample(&MotionSample::new(MOVE, t(20))));
        assert!(d.check_inactivity(t(30)));
    }

    #[test]
    fn test_motion_clears_warning() {
        let mut d = detector();
        d.raise_warning(t(31));
        assert!(d.is_warning_raised());
        assert!(d.on_motion_sample(&moving(t(32))));
        assert!(!d.is_warning_raised());
        assert!(!d.check_inactivity(t(33)));
    }

    #[test]
    fn test_no_double_warning() {
        let mut d = detector();
        assert!(d.raise_warning(t(31)));
        assert!(!d.check_inactivity(t(40)));
        assert!(!d.raise_warning(t(40)));
    }

    #[test]
    fn test_confirm_long_outstanding_warning() {
        let mut d = detector();
        d.raise_warning(t(31));
        assert!(d.confirm_safety(t(600)));
        assert_eq!(d.status(t(600)).idle_ms, 0);
    }

    #[test]
    fn test_escalate_resets_timer() {
        let mut d = detector();
        assert!(!d.escalate(t(10)));
        d.raise_warning(t(31));
        assert!(d.escalate(t(32)));
        assert!(!d.check_inactivity(t(33)));
        assert!(d.check_inactivity(t(62)));
    }

    #[test]
    fn test_out_of_order_sample_keeps_latest() {
        let mut d = detector();
        d.on_motion_sample(&moving(t(20)));
        d.on_motion_sample(&moving(t(5)));
        assert_eq!(d.last_activity_at(), t(20));
    }

    #[test]
    fn test_status_reports_warning() {
        let mut d = detector();
        d.raise_warning(t(31));
        let s = d.status(t(31));
        assert!(s.is_inactive);
        assert!(s.warning_raised);
        assert_eq!(s.idle_ms, 31 * 60_000);
    }
}
