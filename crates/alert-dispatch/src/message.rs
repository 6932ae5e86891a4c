// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Emergency message template.
//!
//! ```text
//! SOS - no movement detected
//! Time: 2025-03-01T09:00:00+00:00
//! Battery: 42%
//! Address: 1 Main St
//! Location: 37.774900, -122.419400
//! Map: https://maps.google.com/?q=37.774900,-122.419400
//! Name: Ada
//! Medical notes: asthma
//! ```
//!
//! Optional lines (battery, address, profile fields) are left out entirely
//! when the value is missing or blank.

use chrono::{DateTime, SecondsFormat, Utc};
use safety_model::{PositionSample, TriggerType, UserProfile};

/// Renders the alert body shared by every trigger type.
pub fn compose(
    trigger: TriggerType,
    at: DateTime<Utc>,
    location: &PositionSample,
    battery_level: Option<u8>,
    profile: &UserProfile,
) -> String {
    let mut lines = vec![
        trigger.label().to_string(),
        format!("Time: {}", at.to_rfc3339_opts(SecondsFormat::Secs, false)),
    ];
    if let Some(level) = battery_level {
        lines.push(format!("Battery: {level}%"));
    }
    push_optional(&mut lines, "Address", location.address.as_deref());
    lines.push(format!("Location: {}", location.point()));
    lines.push(format!("Map: {}", location.map_link()));

    push_optional(&mut lines, "Name", profile.name.as_deref());
    push_optional(&mut lines, "Phone", profile.phone.as_deref());
    push_optional(&mut lines, "Email", profile.email.as_deref());
    push_optional(&mut lines, "Medical notes", profile.medical_notes.as_deref());
    lines.join("\n")
}

fn push_optional(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        lines.push(format!("{label}: {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn position() -> PositionSample {
        PositionSample::new(37.7749, -122.4194, at())
    }

    #[test]
    fn test_minimal_message() {
        let body = compose(TriggerType::Manual, at(), &position(), None, &UserProfile::default());
        assert_eq!(
            body,
            "SOS - manual emergency alert\n\
             Time: 2025-03-01T09:00:00+00:00\n\
             Location: 37.774900, -122.419400\n\
             Map: https://maps.google.com/?q=37.774900,-122.419400"
        );
    }

    #[test]
    fn test_full_message() {
        let profile = UserProfile {
            name: Some("Ada".into()),
            phone: Some("+4400".into()),
            email: None,
            medical_notes: Some("asthma".into()),
        };
        let body = compose(
            TriggerType::Automatic,
            at(),
            &position().with_address("1 Main St"),
            Some(42),
            &profile,
        );
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines[0], "SOS - no movement detected");
        assert_eq!(lines[2], "Battery: 42%");
        assert_eq!(lines[3], "Address: 1 Main St");
        assert_eq!(lines[6], "Name: Ada");
        assert_eq!(lines[7], "Phone: +4400");
        assert_eq!(lines[8], "Medical notes: asthma");
        assert_eq!(lines.len(), 9);
        assert!(!body.contains("Email"));
    }

    #[test]
    fn test_blank_fields_omitted() {
        let profile = UserProfile {
            name: Some("   ".into()),
            ..Default::default()
        };
        let body = compose(TriggerType::BatteryLow, at(), &position().with_address(""), Some(5), &profile);
        assert!(!body.contains("Name"));
        assert!(!body.contains("Address"));
        assert!(body.starts_with("SOS - phone battery critically low"));
    }
}
