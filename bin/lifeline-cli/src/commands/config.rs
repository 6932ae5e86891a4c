// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lifeline config` command: print or validate configuration.

use monitor_runtime::MonitorConfig;
use std::path::PathBuf;

pub fn execute(config: Option<PathBuf>, validate: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = validate {
        let parsed = MonitorConfig::from_file(&path)?;
        println!("{}: OK", path.display());
        let s = &parsed.settings;
        println!(
            "  inactivity {} min, battery {}%, tick {} s, grace {} s, cool-down {} s",
            s.inactivity_threshold_minutes,
            s.battery_threshold_percent,
            s.update_interval_seconds,
            parsed.grace_period_seconds,
            parsed.emergency_cooldown_seconds,
        );
        println!(
            "  monitoring {}, auto-SOS {}, prefer MMS {}",
            on_off(s.monitoring_enabled),
            on_off(s.auto_sos_enabled),
            on_off(s.prefer_mms),
        );
        return Ok(());
    }

    let current = super::load_config(config.as_deref())?;
    print!("{}", current.to_toml()?);
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
