// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trakind locations`: the static office catalog.

use serde::Serialize;

use trakind_core::TrakindError;
use trakind_core::catalog::LOCATIONS;

#[derive(Debug, Serialize)]
struct LocationEntry {
    code: &'static str,
    name: &'static str,
    actions: Vec<&'static str>,
}

fn entries() -> Vec<LocationEntry> {
    LOCATIONS
        .iter()
        .map(|l| LocationEntry {
            code: l.code,
            name: l.name,
            actions: l.available_actions.iter().map(|a| a.code).collect(),
        })
        .collect()
}

pub fn print_locations(json: bool) -> Result<(), TrakindError> {
    let entries = entries();
    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| TrakindError::Internal(format!("failed to encode locations: {e}")))?;
        println!("{out}");
        return Ok(());
    }
    for entry in &entries {
        println!("{:<6} {:<24} {}", entry.code, entry.name, entry.actions.join(", "));
    }
    Ok(())
}
