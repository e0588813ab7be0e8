// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed catalog of appointment kinds and offices.
//!
//! The catalog is static data; nothing mutates it after startup. Lookups are
//! pure functions over the two tables.

use crate::types::{Action, Location};

pub const DOCUMENT_PICKUP: Action = Action {
    name: "Document pickup",
    code: "DOC",
};

pub const BIOMETRICS: Action = Action {
    name: "Biometrics",
    code: "BIO",
};

/// Every supported appointment kind, in menu order.
pub const ACTIONS: &[Action] = &[DOCUMENT_PICKUP, BIOMETRICS];

const DESK_ACTIONS: &[Action] = &[DOCUMENT_PICKUP, BIOMETRICS];
const BIOMETRICS_ONLY: &[Action] = &[BIOMETRICS];

/// Every office, in menu order. The four desks come first.
pub const LOCATIONS: &[Location] = &[
    Location { name: "IND Amsterdam", code: "AM", available_actions: DESK_ACTIONS },
    Location { name: "IND Den Haag", code: "DH", available_actions: DESK_ACTIONS },
    Location { name: "IND Zwolle", code: "ZW", available_actions: DESK_ACTIONS },
    Location { name: "IND Den Bosch", code: "DB", available_actions: DESK_ACTIONS },
    Location { name: "IND Haarlem", code: "HLM", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Amsterdam", code: "EXAM", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Rotterdam", code: "EXRT", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Utrecht", code: "EXUT", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Eindhoven", code: "EXEH", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Groningen", code: "EXGR", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Enschede", code: "EXEN", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Maastricht", code: "EXMT", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Wageningen", code: "EXWA", available_actions: BIOMETRICS_ONLY },
    Location { name: "Expatcenter Leiden", code: "EXLE", available_actions: BIOMETRICS_ONLY },
];

pub fn action_by_code(code: &str) -> Option<&'static Action> {
    ACTIONS.iter().find(|a| a.code == code)
}

/// Exact, case-sensitive match on the display name.
pub fn action_by_name(name: &str) -> Option<&'static Action> {
    ACTIONS.iter().find(|a| a.name == name)
}

pub fn location_by_code(code: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|l| l.code == code)
}

/// Offices where the given action can be scheduled, in menu order.
pub fn locations_for_action(action: &Action) -> impl Iterator<Item = &'static Location> + '_ {
    LOCATIONS.iter().filter(move |l| l.supports(action))
}

/// Case-insensitive name match restricted to offices supporting `action`.
pub fn location_for_name(name: &str, action: &Action) -> Option<&'static Location> {
    let name = name.trim();
    locations_for_action(action).find(|l| l.name.eq_ignore_ascii_case(name))
}

/// One polling target: an office, an action it supports and a party size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedCombination {
    pub location: &'static Location,
    pub action: &'static Action,
    pub people_count: u8,
}

/// Every `(location, action, party size)` tuple the tracker polls.
pub fn tracked_combinations(max_people: u8) -> Vec<TrackedCombination> {
    let mut combinations = Vec::new();
    for location in LOCATIONS {
        for action in location.available_actions {
            for people_count in 1..=max_people {
                combinations.push(TrackedCombination {
                    location,
                    action,
                    people_count,
                });
            }
        }
    }
    combinations
}
