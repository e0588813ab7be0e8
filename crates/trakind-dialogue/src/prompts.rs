// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts and reply keyboards.

use trakind_core::catalog::{self, ACTIONS};
use trakind_core::types::{MAX_PEOPLE, MIN_PEOPLE};
use trakind_core::{Action, Date, Keyboard, Location};

/// Command menu published to the chat platform.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Start using the bot"),
    (
        "track",
        "Track an IND location for available time slots. You will be asked for the appointment type, location, number of people and an optional date limit.",
    ),
    ("stoptrack", "Stop all tracking"),
    ("stop", "Stop the bot and remove all subscriptions"),
];

pub const SELECT_COMMAND: &str = "Please select a command";
pub const WHICH_ACTION: &str = "Which type of appointment are you interested in?";
pub const WHICH_LOCATION: &str = "Which location?";
pub const HOW_MANY_PEOPLE: &str = "How many people?";
pub const BEFORE_DATE: &str = "Are you interested in time slots before certain date or all? \
     Please reply with a date in format YYYY-MM-DD or a word \"all\".";
pub const SUBSCRIPTION_FAILED: &str = "Failed to create subscription. Please try again.";
pub const TRACKING_STOPPED: &str = "You won't receive new notifications.";
pub const WELCOME: &str = "Hi! I will let you know when IND appointment slots open up. \
     Send /track to choose what to follow and /stoptrack to stop all notifications.";

/// The literal accepted in place of a cut-off date.
pub const ALL_DATES: &str = "all";

pub fn unknown_command(name: &str) -> String {
    format!("No such command {name:?}, please select one of the available commands")
}

pub fn unknown_action(text: &str) -> String {
    format!(
        "Appointment type {text} is not supported, please click on a button with one of the available appointment types."
    )
}

pub fn unknown_location(text: &str) -> String {
    format!(
        "Location {text} is incorrect, please click on a button with one of the available locations."
    )
}

pub fn people_not_a_number() -> String {
    format!(
        "Please reply with number between {MIN_PEOPLE} and {MAX_PEOPLE} or click one of the buttons."
    )
}

pub fn people_out_of_range(count: i64) -> String {
    format!(
        "Incorrect number of people {count}, please select between {MIN_PEOPLE} and {MAX_PEOPLE} or click one of the buttons"
    )
}

pub fn bad_date(text: &str) -> String {
    format!(
        "Incorrect response {text:?}. Please reply with a date in format YYYY-MM-DD or a word \"all\"."
    )
}

pub fn subscribed(
    action: &Action,
    location: &Location,
    people_count: u8,
    track_before: Option<Date>,
) -> String {
    let mut text = format!(
        "You will now get a notification when an open time window found for {} at the location {} for {} people",
        action.name, location.name, people_count
    );
    if let Some(date) = track_before {
        text.push_str(&format!(" before {date}"));
    }
    text.push('.');
    text
}

pub fn actions_keyboard() -> Keyboard {
    Keyboard::single_row(ACTIONS.iter().map(|a| a.name))
}

/// Offices supporting `action`, two to a row.
pub fn locations_keyboard(action: &Action) -> Keyboard {
    Keyboard::chunked(catalog::locations_for_action(action).map(|l| l.name), 2)
}

pub fn people_keyboard() -> Keyboard {
    Keyboard::single_row((MIN_PEOPLE..=MAX_PEOPLE).map(|n| n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_core::catalog::{BIOMETRICS, DOCUMENT_PICKUP, location_by_code};

    #[test]
    fn subscribed_mentions_date_only_when_set() {
        let am = location_by_code("AM").unwrap();
        assert_eq!(
            subscribed(&DOCUMENT_PICKUP, am, 2, None),
            "You will now get a notification when an open time window found for Document pickup at the location IND Amsterdam for 2 people."
        );
        let date = Date::parse("2024-06-01").unwrap();
        assert!(subscribed(&DOCUMENT_PICKUP, am, 2, Some(date)).ends_with("for 2 people before 2024-06-01."));
    }

    #[test]
    fn keyboards_list_the_catalog() {
        let actions: Vec<_> = actions_keyboard().options().map(str::to_string).collect();
        assert_eq!(actions, vec!["Document pickup", "Biometrics"]);

        let doc = locations_keyboard(&DOCUMENT_PICKUP);
        assert_eq!(doc.rows.len(), 2);
        assert!(doc.rows.iter().all(|row| row.len() == 2));
        assert_eq!(locations_keyboard(&BIOMETRICS).options().count(), 14);

        let people: Vec<_> = people_keyboard().options().map(str::to_string).collect();
        assert_eq!(people, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn quoted_inputs_are_escaped() {
        assert_eq!(
            unknown_command("foo"),
            "No such command \"foo\", please select one of the available commands"
        );
        assert_eq!(
            bad_date("tomorrow"),
            "Incorrect response \"tomorrow\". Please reply with a date in format YYYY-MM-DD or a word \"all\"."
        );
    }
}
