// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialogue states.
//!
//! Each variant carries exactly what the later steps need: the chosen
//! action, then the location, then the party size.

use std::fmt;

use trakind_core::{Action, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// Fresh session, nothing received yet.
    Initial,
    /// Routing a command to its handler.
    CommandDispatch,
    WhichAction,
    WhichLocation {
        action: &'static Action,
    },
    HowManyPeople {
        action: &'static Action,
        location: &'static Location,
    },
    BeforeDate {
        action: &'static Action,
        location: &'static Location,
        people_count: u8,
    },
    StartCommand,
    StopCommand,
    StopTrackCommand,
    /// Terminal. The session is discarded.
    Done,
}

impl DialogueState {
    /// States that read the next user message.
    pub fn awaits_input(&self) -> bool {
        matches!(
            self,
            DialogueState::Initial
                | DialogueState::WhichAction
                | DialogueState::WhichLocation { .. }
                | DialogueState::HowManyPeople { .. }
                | DialogueState::BeforeDate { .. }
        )
    }

    pub fn is_done(&self) -> bool {
        matches!(self, DialogueState::Done)
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueState::Initial => write!(f, "initial"),
            DialogueState::CommandDispatch => write!(f, "command_dispatch"),
            DialogueState::WhichAction => write!(f, "which_action"),
            DialogueState::WhichLocation { .. } => write!(f, "which_location"),
            DialogueState::HowManyPeople { .. } => write!(f, "how_many_people"),
            DialogueState::BeforeDate { .. } => write!(f, "before_date"),
            DialogueState::StartCommand => write!(f, "start_command"),
            DialogueState::StopCommand => write!(f, "stop_command"),
            DialogueState::StopTrackCommand => write!(f, "stop_track_command"),
            DialogueState::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_core::catalog::{DOCUMENT_PICKUP, LOCATIONS};

    #[test]
    fn only_prompting_states_await_input() {
        let location = &LOCATIONS[0];
        assert!(DialogueState::Initial.awaits_input());
        assert!(DialogueState::WhichLocation { action: &DOCUMENT_PICKUP }.awaits_input());
        assert!(
            DialogueState::BeforeDate {
                action: &DOCUMENT_PICKUP,
                location,
                people_count: 2
            }
            .awaits_input()
        );
        assert!(!DialogueState::CommandDispatch.awaits_input());
        assert!(!DialogueState::StopTrackCommand.awaits_input());
        assert!(!DialogueState::Done.awaits_input());
        assert!(DialogueState::Done.is_done());
    }

    #[test]
    fn display_names_are_snake_case() {
        assert_eq!(DialogueState::WhichAction.to_string(), "which_action");
        assert_eq!(
            DialogueState::HowManyPeople {
                action: &DOCUMENT_PICKUP,
                location: &LOCATIONS[0]
            }
            .to_string(),
            "how_many_people"
        );
    }
}
