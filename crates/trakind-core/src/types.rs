// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the dialogue, the tracker and the adapters.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::catalog;
use crate::error::{ParseError, TrakindError};

/// Calendar date layout used by the scheduling API and by user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day layout used by the scheduling API.
pub const TIME_FORMAT: &str = "%H:%M";

/// Party size limits accepted by the scheduling API.
pub const MIN_PEOPLE: u8 = 1;
pub const MAX_PEOPLE: u8 = 6;

/// Telegram-style chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A kind of appointment that can be booked, e.g. document pickup.
///
/// Two actions are the same action when their codes are equal.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Action {
    pub name: &'static str,
    pub code: &'static str,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// An office where appointments take place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub name: &'static str,
    pub code: &'static str,
    pub available_actions: &'static [Action],
}

impl Location {
    /// Whether appointments of the given kind can be scheduled here.
    pub fn supports(&self, action: &Action) -> bool {
        self.available_actions.contains(action)
    }
}

/// A calendar date in `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| ParseError::InvalidFormat {
                input: input.to_string(),
                expected: "YYYY-MM-DD",
            })
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Date {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.to_string()
    }
}

/// A time of day in 24-hour `HH:MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| ParseError::InvalidFormat {
                input: input.to_string(),
                expected: "HH:MM",
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// One open appointment slot as published by the scheduling API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub date: Date,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(rename = "parts")]
    pub party_size: u32,
}

/// Body of a slot availability response, after the preamble is removed.
///
/// `data` is ordered ascending by date and start time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<TimeWindow>,
}

/// A chat's request to be told about slots for one action at one location.
///
/// Equality is field-by-field; there is no separate identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub chat_id: ChatId,
    pub people_count: u8,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_before: Option<Date>,
}

impl Subscription {
    /// Builds a subscription, rejecting party sizes outside `1..=6`.
    pub fn new(
        chat_id: ChatId,
        people_count: u8,
        action: &Action,
        track_before: Option<Date>,
    ) -> Result<Self, TrakindError> {
        let subscription = Self {
            chat_id,
            people_count,
            action: action.code.to_string(),
            track_before,
        };
        subscription.validate()?;
        Ok(subscription)
    }

    /// Checks the party size range and that the action code is known.
    pub fn validate(&self) -> Result<(), TrakindError> {
        if !(MIN_PEOPLE..=MAX_PEOPLE).contains(&self.people_count) {
            return Err(TrakindError::Validation(format!(
                "people count must be between {MIN_PEOPLE} and {MAX_PEOPLE}, got {}",
                self.people_count
            )));
        }
        if catalog::action_by_code(&self.action).is_none() {
            return Err(TrakindError::Validation(format!(
                "unknown action code `{}`",
                self.action
            )));
        }
        Ok(())
    }

    /// True iff no cut-off date is set or the window is on or before it.
    ///
    /// Action and party size are not checked here; the tracker filters on
    /// those before calling this.
    pub fn matches(&self, window: &TimeWindow) -> bool {
        match self.track_before {
            None => true,
            Some(before) => window.date <= before,
        }
    }
}

// --- Channel types ---

/// Unique identifier for a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A bot command such as `/track` with its whitespace-separated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    /// Parses `/name@bot arg1 arg2` into a command. Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// An inbound chat message, reduced to what the dialogue needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub command: Option<Command>,
}

impl InboundMessage {
    /// Builds a message, detecting a leading bot command.
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        let text = text.into();
        let command = Command::parse(&text);
        Self {
            chat_id,
            text,
            command,
        }
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.name.as_str())
    }
}

/// Selectable reply options rendered under a message, as rows of button labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    /// All options in a single row.
    pub fn single_row<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: vec![options.into_iter().map(Into::into).collect()],
        }
    }

    /// Options laid out `per_row` to a row; the last row may be shorter.
    pub fn chunked<I, S>(options: I, per_row: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        Self {
            rows: options
                .chunks(per_row.max(1))
                .map(<[String]>::to_vec)
                .collect(),
        }
    }

    /// Iterates over every button label.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// Reply markup attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Markup {
    /// Leave whatever keyboard the chat shows untouched.
    #[default]
    None,
    /// Hide the keyboard left over from a previous prompt.
    RemoveKeyboard,
    Keyboard(Keyboard),
}

/// An outbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub markup: Markup,
}

impl OutboundMessage {
    /// A plain message without reply markup.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            markup: Markup::None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.markup = Markup::Keyboard(keyboard);
        self
    }

    pub fn removing_keyboard(mut self) -> Self {
        self.markup = Markup::RemoveKeyboard;
        self
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match &self.markup {
            Markup::Keyboard(keyboard) => Some(keyboard),
            Markup::None | Markup::RemoveKeyboard => None,
        }
    }
}

// --- Adapter types ---

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Storage,
}
