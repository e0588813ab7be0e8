// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat dialogue for trakind.
//!
//! Users subscribe with `/track` (appointment type, office, party size and
//! an optional cut-off date) and unsubscribe with `/stoptrack` or `/stop`.

pub mod prompts;
pub mod router;
pub mod session;
pub mod state;

pub use prompts::COMMANDS;
pub use router::DialogueRouter;
pub use session::{DialogueServices, DialogueSession};
pub use state::DialogueState;
