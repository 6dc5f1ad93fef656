//! Vote state.
//!
//! Vote rows are keyed by (user, target) and only ever hold `UP` or
//! `DOWN`; the absence of a row is the `NONE` state. The ledger works on
//! raw documents because the target foreign-key field differs per ledger
//! instance, so there is no typed row struct here.

use serde::{Deserialize, Serialize};

/// A user's vote state on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Up,
    Down,
    None,
}

impl VoteType {
    /// The counter field on the target this state contributes to, if any.
    pub(crate) fn counter_field(self) -> Option<&'static str> {
        match self {
            VoteType::Up => Some("upvotesCount"),
            VoteType::Down => Some("downvotesCount"),
            VoteType::None => None,
        }
    }
}
