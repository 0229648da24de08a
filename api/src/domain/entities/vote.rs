//! Vote domain entity
//!
//! One vote per (user, post). A vote is either up (+1) or down (-1).

use serde::{Deserialize, Serialize};

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Normalise a client-supplied integer: any positive value is an upvote,
    /// any negative one a downvote. Zero is not a vote.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => None,
            v if v > 0 => Some(VoteValue::Up),
            _ => Some(VoteValue::Down),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

/// What a vote did to the post's points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this user on this post
    Cast,
    /// The user flipped an earlier vote
    Changed,
    /// Same vote as before, nothing changed
    Unchanged,
}

impl VoteOutcome {
    /// Points delta implied by this outcome for `value`
    pub fn points_delta(self, value: VoteValue) -> i32 {
        match self {
            VoteOutcome::Cast => value.as_i32(),
            VoteOutcome::Changed => 2 * value.as_i32(),
            VoteOutcome::Unchanged => 0,
        }
    }

    /// Decide the outcome from the user's existing vote, if any
    pub fn resolve(existing: Option<VoteValue>, value: VoteValue) -> Self {
        match existing {
            None => VoteOutcome::Cast,
            Some(prev) if prev == value => VoteOutcome::Unchanged,
            Some(_) => VoteOutcome::Changed,
        }
    }
}
