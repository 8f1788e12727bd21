use std::collections::TryReserveError;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::RECORD_SEPARATOR;
use crate::error::ProtocolError;
use crate::identity::try_copy_str;

/// Add `delta` votes to `votes`, saturating at `u64::MAX`.
pub fn add_votes(votes: u64, delta: u64) -> u64 {
    votes.saturating_add(delta)
}

/// Remove `delta` votes from `votes`. A count never goes below zero.
pub fn remove_votes_clamped(votes: u64, delta: u64) -> u64 {
    votes.saturating_sub(delta)
}

/// How a vote update combines the stored count with the supplied delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCombine {
    /// `votes + delta`
    Add,
    /// `max(votes - delta, 0)`
    SubtractClamped,
}

impl VoteCombine {
    pub fn apply(self, votes: u64, delta: u64) -> u64 {
        match self {
            VoteCombine::Add => add_votes(votes, delta),
            VoteCombine::SubtractClamped => remove_votes_clamped(votes, delta),
        }
    }
}

impl fmt::Display for VoteCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteCombine::Add => write!(f, "add"),
            VoteCombine::SubtractClamped => write!(f, "subtract_clamped"),
        }
    }
}

/// A tribe as seen from one area: its name and the votes it got there.
///
/// The packed form `name$votes` (see [`fmt::Display`] and [`FromStr`]) is a
/// boundary encoding only; rosters store the structured record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TribeRecord {
    pub name: String,
    pub votes: u64,
}

impl TribeRecord {
    /// Build a record, copying `name` with an allocation check.
    pub fn try_new(name: &str, votes: u64) -> Result<Self, TryReserveError> {
        Ok(Self {
            name: try_copy_str(name)?,
            votes,
        })
    }

    /// Apply a vote update in place and return the new count.
    pub fn combine(&mut self, delta: u64, combine: VoteCombine) -> u64 {
        self.votes = combine.apply(self.votes, delta);
        self.votes
    }
}

impl fmt::Display for TribeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, RECORD_SEPARATOR, self.votes)
    }
}

impl FromStr for TribeRecord {
    type Err = ProtocolError;

    /// Split on the first separator; the remainder must be a vote count.
    fn from_str(packed: &str) -> Result<Self, Self::Err> {
        let (name, votes) = packed
            .split_once(RECORD_SEPARATOR)
            .ok_or_else(|| ProtocolError::InvalidRecord(packed.to_string()))?;
        if votes.is_empty() || !votes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::InvalidRecord(packed.to_string()));
        }
        let votes = votes
            .parse()
            .map_err(|_| ProtocolError::InvalidRecord(packed.to_string()))?;
        Ok(Self {
            name: try_copy_str(name)?,
            votes,
        })
    }
}
