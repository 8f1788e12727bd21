//! tribevote Election - validating facade and scenario runner
//!
//! The election is the only entry point callers use. It:
//! - Validates ids (non-negative), names (lowercase letters and spaces)
//!   and vote counts (strictly positive)
//! - Checks existence before delegating to the area list
//! - Translates every lower-layer error into [`ElectionError`]
//!
//! The crate also ships the `tribevote` binary, which loads a TOML
//! configuration and replays a TOML scenario of election steps.

pub mod config;
pub mod election;
pub mod runner;
pub mod scenario;

pub use config::TallyConfig;
pub use election::Election;
pub use runner::{RunSummary, ScenarioRunner};
pub use scenario::{Scenario, Step};

use thiserror::Error;
use tribevote_protocol::{AreaId, TribeId};
use tribevote_tally::AreaError;

/// Errors reported by the election facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElectionError {
    #[error("Out of memory")]
    OutOfMemory,

    #[error("Invalid id: {0}")]
    InvalidId(i64),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Invalid vote count: {0}")]
    InvalidVotes(i64),

    #[error("Area {0} already exists")]
    AreaAlreadyExists(AreaId),

    #[error("Area {0} does not exist")]
    AreaNotExist(AreaId),

    #[error("Tribe {0} already exists")]
    TribeAlreadyExists(TribeId),

    #[error("Tribe {0} does not exist")]
    TribeNotExist(TribeId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AreaError> for ElectionError {
    fn from(err: AreaError) -> Self {
        match err {
            AreaError::OutOfMemory => ElectionError::OutOfMemory,
            AreaError::AlreadyExists(id) => ElectionError::AreaAlreadyExists(id),
            AreaError::NotExist(id) => ElectionError::AreaNotExist(id),
            AreaError::TribeAlreadyExists(id) => ElectionError::TribeAlreadyExists(id),
            AreaError::TribeNotExist(id) => ElectionError::TribeNotExist(id),
            AreaError::Inconsistent(reason) => ElectionError::Internal(reason),
        }
    }
}
