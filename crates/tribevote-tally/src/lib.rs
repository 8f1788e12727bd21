//! tribevote Tally - Rosters, areas and winners
//!
//! Implements the domain model of the tally engine:
//! - Tribe roster: tribe id -> `{name, votes}` for one area
//! - Area list: every area owns a private roster copy; tribe identity
//!   changes are fanned out to all of them, votes stay local
//! - Winner computation: most votes per area, smaller tribe id on ties

pub mod area_list;
pub mod roster;

pub use area_list::{Area, AreaList};
pub use roster::TribeRoster;

use thiserror::Error;
use tribevote_protocol::{AreaId, ProtocolError, TribeId};
use tribevote_state::MapError;

/// Errors originating from a single roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Tribe {0} already exists")]
    AlreadyExists(TribeId),

    #[error("Tribe {0} does not exist")]
    ItemDoesNotExist(TribeId),

    #[error("Out of memory")]
    OutOfMemory,

    #[error("Roster is inconsistent: {0}")]
    Inconsistent(String),
}

impl From<MapError> for RosterError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::OutOfMemory => RosterError::OutOfMemory,
            MapError::ItemDoesNotExist => {
                RosterError::Inconsistent("entry vanished from roster storage".into())
            }
        }
    }
}

impl From<std::collections::TryReserveError> for RosterError {
    fn from(_: std::collections::TryReserveError) -> Self {
        RosterError::OutOfMemory
    }
}

impl From<ProtocolError> for RosterError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::OutOfMemory => RosterError::OutOfMemory,
            other => RosterError::Inconsistent(other.to_string()),
        }
    }
}

/// Errors originating from the area list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AreaError {
    #[error("Out of memory")]
    OutOfMemory,

    #[error("Area {0} already exists")]
    AlreadyExists(AreaId),

    #[error("Area {0} does not exist")]
    NotExist(AreaId),

    #[error("Tribe {0} already exists")]
    TribeAlreadyExists(TribeId),

    #[error("Tribe {0} does not exist")]
    TribeNotExist(TribeId),

    #[error("Area list is inconsistent: {0}")]
    Inconsistent(String),
}

impl From<RosterError> for AreaError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::AlreadyExists(id) => AreaError::TribeAlreadyExists(id),
            RosterError::ItemDoesNotExist(id) => AreaError::TribeNotExist(id),
            RosterError::OutOfMemory => AreaError::OutOfMemory,
            RosterError::Inconsistent(reason) => AreaError::Inconsistent(reason),
        }
    }
}

impl From<MapError> for AreaError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::OutOfMemory => AreaError::OutOfMemory,
            MapError::ItemDoesNotExist => {
                AreaError::Inconsistent("entry vanished from area storage".into())
            }
        }
    }
}

impl From<std::collections::TryReserveError> for AreaError {
    fn from(_: std::collections::TryReserveError) -> Self {
        AreaError::OutOfMemory
    }
}
