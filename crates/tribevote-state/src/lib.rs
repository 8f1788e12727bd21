//! tribevote State - ordered associative storage
//!
//! Provides the container every roster and area list is built on:
//! - Unique keys, insertion order preserved as iteration order
//! - Overwrite keeps an entry's position
//! - Deep copy with allocation failure reported, not aborted
//! - A per-map external cursor (`first` / `next`) plus borrowing iterators

pub mod assoc_map;

pub use assoc_map::AssocMap;

use thiserror::Error;

/// Errors originating from the state layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("Item does not exist")]
    ItemDoesNotExist,

    #[error("Out of memory")]
    OutOfMemory,
}

impl From<std::collections::TryReserveError> for MapError {
    fn from(_: std::collections::TryReserveError) -> Self {
        MapError::OutOfMemory
    }
}
