//! tribevote - Core identifiers and record types
//!
//! Shared vocabulary for every layer of the tally engine:
//! - Tribe and area ids and their base-10 key encoding
//! - Vote combine policies (add, subtract with clamp at zero)
//! - The tribe record `{name, votes}` and its packed `name$votes` form
//! - Name validation and allocation-checked string copies

pub mod constants;
pub mod error;
pub mod identity;
pub mod types;

pub use constants::*;
pub use error::*;
pub use identity::*;
pub use types::*;
