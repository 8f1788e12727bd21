//! Tribe and area identifiers, their key encoding, and name rules.
//!
//! Ids are non-negative integers. Wherever an id is used as a map key it
//! is rendered as a base-10 ASCII digit string with no sign and no leading
//! zeros, so `0` becomes `"0"` and `120` becomes `"120"`.

use std::collections::TryReserveError;

use crate::constants::{FIRST_NAME_LETTER, KEY_RADIX, LAST_NAME_LETTER, NAME_SPACE};
use crate::error::ProtocolError;

/// Identifier of a tribe (party) competing in every area.
pub type TribeId = u64;

/// Identifier of a geographic voting area.
pub type AreaId = u64;

/// Render an id as its map key.
pub fn id_to_key(id: u64) -> String {
    id.to_string()
}

/// Decode a map key produced by [`id_to_key`].
///
/// Rejects the empty string, anything that is not an ASCII digit, leading
/// zeros and values that overflow `u64`.
pub fn key_to_id(key: &str) -> Result<u64, ProtocolError> {
    let well_formed = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if !well_formed {
        return Err(ProtocolError::InvalidKey(key.to_string()));
    }
    u64::from_str_radix(key, KEY_RADIX).map_err(|_| ProtocolError::InvalidKey(key.to_string()))
}

/// Check that a name consists only of lowercase ASCII letters and spaces.
///
/// The empty name is valid.
pub fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c == NAME_SPACE || (FIRST_NAME_LETTER..=LAST_NAME_LETTER).contains(&c))
}

/// Copy a string, reporting allocation failure instead of aborting.
pub fn try_copy_str(source: &str) -> Result<String, TryReserveError> {
    let mut copy = String::new();
    copy.try_reserve_exact(source.len())?;
    copy.push_str(source);
    Ok(copy)
}
