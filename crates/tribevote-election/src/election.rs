//! Election facade over the area list.
//!
//! Lifecycle:
//! 1. `add_tribe()` / `add_area()` - register the competitors and the areas
//! 2. `add_vote()` / `remove_vote()` - record votes per area
//! 3. `compute_areas_to_tribes_mapping()` - read the winner of every area
//!
//! Validation order for add and rename calls: an invalid id is reported
//! first, then an existence conflict, then an invalid name.

use tribevote_protocol::{is_valid_name, AreaId, TribeId, VoteCombine};
use tribevote_state::AssocMap;
use tribevote_tally::AreaList;

use crate::ElectionError;

/// An election: every area and the tribes competing in all of them.
#[derive(Debug, Clone, Default)]
pub struct Election {
    areas: AreaList,
}

impl Election {
    /// Create an election with no tribes and no areas.
    pub fn new() -> Self {
        Self {
            areas: AreaList::new(),
        }
    }

    /// Register a tribe in every area, current and future.
    pub fn add_tribe(&mut self, tribe_id: i64, name: &str) -> Result<(), ElectionError> {
        let tribe_id = validate_id(tribe_id)?;
        if self.areas.contains_tribe(tribe_id) {
            return Err(ElectionError::TribeAlreadyExists(tribe_id));
        }
        validate_name(name)?;
        self.areas.add_tribe(tribe_id, name)?;
        Ok(())
    }

    /// Register an area holding every known tribe with zero votes.
    pub fn add_area(&mut self, area_id: i64, name: &str) -> Result<(), ElectionError> {
        let area_id = validate_id(area_id)?;
        if self.areas.contains_area(area_id) {
            return Err(ElectionError::AreaAlreadyExists(area_id));
        }
        validate_name(name)?;
        self.areas.add_area(area_id, name)?;
        Ok(())
    }

    /// Name of a tribe; `None` for a negative or unknown id.
    pub fn tribe_name(&self, tribe_id: i64) -> Option<&str> {
        let tribe_id = TribeId::try_from(tribe_id).ok()?;
        self.areas.tribe_name(tribe_id)
    }

    /// Add votes for a tribe in one area. Returns the tribe's new count there.
    pub fn add_vote(&mut self, area_id: i64, tribe_id: i64, votes: i64) -> Result<u64, ElectionError> {
        self.update_vote(area_id, tribe_id, votes, VoteCombine::Add)
    }

    /// Remove votes for a tribe in one area; the count stops at zero.
    /// Returns the tribe's new count there.
    pub fn remove_vote(
        &mut self,
        area_id: i64,
        tribe_id: i64,
        votes: i64,
    ) -> Result<u64, ElectionError> {
        self.update_vote(area_id, tribe_id, votes, VoteCombine::SubtractClamped)
    }

    fn update_vote(
        &mut self,
        area_id: i64,
        tribe_id: i64,
        votes: i64,
        combine: VoteCombine,
    ) -> Result<u64, ElectionError> {
        let area_id = validate_id(area_id)?;
        let tribe_id = validate_id(tribe_id)?;
        let votes = validate_votes(votes)?;
        Ok(self.areas.update_vote(area_id, tribe_id, votes, combine)?)
    }

    /// Rename a tribe in every area.
    pub fn set_tribe_name(&mut self, tribe_id: i64, name: &str) -> Result<(), ElectionError> {
        let tribe_id = validate_id(tribe_id)?;
        if !self.areas.contains_tribe(tribe_id) {
            return Err(ElectionError::TribeNotExist(tribe_id));
        }
        validate_name(name)?;
        self.areas.set_tribe_name(tribe_id, name)?;
        Ok(())
    }

    /// Remove a tribe, with its votes, from every area.
    pub fn remove_tribe(&mut self, tribe_id: i64) -> Result<(), ElectionError> {
        let tribe_id = validate_id(tribe_id)?;
        self.areas.remove_tribe(tribe_id)?;
        Ok(())
    }

    /// Remove every area whose id satisfies `should_remove`. Returns the
    /// number of areas removed.
    pub fn remove_areas<F>(&mut self, should_remove: F) -> usize
    where
        F: FnMut(AreaId) -> bool,
    {
        self.areas.remove_areas(should_remove)
    }

    /// Map each area id key to the id key of the tribe leading it.
    pub fn compute_areas_to_tribes_mapping(
        &self,
    ) -> Result<AssocMap<String, String>, ElectionError> {
        Ok(self.areas.compute_winners()?)
    }

    pub fn votes(&self, area_id: i64, tribe_id: i64) -> Option<u64> {
        let area_id = AreaId::try_from(area_id).ok()?;
        let tribe_id = TribeId::try_from(tribe_id).ok()?;
        self.areas.votes(area_id, tribe_id)
    }

    pub fn area_name(&self, area_id: i64) -> Option<&str> {
        let area_id = AreaId::try_from(area_id).ok()?;
        self.areas.area(area_id).map(|area| area.name())
    }

    pub fn area_count(&self) -> usize {
        self.areas.area_count()
    }

    pub fn tribe_count(&self) -> usize {
        self.areas.tribe_count()
    }

    /// Read-only view of the underlying areas.
    pub fn areas(&self) -> &AreaList {
        &self.areas
    }
}

fn validate_id(id: i64) -> Result<u64, ElectionError> {
    u64::try_from(id).map_err(|_| ElectionError::InvalidId(id))
}

fn validate_name(name: &str) -> Result<(), ElectionError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ElectionError::InvalidName(name.to_string()))
    }
}

fn validate_votes(votes: i64) -> Result<u64, ElectionError> {
    match u64::try_from(votes) {
        Ok(votes) if votes > 0 => Ok(votes),
        _ => Err(ElectionError::InvalidVotes(votes)),
    }
}
