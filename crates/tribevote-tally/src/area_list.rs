//! Area list: all voting areas, each with its own tribe roster.
//!
//! Copy-on-add model:
//! 1. Tribes added while no area exists are kept on a template roster
//! 2. The first area receives a zeroed copy of the template
//! 3. Every later area receives a zeroed copy of the current first area's
//!    roster, so it starts with every tribe known so far
//!
//! After creation the rosters diverge for votes (`update_vote` touches one
//! area only) but tribe identity changes (`add_tribe`, `set_tribe_name`,
//! `remove_tribe`) are fanned out to the template and to every area.
//!
//! Fan-out is not transactional: when an area fails part way through,
//! the areas already updated keep the change and the call reports the
//! failure.

use tribevote_protocol::{id_to_key, is_valid_name, try_copy_str, AreaId, TribeId, VoteCombine};
use tribevote_state::AssocMap;

use crate::roster::TribeRoster;
use crate::AreaError;

/// A voting area and its private roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    id: AreaId,
    name: String,
    roster: TribeRoster,
}

impl Area {
    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roster(&self) -> &TribeRoster {
        &self.roster
    }
}

/// Every area in the election, in creation order.
#[derive(Debug, Clone, Default)]
pub struct AreaList {
    /// Tribe identities with zero votes; the source of the first area's roster.
    tribes: TribeRoster,
    /// Areas keyed by area id key.
    areas: AssocMap<String, Area>,
}

impl AreaList {
    /// Create a new list with no areas and no tribes.
    pub fn new() -> Self {
        Self {
            tribes: TribeRoster::new(),
            areas: AssocMap::new(),
        }
    }

    pub fn contains_area(&self, area_id: AreaId) -> bool {
        self.areas.contains(id_to_key(area_id).as_str())
    }

    pub fn contains_tribe(&self, tribe_id: TribeId) -> bool {
        self.tribes.contains(tribe_id)
    }

    pub fn area(&self, area_id: AreaId) -> Option<&Area> {
        self.areas.get(id_to_key(area_id).as_str())
    }

    /// Areas in creation order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> + '_ {
        self.areas.values()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn tribe_count(&self) -> usize {
        self.tribes.len()
    }

    /// Name of a tribe. Identities are identical in every roster, so the
    /// template answers for all areas.
    pub fn tribe_name(&self, tribe_id: TribeId) -> Option<&str> {
        self.tribes.name(tribe_id)
    }

    /// Votes a tribe got in one area.
    pub fn votes(&self, area_id: AreaId, tribe_id: TribeId) -> Option<u64> {
        self.area(area_id)?.roster.votes(tribe_id)
    }

    /// Add a tribe to every area.
    pub fn add_tribe(&mut self, tribe_id: TribeId, name: &str) -> Result<(), AreaError> {
        self.tribes.add(tribe_id, name)?;
        self.areas
            .try_for_each_mut(|_, area| area.roster.add(tribe_id, name))?;

        tracing::debug!(tribe_id, name, areas = self.areas.len(), "Added tribe");
        Ok(())
    }

    /// Add an area whose roster holds every known tribe with zero votes.
    pub fn add_area(&mut self, area_id: AreaId, name: &str) -> Result<(), AreaError> {
        debug_assert!(is_valid_name(name), "unvalidated area name {name:?}");
        let key = id_to_key(area_id);
        if self.areas.contains(key.as_str()) {
            return Err(AreaError::AlreadyExists(area_id));
        }

        let mut roster = match self.areas.values().next() {
            Some(first) => first.roster.try_copy()?,
            None => self.tribes.try_copy()?,
        };
        roster.set_all_votes_to_zero();

        let area = Area {
            id: area_id,
            name: try_copy_str(name)?,
            roster,
        };
        self.areas.put(key, area)?;

        tracing::debug!(
            area_id,
            name,
            tribes = self.tribes.len(),
            "Added area"
        );
        Ok(())
    }

    /// Combine `delta` into one tribe's votes in one area.
    pub fn update_vote(
        &mut self,
        area_id: AreaId,
        tribe_id: TribeId,
        delta: u64,
        combine: VoteCombine,
    ) -> Result<u64, AreaError> {
        let area = self
            .areas
            .get_mut(id_to_key(area_id).as_str())
            .ok_or(AreaError::NotExist(area_id))?;
        let votes = area.roster.update_vote(tribe_id, delta, combine)?;

        tracing::debug!(area_id, tribe_id, delta, %combine, votes, "Recorded vote");
        Ok(votes)
    }

    /// Rename a tribe in every area.
    pub fn set_tribe_name(&mut self, tribe_id: TribeId, name: &str) -> Result<(), AreaError> {
        self.tribes.set_name(tribe_id, name)?;
        self.areas
            .try_for_each_mut(|_, area| area.roster.set_name(tribe_id, name))?;

        tracing::debug!(tribe_id, name, "Renamed tribe");
        Ok(())
    }

    /// Remove a tribe from every area.
    pub fn remove_tribe(&mut self, tribe_id: TribeId) -> Result<(), AreaError> {
        self.tribes.remove(tribe_id)?;
        self.areas
            .try_for_each_mut(|_, area| area.roster.remove(tribe_id).map(|_| ()))?;

        tracing::debug!(tribe_id, "Removed tribe");
        Ok(())
    }

    /// Remove every area whose id satisfies `should_remove`.
    ///
    /// Single pass in creation order. Returns how many areas were removed.
    /// Removing the last remaining area leaves an empty list that behaves
    /// like a new one, except that known tribes are kept.
    pub fn remove_areas<F>(&mut self, mut should_remove: F) -> usize
    where
        F: FnMut(AreaId) -> bool,
    {
        let removed = self.areas.retain(|_, area| !should_remove(area.id));
        if removed > 0 {
            tracing::debug!(removed, remaining = self.areas.len(), "Removed areas");
        }
        removed
    }

    /// Map every area to the tribe leading it.
    ///
    /// Keys are area id keys and values tribe id keys, in area creation
    /// order. Areas without tribes are left out; an empty list yields an
    /// empty map.
    pub fn compute_winners(&self) -> Result<AssocMap<String, String>, AreaError> {
        let mut winners = AssocMap::new();
        for area in self.areas.values() {
            let Some(tribe_id) = area.roster.max_votes_tribe()? else {
                continue;
            };
            winners.put(id_to_key(area.id), id_to_key(tribe_id))?;
        }

        tracing::debug!(
            areas = self.areas.len(),
            decided = winners.len(),
            "Computed area winners"
        );
        Ok(winners)
    }
}
