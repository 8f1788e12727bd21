//! Tribe roster: every tribe's name and vote count within one area.
//!
//! Tribes are keyed by their id key (`"7"` for tribe 7) and stored in
//! insertion order. The roster does not validate names; that happens once
//! at the election boundary.

use tribevote_protocol::{
    id_to_key, is_valid_name, key_to_id, try_copy_str, TribeId, TribeRecord, VoteCombine,
    INITIAL_VOTES,
};
use tribevote_state::AssocMap;

use crate::RosterError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TribeRoster {
    tribes: AssocMap<String, TribeRecord>,
}

impl TribeRoster {
    /// Create a new empty roster.
    pub fn new() -> Self {
        Self {
            tribes: AssocMap::new(),
        }
    }

    /// Number of tribes in the roster.
    pub fn len(&self) -> usize {
        self.tribes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tribes.is_empty()
    }

    pub fn contains(&self, tribe_id: TribeId) -> bool {
        self.tribes.contains(id_to_key(tribe_id).as_str())
    }

    /// Add a tribe with zero votes.
    pub fn add(&mut self, tribe_id: TribeId, name: &str) -> Result<(), RosterError> {
        debug_assert!(is_valid_name(name), "unvalidated tribe name {name:?}");
        let key = id_to_key(tribe_id);
        if self.tribes.contains(key.as_str()) {
            return Err(RosterError::AlreadyExists(tribe_id));
        }
        let record = TribeRecord::try_new(name, INITIAL_VOTES)?;
        self.tribes.put(key, record)?;
        Ok(())
    }

    pub fn record(&self, tribe_id: TribeId) -> Option<&TribeRecord> {
        self.tribes.get(id_to_key(tribe_id).as_str())
    }

    pub fn name(&self, tribe_id: TribeId) -> Option<&str> {
        self.record(tribe_id).map(|record| record.name.as_str())
    }

    pub fn votes(&self, tribe_id: TribeId) -> Option<u64> {
        self.record(tribe_id).map(|record| record.votes)
    }

    /// Rename a tribe, keeping its votes.
    pub fn set_name(&mut self, tribe_id: TribeId, name: &str) -> Result<(), RosterError> {
        debug_assert!(is_valid_name(name), "unvalidated tribe name {name:?}");
        let record = self
            .tribes
            .get_mut(id_to_key(tribe_id).as_str())
            .ok_or(RosterError::ItemDoesNotExist(tribe_id))?;
        record.name = try_copy_str(name)?;
        Ok(())
    }

    /// Remove a tribe and return its record.
    pub fn remove(&mut self, tribe_id: TribeId) -> Result<TribeRecord, RosterError> {
        let key = id_to_key(tribe_id);
        if !self.tribes.contains(key.as_str()) {
            return Err(RosterError::ItemDoesNotExist(tribe_id));
        }
        Ok(self.tribes.remove(key.as_str())?)
    }

    /// Combine `delta` into the tribe's votes and return the new count.
    pub fn update_vote(
        &mut self,
        tribe_id: TribeId,
        delta: u64,
        combine: VoteCombine,
    ) -> Result<u64, RosterError> {
        let record = self
            .tribes
            .get_mut(id_to_key(tribe_id).as_str())
            .ok_or(RosterError::ItemDoesNotExist(tribe_id))?;
        let votes = record.combine(delta, combine);
        tracing::trace!(tribe_id, %combine, delta, record = %record, "Tribe votes updated");
        Ok(votes)
    }

    /// Reset every tribe's votes to zero.
    pub fn set_all_votes_to_zero(&mut self) {
        self.tribes.for_each_mut(|_, record| {
            record.combine(record.votes, VoteCombine::SubtractClamped);
        });
    }

    /// Deep copy of the roster.
    pub fn try_copy(&self) -> Result<Self, RosterError> {
        Ok(Self {
            tribes: self.tribes.try_copy()?,
        })
    }

    /// Tribe with the most votes.
    ///
    /// Equal counts go to the numerically smaller tribe id, so a roster in
    /// which nobody has voted yet is won by its smallest id. Returns `None`
    /// for an empty roster.
    pub fn max_votes_tribe(&self) -> Result<Option<TribeId>, RosterError> {
        let mut leader: Option<(TribeId, u64)> = None;
        for (key, record) in self.tribes.iter() {
            let tribe_id = key_to_id(key)?;
            let leads = match leader {
                None => true,
                Some((leader_id, leader_votes)) => {
                    record.votes > leader_votes
                        || (record.votes == leader_votes && tribe_id < leader_id)
                }
            };
            if leads {
                leader = Some((tribe_id, record.votes));
            }
        }
        Ok(leader.map(|(tribe_id, _)| tribe_id))
    }

    /// `(tribe key, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TribeRecord)> + '_ {
        self.tribes
            .iter()
            .map(|(key, record)| (key.as_str(), record))
    }
}
