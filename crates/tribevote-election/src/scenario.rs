//! Scenario files: an ordered list of election steps in TOML.
//!
//! ```toml
//! name = "two areas"
//!
//! [[step]]
//! op = "add_tribe"
//! id = 1
//! name = "cat"
//!
//! [[step]]
//! op = "add_vote"
//! area = 100
//! tribe = 1
//! votes = 5
//!
//! [[step]]
//! op = "winners"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tribevote_protocol::AreaId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Free-form label used in logs.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One call against the election, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddTribe { id: i64, name: String },
    AddArea { id: i64, name: String },
    AddVote { area: i64, tribe: i64, votes: i64 },
    RemoveVote { area: i64, tribe: i64, votes: i64 },
    SetTribeName { id: i64, name: String },
    RemoveTribe { id: i64 },
    RemoveAreas(AreaFilter),
    /// Report a tribe's name.
    TribeName { id: i64 },
    /// Report the winner of every area.
    Winners,
    /// Report every area with its tribes and votes.
    Snapshot,
}

impl Step {
    /// The `op` tag of this step.
    pub fn op(&self) -> &'static str {
        match self {
            Step::AddTribe { .. } => "add_tribe",
            Step::AddArea { .. } => "add_area",
            Step::AddVote { .. } => "add_vote",
            Step::RemoveVote { .. } => "remove_vote",
            Step::SetTribeName { .. } => "set_tribe_name",
            Step::RemoveTribe { .. } => "remove_tribe",
            Step::RemoveAreas(_) => "remove_areas",
            Step::TribeName { .. } => "tribe_name",
            Step::Winners => "winners",
            Step::Snapshot => "snapshot",
        }
    }
}

/// Selects areas by explicit id and/or an inclusive id range.
///
/// An area matches when its id is listed in `ids` or lies within
/// `from..=to` (a missing bound is open). A filter with no ids and no
/// bounds matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaFilter {
    #[serde(default)]
    pub ids: Vec<i64>,
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
}

impl AreaFilter {
    pub fn matches(&self, area_id: AreaId) -> bool {
        let Ok(id) = i64::try_from(area_id) else {
            return self.ids.is_empty() && self.to.is_none() && self.from.is_some();
        };
        if self.ids.contains(&id) {
            return true;
        }
        if self.from.is_none() && self.to.is_none() {
            return false;
        }
        self.from.map_or(true, |from| id >= from) && self.to.map_or(true, |to| id <= to)
    }
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a scenario from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, anyhow::Error> {
        let scenario: Scenario = toml::from_str(content)?;
        Ok(scenario)
    }
}
