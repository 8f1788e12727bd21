//! Scenario runner: replays scenario steps against an [`Election`] and
//! prints the reports that query steps produce.
//!
//! Mutating steps print nothing. A step the election rejects is logged
//! and counted; with `halt_on_error` the run stops there.

use std::io::Write;

use serde::Serialize;
use tribevote_protocol::{key_to_id, AreaId, TribeRecord};

use crate::config::{OutputConfig, OutputFormat, TallyConfig};
use crate::election::Election;
use crate::scenario::{Scenario, Step};
use crate::ElectionError;

/// Outcome counters of one scenario run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Steps the election accepted.
    pub applied: usize,
    /// Steps the election rejected.
    pub rejected: usize,
    /// Whether the run stopped early on a rejected step.
    pub halted: bool,
}

/// A report printed by a query step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    TribeName {
        id: i64,
        name: Option<String>,
    },
    Winners {
        winners: Vec<WinnerRow>,
    },
    Snapshot {
        areas: Vec<AreaRow>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerRow {
    pub area: String,
    pub tribe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tribe_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaRow {
    pub id: AreaId,
    pub name: String,
    pub tribes: Vec<TribeRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TribeRow {
    pub id: String,
    #[serde(flatten)]
    pub record: TribeRecord,
}

/// Drives one election through scenario steps.
pub struct ScenarioRunner {
    election: Election,
    output: OutputConfig,
    halt_on_error: bool,
}

impl ScenarioRunner {
    /// Create a runner over a fresh election.
    pub fn new(config: &TallyConfig) -> Self {
        Self::with_election(Election::new(), config)
    }

    /// Create a runner that continues an existing election.
    pub fn with_election(election: Election, config: &TallyConfig) -> Self {
        Self {
            election,
            output: config.output.clone(),
            halt_on_error: config.run.halt_on_error,
        }
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn into_election(self) -> Election {
        self.election
    }

    /// Apply every step of `scenario` in order, writing reports to `out`.
    ///
    /// Rejected steps do not fail the run; only write errors do.
    pub fn run<W: Write>(
        &mut self,
        scenario: &Scenario,
        out: &mut W,
    ) -> Result<RunSummary, anyhow::Error> {
        let label = scenario.name.as_deref().unwrap_or("unnamed");
        tracing::info!(
            scenario = label,
            steps = scenario.steps.len(),
            "Running scenario"
        );

        let mut summary = RunSummary::default();
        for (index, step) in scenario.steps.iter().enumerate() {
            match self.apply(step) {
                Ok(report) => {
                    summary.applied += 1;
                    tracing::debug!(step = index, op = step.op(), "Step applied");
                    if let Some(report) = report {
                        self.write_report(&report, out)?;
                    }
                }
                Err(e) => {
                    summary.rejected += 1;
                    tracing::warn!(step = index, op = step.op(), error = %e, "Step rejected");
                    if self.halt_on_error {
                        summary.halted = true;
                        break;
                    }
                }
            }
        }

        tracing::info!(
            scenario = label,
            applied = summary.applied,
            rejected = summary.rejected,
            halted = summary.halted,
            "Scenario finished"
        );
        Ok(summary)
    }

    /// Apply one step. Query steps return their report.
    pub fn apply(&mut self, step: &Step) -> Result<Option<Report>, ElectionError> {
        let election = &mut self.election;
        match step {
            Step::AddTribe { id, name } => election.add_tribe(*id, name)?,
            Step::AddArea { id, name } => election.add_area(*id, name)?,
            Step::AddVote { area, tribe, votes } => {
                election.add_vote(*area, *tribe, *votes)?;
            }
            Step::RemoveVote { area, tribe, votes } => {
                election.remove_vote(*area, *tribe, *votes)?;
            }
            Step::SetTribeName { id, name } => election.set_tribe_name(*id, name)?,
            Step::RemoveTribe { id } => election.remove_tribe(*id)?,
            Step::RemoveAreas(filter) => {
                let removed = election.remove_areas(|area_id| filter.matches(area_id));
                tracing::debug!(removed, "Removed areas");
            }
            Step::TribeName { id } => {
                return Ok(Some(Report::TribeName {
                    id: *id,
                    name: election.tribe_name(*id).map(str::to_string),
                }));
            }
            Step::Winners => return self.winners().map(Some),
            Step::Snapshot => return Ok(Some(self.snapshot())),
        }
        Ok(None)
    }

    fn winners(&self) -> Result<Report, ElectionError> {
        let mapping = self.election.compute_areas_to_tribes_mapping()?;
        let areas = self.election.areas();
        let winners = mapping
            .iter()
            .map(|(area, tribe)| {
                let (area_name, tribe_name) = if self.output.show_names {
                    (
                        key_to_id(area)
                            .ok()
                            .and_then(|id| areas.area(id))
                            .map(|a| a.name().to_string()),
                        key_to_id(tribe)
                            .ok()
                            .and_then(|id| areas.tribe_name(id))
                            .map(str::to_string),
                    )
                } else {
                    (None, None)
                };
                WinnerRow {
                    area: area.clone(),
                    tribe: tribe.clone(),
                    area_name,
                    tribe_name,
                }
            })
            .collect();
        Ok(Report::Winners { winners })
    }

    fn snapshot(&self) -> Report {
        let areas = self
            .election
            .areas()
            .areas()
            .map(|area| AreaRow {
                id: area.id(),
                name: area.name().to_string(),
                tribes: area
                    .roster()
                    .iter()
                    .map(|(key, record)| TribeRow {
                        id: key.to_string(),
                        record: record.clone(),
                    })
                    .collect(),
            })
            .collect();
        Report::Snapshot { areas }
    }

    fn write_report<W: Write>(&self, report: &Report, out: &mut W) -> Result<(), anyhow::Error> {
        match self.output.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write_text(report, out)?,
        }
        Ok(())
    }
}

fn write_text<W: Write>(report: &Report, out: &mut W) -> std::io::Result<()> {
    match report {
        Report::TribeName { id, name } => match name {
            Some(name) => writeln!(out, "tribe {id}: {name}"),
            None => writeln!(out, "tribe {id}: <none>"),
        },
        Report::Winners { winners } => {
            if winners.is_empty() {
                return writeln!(out, "winners: none");
            }
            writeln!(out, "winners:")?;
            for row in winners {
                write!(out, "  {}", row.area)?;
                if let Some(name) = &row.area_name {
                    write!(out, " ({name})")?;
                }
                write!(out, " -> {}", row.tribe)?;
                if let Some(name) = &row.tribe_name {
                    write!(out, " ({name})")?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
        Report::Snapshot { areas } => {
            if areas.is_empty() {
                return writeln!(out, "areas: none");
            }
            for area in areas {
                writeln!(out, "area {} ({})", area.id, area.name)?;
                for tribe in &area.tribes {
                    writeln!(out, "  {} {}", tribe.id, tribe.record)?;
                }
            }
            Ok(())
        }
    }
}
