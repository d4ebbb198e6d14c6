use crate::engines::compiler::CompiledTeam;
use crate::genome::TeamColors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One team's aggregated row in a fixture set's standings table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStanding {
    #[serde(rename = "GP")]
    pub games_played: u32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L", default)]
    pub losses: u32,
    #[serde(rename = "Pts")]
    pub points: i64,
    #[serde(rename = "GF")]
    pub goals_for: i64,
    #[serde(rename = "GA")]
    pub goals_against: i64,
}

/// Team id to standings row
pub type Standings = BTreeMap<String, TeamStanding>;

/// The candidate as it is entered into a fixture set
#[derive(Debug, Clone)]
pub struct TraineeEntry {
    /// `"<name> (V<episode>)"`
    pub name: String,
    pub code: String,
    pub colors: TeamColors,
    pub team: Arc<CompiledTeam>,
}

/// Request for the evaluator: play the candidate against every opponent
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub episode: usize,
    /// Id the candidate must be reported under in the returned standings
    pub candidate_id: String,
    pub opponents: Vec<String>,
    pub matches_per_opponent: usize,
    pub trainee: TraineeEntry,
}

/// Plays fixture sets and reports standings. Implemented by the host simulation.
pub trait MatchEvaluator {
    fn run_fixture_set(&mut self, fixtures: &FixtureSet) -> anyhow::Result<Standings>;
}
