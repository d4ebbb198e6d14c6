use super::evaluator::TeamStanding;
use super::fitness::FitnessKey;
use crate::genome::TeamGenome;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Baseline,
    Improved,
    Rejected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Outcome::Baseline => "BASELINE",
            Outcome::Improved => "IMPROVED",
            Outcome::Rejected => "REJECTED",
        };
        f.write_str(tag)
    }
}

/// Candidate's standings row as recorded in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStats {
    #[serde(rename = "GP")]
    pub games_played: u32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "Pts")]
    pub points: i64,
    #[serde(rename = "GF")]
    pub goals_for: i64,
    #[serde(rename = "GA")]
    pub goals_against: i64,
}

impl From<&TeamStanding> for EpisodeStats {
    fn from(standing: &TeamStanding) -> Self {
        Self {
            games_played: standing.games_played,
            wins: standing.wins,
            points: standing.points,
            goals_for: standing.goals_for,
            goals_against: standing.goals_against,
        }
    }
}

impl EpisodeStats {
    pub fn fitness(&self) -> FitnessKey {
        FitnessKey::new(self.points, self.goals_for - self.goals_against)
    }
}

/// One completed episode. Append-only; `episode` counts up from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistoryEntry {
    pub episode: usize,
    pub description: String,
    pub outcome: Outcome,
    pub stats: EpisodeStats,
    /// The candidate that played this episode
    pub genome: TeamGenome,
}
