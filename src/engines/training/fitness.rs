use super::evaluator::TeamStanding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Episode fitness: points first, goal difference breaks ties.
///
/// Field order drives the derived `Ord`, so comparison is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FitnessKey {
    pub points: i64,
    pub goal_diff: i64,
}

impl FitnessKey {
    pub fn new(points: i64, goal_diff: i64) -> Self {
        Self { points, goal_diff }
    }

    pub fn from_standing(standing: &TeamStanding) -> Self {
        Self {
            points: standing.points,
            goal_diff: standing.goals_for - standing.goals_against,
        }
    }
}

impl fmt::Display for FitnessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pts {}, GD {:+}", self.points, self.goal_diff)
    }
}
