//! Episodic (1+1) trainer: perturb the best genome, have the host play the candidate,
//! keep it only if it scores strictly better.

pub mod coach;
pub mod evaluator;
pub mod fitness;
pub mod hall_of_fame;
pub mod history;
pub mod perturbation;
pub mod progress;

pub use coach::{Coach, CoachState, EpisodeStep, TrainingReport};
pub use evaluator::{FixtureSet, MatchEvaluator, Standings, TeamStanding, TraineeEntry};
pub use fitness::FitnessKey;
pub use hall_of_fame::{HallOfFame, RankedGenome};
pub use history::{EpisodeStats, Outcome, TrainingHistoryEntry};
pub use perturbation::{ActionPerturber, Perturbation};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressCallback, ProgressMessage};
