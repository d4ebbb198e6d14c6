use super::traits::{ensure_unit_interval, ConfigSection};
use crate::error::CoachError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Team id the candidate is registered under in every fixture set
    pub candidate_id: String,
    pub matches_per_episode: usize,
    pub episode_budget: usize,
    /// Parameter tweaks move by `tweak_step * k`, `k` in `-tweak_range..=tweak_range`
    pub tweak_step: i64,
    pub tweak_range: i64,
    /// Chance of tweaking params instead of swapping the action, when params exist
    pub tweak_probability: f64,
    pub max_mutation_attempts: usize,
    /// Chance of a structural (tree-shape) mutation instead of an action-node perturbation
    pub structural_mutation_rate: f64,
    pub top_k: usize,
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            candidate_id: "TRAINEE".to_string(),
            matches_per_episode: 4,
            episode_budget: 100,
            tweak_step: 10,
            tweak_range: 2,
            tweak_probability: 0.5,
            max_mutation_attempts: 64,
            structural_mutation_rate: 0.0,
            top_k: 10,
            seed: None,
        }
    }
}

impl ConfigSection for TrainingConfig {
    fn section_name() -> &'static str {
        "training"
    }

    fn validate(&self) -> Result<(), CoachError> {
        if self.candidate_id.trim().is_empty() {
            return Err(CoachError::Configuration(
                "Candidate id must not be empty".to_string(),
            ));
        }
        if self.matches_per_episode == 0 {
            return Err(CoachError::Configuration(
                "Matches per episode must be at least 1".to_string(),
            ));
        }
        if self.episode_budget == 0 {
            return Err(CoachError::Configuration(
                "Episode budget must be at least 1".to_string(),
            ));
        }
        if self.tweak_step <= 0 || self.tweak_range < 0 {
            return Err(CoachError::Configuration(
                "Tweak step must be positive and tweak range non-negative".to_string(),
            ));
        }
        if self.max_mutation_attempts == 0 {
            return Err(CoachError::Configuration(
                "Max mutation attempts must be at least 1".to_string(),
            ));
        }
        ensure_unit_interval("training", "tweak_probability", self.tweak_probability)?;
        ensure_unit_interval("training", "structural_mutation_rate", self.structural_mutation_rate)?;
        Ok(())
    }
}
