use super::traits::ConfigSection;
use crate::error::CoachError;
use serde::{Deserialize, Serialize};

/// Structural mutation operator weights and undo depth
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub insert_condition_weight: u32,
    pub swap_priority_weight: u32,
    pub replace_action_weight: u32,
    pub delete_node_weight: u32,
    pub undo_capacity: usize,
    pub seed: Option<u64>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            insert_condition_weight: 30,
            swap_priority_weight: 30,
            replace_action_weight: 30,
            delete_node_weight: 10,
            undo_capacity: 5,
            seed: None,
        }
    }
}

impl MutationConfig {
    /// Weights in operator order: insert, swap, replace, delete
    pub fn weights(&self) -> [u32; 4] {
        [
            self.insert_condition_weight,
            self.swap_priority_weight,
            self.replace_action_weight,
            self.delete_node_weight,
        ]
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<(), CoachError> {
        if self.weights().iter().all(|w| *w == 0) {
            return Err(CoachError::Configuration(
                "At least one mutation operator weight must be positive".to_string(),
            ));
        }
        if self.undo_capacity == 0 {
            return Err(CoachError::Configuration(
                "Undo capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
