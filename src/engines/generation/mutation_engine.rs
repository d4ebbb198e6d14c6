use crate::config::MutationConfig;
use crate::engines::generation::{operators::MutationOperator, undo::UndoStack};
use crate::error::CoachError;
use crate::functions::registry::PrimitiveRegistry;
use crate::genome::TeamGenome;
use crate::types::Role;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Outcome of one `mutate` call
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// Mutated deep copy; equal to the input when nothing was applied
    pub genome: TeamGenome,
    pub role: Option<Role>,
    pub operator: MutationOperator,
    pub applied: bool,
    pub description: String,
}

/// Structural mutation session with its own RNG and undo history
pub struct MutationEngine {
    registry: Arc<PrimitiveRegistry>,
    config: MutationConfig,
    weights: WeightedIndex<u32>,
    undo: UndoStack,
    rng: StdRng,
    generation: usize,
}

impl MutationEngine {
    pub fn new(registry: Arc<PrimitiveRegistry>, config: MutationConfig) -> Result<Self, CoachError> {
        let weights = WeightedIndex::new(config.weights())
            .map_err(|e| CoachError::Configuration(format!("Invalid mutation weights: {}", e)))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            registry,
            undo: UndoStack::new(config.undo_capacity),
            config,
            weights,
            rng,
            generation: 0,
        })
    }

    /// Snapshot `genome`, then apply one weighted-random operator to a copy of it.
    ///
    /// An operator with nothing to act on leaves the copy untouched and reports
    /// `applied = false`.
    pub fn mutate(&mut self, genome: &TeamGenome) -> MutationResult {
        self.undo.push(genome);

        let operator = MutationOperator::ALL[self.weights.sample(&mut self.rng)];
        let mut mutated = genome.clone();

        let Some(role) = genome.populated_roles().choose(&mut self.rng).copied() else {
            return MutationResult {
                genome: mutated,
                role: None,
                operator,
                applied: false,
                description: format!("No roles to {}", operator),
            };
        };

        let outcome = mutated
            .role_tree_mut(role)
            .and_then(|tree| operator.apply(tree, &self.registry, &mut self.rng));

        match outcome {
            Some(description) => {
                self.generation += 1;
                log::debug!("Mutation {} on {}: {}", self.generation, role, description);
                MutationResult {
                    genome: mutated,
                    role: Some(role),
                    operator,
                    applied: true,
                    description: format!("{}: {}", role, description),
                }
            }
            None => {
                log::debug!("No eligible node for {} on {}", operator, role);
                MutationResult {
                    genome: mutated,
                    role: Some(role),
                    operator,
                    applied: false,
                    description: format!("{}: nothing to {}", role, operator),
                }
            }
        }
    }

    /// Restore the most recent pre-mutation snapshot
    pub fn revert(&mut self) -> Option<TeamGenome> {
        let restored = self.undo.pop();
        if restored.is_none() {
            log::debug!("Nothing to revert");
        }
        restored
    }

    /// Number of mutations that changed a genome
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PrimitiveRegistry> {
        &self.registry
    }
}
