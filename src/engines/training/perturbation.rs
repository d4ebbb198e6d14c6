use crate::config::TrainingConfig;
use crate::functions::registry::PrimitiveRegistry;
use crate::genome::{GenomeNode, NumericParam, ParamValue, TeamGenome};
use crate::types::Role;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// A candidate derived from the best genome, with a readable account of the change
#[derive(Debug, Clone)]
pub struct Perturbation {
    pub genome: TeamGenome,
    pub description: String,
}

/// Single action-node edits: nudge numeric params or swap the action for a compatible one
pub struct ActionPerturber {
    registry: Arc<PrimitiveRegistry>,
    step: i64,
    range: i64,
    tweak_probability: f64,
    max_attempts: usize,
}

impl ActionPerturber {
    pub fn new(registry: Arc<PrimitiveRegistry>, config: &TrainingConfig) -> Self {
        Self {
            registry,
            step: config.tweak_step,
            range: config.tweak_range,
            tweak_probability: config.tweak_probability,
            max_attempts: config.max_mutation_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Pick a random role and action node until one can be changed.
    ///
    /// `None` once `max_attempts` picks have all been unsuitable.
    pub fn perturb<R: Rng>(&self, best: &TeamGenome, rng: &mut R) -> Option<Perturbation> {
        for attempt in 1..=self.max_attempts {
            let role = *Role::ALL.choose(rng)?;
            let mut candidate = best.clone();
            if let Some(description) = self.try_role(&mut candidate, role, rng) {
                return Some(Perturbation { genome: candidate, description });
            }
            log::trace!("Perturbation attempt {} on {} found nothing to change", attempt, role);
        }
        None
    }

    fn try_role<R: Rng>(&self, genome: &mut TeamGenome, role: Role, rng: &mut R) -> Option<String> {
        let tree = genome.role_tree_mut(role)?;
        // Only the root is ever compiled
        let paths: Vec<_> = tree
            .find_paths(GenomeNode::is_action)
            .into_iter()
            .filter(|path| path.first() == Some(&0))
            .collect();
        let path = paths.choose(rng)?;
        let node = tree.node_at_mut(path)?;

        let tweak = node.has_valid_params() && rng.gen_bool(self.tweak_probability);
        if tweak {
            let changes = self.tweak_params(node, rng);
            Some(format!("Tweaking {}: {} ({})", role, node.kind, changes.join(", ")))
        } else {
            let previous = node.kind.clone();
            let replacement = self.swap_action(node, rng)?;
            Some(format!("Swapping {}: {} -> {}", role, previous, replacement))
        }
    }

    /// Nudge every present param by `step * k`, `k` in `-range..=range`
    fn tweak_params<R: Rng>(&self, node: &mut GenomeNode, rng: &mut R) -> Vec<String> {
        let mut changes = Vec::new();
        for param in node.present_params() {
            let old = match node.param(param).and_then(ParamValue::as_int) {
                Some(value) => value,
                None => {
                    log::warn!("Corrupt {} on '{}' treated as 0", param, node.kind);
                    0
                }
            };
            let delta = self.step * rng.gen_range(-self.range..=self.range);
            let new = old.saturating_add(delta);
            node.set_param(param, ParamValue::from_int(new));
            changes.push(format!("{} {} -> {}", param_label(param), old, new));
        }
        changes
    }

    /// Replace the action with a context-compatible one and apply its declared defaults
    fn swap_action<R: Rng>(&self, node: &mut GenomeNode, rng: &mut R) -> Option<String> {
        let candidates = self.registry.replacement_candidates(&node.kind)?;
        let replacement = candidates.choose(rng)?.to_string();

        node.kind = replacement.clone();
        node.clear_params();
        for spec in self.registry.declared_params(&replacement) {
            node.set_param(spec.param, ParamValue::from_int(spec.default));
        }
        Some(replacement)
    }
}

fn param_label(param: NumericParam) -> &'static str {
    match param {
        NumericParam::OffsetX => "OffsetX",
        NumericParam::OffsetY => "OffsetY",
        NumericParam::Depth => "Depth",
    }
}
