use crate::functions::registry::PrimitiveRegistry;
use crate::genome::{GenomeNode, RoleTree};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural edits the mutation engine can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOperator {
    InsertCondition,
    SwapPriority,
    ReplaceAction,
    DeleteNode,
}

impl MutationOperator {
    /// Same order as `MutationConfig::weights`
    pub const ALL: [MutationOperator; 4] = [
        MutationOperator::InsertCondition,
        MutationOperator::SwapPriority,
        MutationOperator::ReplaceAction,
        MutationOperator::DeleteNode,
    ];

    /// Apply to one role's tree. `None` when the tree has no eligible node.
    pub fn apply<R: Rng>(
        &self,
        tree: &mut RoleTree,
        registry: &PrimitiveRegistry,
        rng: &mut R,
    ) -> Option<String> {
        match self {
            MutationOperator::InsertCondition => insert_condition(tree, registry, rng),
            MutationOperator::SwapPriority => swap_priority(tree, rng),
            MutationOperator::ReplaceAction => replace_action(tree, registry, rng),
            MutationOperator::DeleteNode => delete_node(tree, rng),
        }
    }
}

impl fmt::Display for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationOperator::InsertCondition => "insert condition",
            MutationOperator::SwapPriority => "swap priority",
            MutationOperator::ReplaceAction => "replace action",
            MutationOperator::DeleteNode => "delete node",
        };
        f.write_str(name)
    }
}

/// Insert a random condition into a random Sequence, before its final child
pub fn insert_condition<R: Rng>(
    tree: &mut RoleTree,
    registry: &PrimitiveRegistry,
    rng: &mut R,
) -> Option<String> {
    let paths = tree.find_paths(|n| n.is_sequence() && !n.children.is_empty());
    let path = paths.choose(rng)?;
    let kind = registry.condition_names().choose(rng)?.to_string();

    let sequence = tree.node_at_mut(path)?;
    let index = rng.gen_range(0..sequence.children.len());
    sequence.children.insert(index, GenomeNode::condition(&kind));

    Some(format!("Inserted {} into Sequence {:?} at {}", kind, path, index))
}

/// Swap two distinct children of a random Selector
pub fn swap_priority<R: Rng>(tree: &mut RoleTree, rng: &mut R) -> Option<String> {
    let paths = tree.find_paths(|n| n.is_selector() && n.children.len() >= 2);
    let path = paths.choose(rng)?;

    let selector = tree.node_at_mut(path)?;
    let len = selector.children.len();
    let first = rng.gen_range(0..len);
    let mut second = rng.gen_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    selector.children.swap(first, second);

    Some(format!("Swapped Selector {:?} children {} and {}", path, first, second))
}

/// Give a random action node a different action type; params are dropped
pub fn replace_action<R: Rng>(
    tree: &mut RoleTree,
    registry: &PrimitiveRegistry,
    rng: &mut R,
) -> Option<String> {
    let paths = tree.find_paths(GenomeNode::is_action);
    let path = paths.choose(rng)?;

    let node = tree.node_at_mut(path)?;
    let previous = node.kind.clone();
    let candidates: Vec<&str> = registry
        .action_names()
        .into_iter()
        .filter(|name| *name != previous)
        .collect();
    let replacement = candidates.choose(rng)?;

    node.kind = replacement.to_string();
    node.clear_params();

    Some(format!("Replaced {} with {} at {:?}", previous, replacement, path))
}

/// Remove one random child from a struct node that has more than one
pub fn delete_node<R: Rng>(tree: &mut RoleTree, rng: &mut R) -> Option<String> {
    let paths = tree.find_paths(|n| n.is_struct() && n.children.len() > 1);
    let path = paths.choose(rng)?;

    let parent = tree.node_at_mut(path)?;
    let index = rng.gen_range(0..parent.children.len());
    let removed = parent.children.remove(index);

    Some(format!("Deleted {} from {} {:?} at {}", removed.kind, parent.kind, path, index))
}
