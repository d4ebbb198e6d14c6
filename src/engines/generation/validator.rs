use crate::error::CoachError;
use crate::functions::registry::PrimitiveRegistry;
use crate::genome::{GenomeNode, NodeCategory, NodePath, TeamGenome};
use crate::types::Role;
use std::fmt;
use std::sync::Arc;

/// A structural problem in a genome, located by role and node path
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub role: Role,
    pub path: NodePath,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.role, self.path, self.message)
    }
}

/// Checks that a genome is well-formed against the primitive catalogue
pub struct GenomeValidator {
    registry: Arc<PrimitiveRegistry>,
    max_depth: usize,
}

impl GenomeValidator {
    pub fn new(registry: Arc<PrimitiveRegistry>, max_depth: usize) -> Self {
        Self { registry, max_depth }
    }

    /// First issue as an error, if any
    pub fn validate(&self, genome: &TeamGenome) -> Result<(), CoachError> {
        match self.issues(genome).into_iter().next() {
            Some(issue) => Err(CoachError::InvalidGenome(issue.to_string())),
            None => Ok(()),
        }
    }

    pub fn issues(&self, genome: &TeamGenome) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (role, tree) in &genome.roles {
            if tree.is_empty() {
                issues.push(ValidationIssue {
                    role: *role,
                    path: Vec::new(),
                    message: "role has no nodes".to_string(),
                });
            }
            if tree.nodes().len() > 1 {
                issues.push(ValidationIssue {
                    role: *role,
                    path: Vec::new(),
                    message: format!("{} roots, only the first is used", tree.nodes().len()),
                });
            }
            for (i, node) in tree.nodes().iter().enumerate() {
                let mut path = vec![i];
                self.validate_node(*role, node, &mut path, &mut issues);
            }
        }
        issues
    }

    fn validate_node(
        &self,
        role: Role,
        node: &GenomeNode,
        path: &mut NodePath,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let mut report = |message: String| {
            issues.push(ValidationIssue { role, path: path.clone(), message });
        };

        // Root sits at depth 0
        if path.len() - 1 > self.max_depth {
            report(format!("depth exceeds maximum {}", self.max_depth));
            return;
        }

        match node.cat {
            NodeCategory::Struct => {
                if !node.is_selector() && !node.is_sequence() {
                    report(format!("unknown structure '{}'", node.kind));
                }
                if node.children.is_empty() {
                    report(format!("{} has no children", node.kind));
                }
            }
            NodeCategory::Cond => {
                if self.registry.get_condition(&node.kind).is_none() {
                    report(format!("unknown condition '{}'", node.kind));
                }
            }
            NodeCategory::Act => match self.registry.get_action(&node.kind) {
                Some(action) => {
                    for param in node.present_params() {
                        let declared = action.params().iter().any(|spec| spec.param == param);
                        let numeric = node.param(param).and_then(|v| v.as_int()).is_some();
                        if !declared {
                            report(format!("{} does not take {}", node.kind, param));
                        } else if !numeric {
                            report(format!("{} on {} is not numeric", param, node.kind));
                        }
                    }
                }
                None => report(format!("unknown action '{}'", node.kind)),
            },
        }

        if !node.is_struct() && !node.children.is_empty() {
            report(format!("leaf '{}' has children", node.kind));
        }

        for (i, child) in node.children.iter().enumerate() {
            path.push(i);
            self.validate_node(role, child, path, issues);
            path.pop();
        }
    }
}
