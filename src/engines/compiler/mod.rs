//! Genome compiler: turns a [`TeamGenome`] into one executable behavior tree per role.
//!
//! Compilation never fails. Unknown primitives and structures degrade to fail-closed
//! nodes and are reported as [`CompileDiagnostic`]s.

mod fallback;

use crate::config::RinkConfig;
use crate::engines::runtime::{
    ActionNode, AgentState, BehaviorNode, Blackboard, ConditionNode, TickResult,
};
use crate::functions::registry::PrimitiveRegistry;
use crate::functions::traits::ActionParams;
use crate::genome::{GenomeNode, NodeCategory, TeamGenome};
use crate::types::{ActionCommand, Role};
use fallback::{AlwaysFalse, InertAction};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A recovered problem found while compiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileDiagnostic {
    UnresolvedCondition { role: Role, kind: String },
    UnresolvedAction { role: Role, kind: String },
    UnknownStructure { role: Role, kind: String },
    EmptyRole { role: Role },
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileDiagnostic::UnresolvedCondition { role, kind } => {
                write!(f, "{}: condition '{}' not found, compiled as always-false", role, kind)
            }
            CompileDiagnostic::UnresolvedAction { role, kind } => {
                write!(f, "{}: action '{}' not found, compiled as inert", role, kind)
            }
            CompileDiagnostic::UnknownStructure { role, kind } => {
                write!(f, "{}: structure '{}' unknown, compiled as failing selector", role, kind)
            }
            CompileDiagnostic::EmptyRole { role } => write!(f, "{}: role has no nodes", role),
        }
    }
}

/// Compiled policy for a whole team
#[derive(Debug, Clone)]
pub struct CompiledTeam {
    trees: BTreeMap<Role, BehaviorNode>,
    rink: RinkConfig,
    diagnostics: Vec<CompileDiagnostic>,
}

impl CompiledTeam {
    /// Decide one agent's command for this tick.
    ///
    /// Missing trees, bare `Success`/`Failure` results and non-finite coordinates all
    /// come back as "stay in place, no action".
    pub fn think(&self, state: &AgentState) -> ActionCommand {
        let Some(tree) = self.trees.get(&state.role) else {
            return self.stay(state);
        };

        let mut bb = Blackboard::new(state, &self.rink);
        match tree.tick(&mut bb) {
            TickResult::Action(cmd) if cmd.is_well_formed() => cmd,
            other => {
                log::debug!("{} tick produced {:?}, holding position", state.role, other);
                self.stay(state)
            }
        }
    }

    fn stay(&self, state: &AgentState) -> ActionCommand {
        let cmd = ActionCommand::move_to(state.x, state.y);
        if cmd.is_well_formed() {
            cmd
        } else {
            ActionCommand::move_to(self.rink.center_x, self.rink.center_y)
        }
    }

    pub fn tree(&self, role: Role) -> Option<&BehaviorNode> {
        self.trees.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.trees.keys().copied()
    }

    pub fn diagnostics(&self) -> &[CompileDiagnostic] {
        &self.diagnostics
    }
}

pub struct GenomeCompiler {
    registry: Arc<PrimitiveRegistry>,
    rink: RinkConfig,
}

impl GenomeCompiler {
    pub fn new(registry: Arc<PrimitiveRegistry>, rink: RinkConfig) -> Self {
        Self { registry, rink }
    }

    pub fn registry(&self) -> &Arc<PrimitiveRegistry> {
        &self.registry
    }

    /// Build every role's tree once, up front
    pub fn compile(&self, genome: &TeamGenome) -> CompiledTeam {
        let mut trees = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for (role, role_tree) in &genome.roles {
            match role_tree.root() {
                Some(root) => {
                    let tree = self.create_node(*role, root, &mut diagnostics);
                    trees.insert(*role, tree);
                }
                None => diagnostics.push(CompileDiagnostic::EmptyRole { role: *role }),
            }
        }

        for diagnostic in &diagnostics {
            log::warn!("Compiling '{}': {}", genome.display_name(), diagnostic);
        }

        CompiledTeam {
            trees,
            rink: self.rink.clone(),
            diagnostics,
        }
    }

    fn create_node(
        &self,
        role: Role,
        node: &GenomeNode,
        diagnostics: &mut Vec<CompileDiagnostic>,
    ) -> BehaviorNode {
        match node.cat {
            NodeCategory::Struct => {
                if node.is_selector() {
                    BehaviorNode::Selector(self.create_children(role, node, diagnostics))
                } else if node.is_sequence() {
                    BehaviorNode::Sequence(self.create_children(role, node, diagnostics))
                } else {
                    diagnostics.push(CompileDiagnostic::UnknownStructure {
                        role,
                        kind: node.kind.clone(),
                    });
                    BehaviorNode::Selector(Vec::new())
                }
            }
            NodeCategory::Cond => match self.registry.get_condition(&node.kind) {
                Some(condition) => BehaviorNode::Condition(ConditionNode::new(condition)),
                None => {
                    diagnostics.push(CompileDiagnostic::UnresolvedCondition {
                        role,
                        kind: node.kind.clone(),
                    });
                    BehaviorNode::Condition(ConditionNode::new(Arc::new(AlwaysFalse)))
                }
            },
            NodeCategory::Act => match self.registry.get_action(&node.kind) {
                Some(action) => {
                    let params = ActionParams::resolve(action.params(), node);
                    BehaviorNode::Action(ActionNode::new(action, params))
                }
                None => {
                    diagnostics.push(CompileDiagnostic::UnresolvedAction {
                        role,
                        kind: node.kind.clone(),
                    });
                    BehaviorNode::Action(ActionNode::new(Arc::new(InertAction), ActionParams::default()))
                }
            },
        }
    }

    fn create_children(
        &self,
        role: Role,
        node: &GenomeNode,
        diagnostics: &mut Vec<CompileDiagnostic>,
    ) -> Vec<BehaviorNode> {
        node.children
            .iter()
            .map(|child| self.create_node(role, child, diagnostics))
            .collect()
    }
}
