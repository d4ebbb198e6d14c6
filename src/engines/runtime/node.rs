use super::blackboard::Blackboard;
use crate::functions::traits::{ActionParams, ActionPrimitive, ConditionPrimitive};
use crate::types::ActionCommand;
use std::fmt;
use std::sync::Arc;

/// Outcome of ticking a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickResult {
    Success,
    Failure,
    Action(ActionCommand),
}

impl TickResult {
    pub fn command(&self) -> Option<&ActionCommand> {
        match self {
            TickResult::Action(cmd) => Some(cmd),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ConditionNode {
    predicate: Arc<dyn ConditionPrimitive>,
}

impl ConditionNode {
    pub fn new(predicate: Arc<dyn ConditionPrimitive>) -> Self {
        Self { predicate }
    }

    pub fn name(&self) -> &'static str {
        self.predicate.alias()
    }

    pub fn tick(&self, bb: &mut Blackboard<'_>) -> TickResult {
        if self.predicate.evaluate(bb) {
            TickResult::Success
        } else {
            TickResult::Failure
        }
    }
}

/// Action leaf. Params are owned values captured at compile time.
#[derive(Clone)]
pub struct ActionNode {
    effect: Arc<dyn ActionPrimitive>,
    params: ActionParams,
}

impl ActionNode {
    pub fn new(effect: Arc<dyn ActionPrimitive>, params: ActionParams) -> Self {
        Self { effect, params }
    }

    pub fn name(&self) -> &'static str {
        self.effect.alias()
    }

    pub fn params(&self) -> &ActionParams {
        &self.params
    }

    /// An effect with no valid target reports `Failure`
    pub fn tick(&self, bb: &Blackboard<'_>) -> TickResult {
        match self.effect.execute(bb, &self.params) {
            Some(cmd) => TickResult::Action(cmd),
            None => TickResult::Failure,
        }
    }
}

/// Executable behavior tree node. Stateless: the whole tree is re-evaluated every tick.
#[derive(Clone)]
pub enum BehaviorNode {
    /// First child that does not fail wins
    Selector(Vec<BehaviorNode>),
    /// Runs children until one does not succeed
    Sequence(Vec<BehaviorNode>),
    Condition(ConditionNode),
    Action(ActionNode),
}

impl BehaviorNode {
    pub fn tick(&self, bb: &mut Blackboard<'_>) -> TickResult {
        match self {
            BehaviorNode::Selector(children) => {
                for child in children {
                    let result = child.tick(bb);
                    if result != TickResult::Failure {
                        return result;
                    }
                }
                TickResult::Failure
            }
            BehaviorNode::Sequence(children) => {
                for child in children {
                    let result = child.tick(bb);
                    if result != TickResult::Success {
                        return result;
                    }
                }
                TickResult::Success
            }
            BehaviorNode::Condition(node) => node.tick(bb),
            BehaviorNode::Action(node) => node.tick(bb),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BehaviorNode::Selector(children) | BehaviorNode::Sequence(children) => {
                1 + children.iter().map(BehaviorNode::node_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

impl fmt::Debug for BehaviorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorNode::Selector(children) => f.debug_tuple("Selector").field(children).finish(),
            BehaviorNode::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            BehaviorNode::Condition(node) => write!(f, "Condition({})", node.name()),
            BehaviorNode::Action(node) => write!(f, "Action({}, {:?})", node.name(), node.params()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RinkConfig;
    use crate::engines::runtime::blackboard::fixtures::attacking_centre;
    use crate::functions::traits::RequiredContext;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        result: bool,
        calls: Arc<AtomicUsize>,
    }

    impl ConditionPrimitive for Fixed {
        fn alias(&self) -> &'static str {
            "fixed"
        }
        fn description(&self) -> &'static str {
            "test"
        }
        fn evaluate(&self, _bb: &mut Blackboard<'_>) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    struct Goto(Option<(f64, f64)>, Arc<AtomicUsize>);

    impl ActionPrimitive for Goto {
        fn alias(&self) -> &'static str {
            "goto"
        }
        fn description(&self) -> &'static str {
            "test"
        }
        fn required_context(&self) -> RequiredContext {
            RequiredContext::Any
        }
        fn execute(&self, _bb: &Blackboard<'_>, _params: &ActionParams) -> Option<ActionCommand> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.map(|(x, y)| ActionCommand::move_to(x, y))
        }
    }

    fn cond(result: bool, calls: &Arc<AtomicUsize>) -> BehaviorNode {
        BehaviorNode::Condition(ConditionNode::new(Arc::new(Fixed {
            result,
            calls: Arc::clone(calls),
        })))
    }

    fn act(target: Option<(f64, f64)>, calls: &Arc<AtomicUsize>) -> BehaviorNode {
        BehaviorNode::Action(ActionNode::new(
            Arc::new(Goto(target, Arc::clone(calls))),
            ActionParams::default(),
        ))
    }

    fn tick(node: &BehaviorNode) -> TickResult {
        let rink = RinkConfig::default();
        let state = attacking_centre();
        let mut bb = Blackboard::new(&state, &rink);
        node.tick(&mut bb)
    }

    #[test]
    fn test_selector_returns_first_non_failure_and_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Selector(vec![
            cond(false, &calls),
            cond(false, &calls),
            act(Some((1.0, 2.0)), &calls),
            act(Some((9.0, 9.0)), &after),
        ]);
        assert_eq!(tick(&tree), TickResult::Action(ActionCommand::move_to(1.0, 2.0)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_selector_all_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Selector(vec![cond(false, &calls), act(None, &calls)]);
        assert_eq!(tick(&tree), TickResult::Failure);
        assert_eq!(tick(&BehaviorNode::Selector(Vec::new())), TickResult::Failure);
    }

    #[test]
    fn test_sequence_returns_first_non_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Sequence(vec![
            cond(true, &calls),
            cond(false, &calls),
            act(Some((5.0, 5.0)), &after),
        ]);
        assert_eq!(tick(&tree), TickResult::Failure);
        assert_eq!(after.load(Ordering::SeqCst), 0);

        let tree = BehaviorNode::Sequence(vec![cond(true, &calls), act(Some((5.0, 6.0)), &calls)]);
        assert_eq!(tick(&tree), TickResult::Action(ActionCommand::move_to(5.0, 6.0)));
    }

    #[test]
    fn test_sequence_all_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Sequence(vec![cond(true, &calls), cond(true, &calls)]);
        assert_eq!(tick(&tree), TickResult::Success);
        assert_eq!(tick(&BehaviorNode::Sequence(Vec::new())), TickResult::Success);
    }

    #[test]
    fn test_precondition_only_sequence_blocks_later_branches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fallback = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Selector(vec![
            BehaviorNode::Sequence(vec![cond(true, &calls)]),
            act(Some((0.0, 0.0)), &fallback),
        ]);
        assert_eq!(tick(&tree), TickResult::Success);
        assert_eq!(fallback.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_action_counts_as_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = BehaviorNode::Selector(vec![act(None, &calls), act(Some((3.0, 4.0)), &calls)]);
        assert_eq!(tick(&tree), TickResult::Action(ActionCommand::move_to(3.0, 4.0)));
        assert_eq!(tree.node_count(), 3);
    }
}
