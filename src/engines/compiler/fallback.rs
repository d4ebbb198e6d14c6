use crate::engines::runtime::Blackboard;
use crate::functions::traits::{ActionParams, ActionPrimitive, ConditionPrimitive, RequiredContext};
use crate::types::ActionCommand;

/// Stands in for a condition the registry cannot resolve
pub(crate) struct AlwaysFalse;

impl ConditionPrimitive for AlwaysFalse {
    fn alias(&self) -> &'static str {
        "unresolvedCondition"
    }

    fn description(&self) -> &'static str {
        "Never holds"
    }

    fn evaluate(&self, _bb: &mut Blackboard<'_>) -> bool {
        false
    }
}

/// Stands in for an action the registry cannot resolve
pub(crate) struct InertAction;

impl ActionPrimitive for InertAction {
    fn alias(&self) -> &'static str {
        "unresolvedAction"
    }

    fn description(&self) -> &'static str {
        "Moves to the origin without acting"
    }

    fn required_context(&self) -> RequiredContext {
        RequiredContext::Any
    }

    fn execute(&self, _bb: &Blackboard<'_>, _params: &ActionParams) -> Option<ActionCommand> {
        Some(ActionCommand::move_to(0.0, 0.0))
    }
}
