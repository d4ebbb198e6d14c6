pub mod blackboard;
pub mod node;

pub use blackboard::{AgentState, Blackboard, PuckState, SkaterView, Zone};
pub use node::{ActionNode, BehaviorNode, ConditionNode, TickResult};
