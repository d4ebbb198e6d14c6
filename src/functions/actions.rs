use super::traits::{ActionParams, ActionPrimitive, ParamSpec, RequiredContext};
use crate::engines::runtime::Blackboard;
use crate::genome::NumericParam;
use crate::types::{ActionCommand, AgentRef};

pub const SUPPORT_POSITION: &str = "actSupportPosition";
pub const SAFETY_POSITION: &str = "actSafetyPosition";

const SUPPORT_PARAMS: &[ParamSpec] = &[
    ParamSpec { param: NumericParam::OffsetX, default: -40 },
    ParamSpec { param: NumericParam::OffsetY, default: 60 },
];
const SAFETY_PARAMS: &[ParamSpec] = &[ParamSpec { param: NumericParam::Depth, default: 120 }];

/// Vertical distance from centre a dump-in aims for
const DUMP_IN_SPREAD: f64 = 200.0;

type Effect = fn(&Blackboard<'_>, &ActionParams) -> Option<ActionCommand>;

/// Action backed by a plain function over the blackboard and compile-time params
pub struct EffectAction {
    alias: &'static str,
    description: &'static str,
    context: RequiredContext,
    params: &'static [ParamSpec],
    effect: Effect,
}

impl EffectAction {
    pub fn new(
        alias: &'static str,
        description: &'static str,
        context: RequiredContext,
        effect: Effect,
    ) -> Self {
        Self { alias, description, context, params: &[], effect }
    }

    pub fn with_params(mut self, params: &'static [ParamSpec]) -> Self {
        self.params = params;
        self
    }
}

impl ActionPrimitive for EffectAction {
    fn alias(&self) -> &'static str {
        self.alias
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn required_context(&self) -> RequiredContext {
        self.context
    }

    fn params(&self) -> &'static [ParamSpec] {
        self.params
    }

    fn execute(&self, bb: &Blackboard<'_>, params: &ActionParams) -> Option<ActionCommand> {
        (self.effect)(bb, params)
    }
}

fn stay(bb: &Blackboard<'_>) -> ActionCommand {
    ActionCommand::move_to(bb.agent.x, bb.agent.y)
}

fn shoot(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    Some(ActionCommand::shoot_at(bb.enemy_goal_x, bb.rink.center_y))
}

fn drive_net(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    Some(ActionCommand::move_to(bb.enemy_goal_x, bb.rink.center_y))
}

/// Memoized pass target first; otherwise the open teammate closest to the enemy
/// net who is nearer to it than the agent (any open teammate when pressured).
fn pass(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    if let Some(mate) = bb.pass_target {
        return Some(ActionCommand::pass_to(mate.x, mate.y, AgentRef { id: mate.id }));
    }
    if bb.agent.possession_time < bb.rink.min_possession_for_pass {
        return None;
    }

    let goal = bb.enemy_goal();
    let my_dist = bb.agent.position().distance_to(goal);
    bb.agent
        .teammates
        .iter()
        .filter(|m| m.lane_open)
        .map(|m| (m, m.position().distance_to(goal)))
        .filter(|(_, dist)| bb.is_pressured || *dist < my_dist)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| ActionCommand::pass_to(m.x, m.y, AgentRef { id: m.id }))
}

fn execute_pass(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    match bb.pass_target {
        Some(mate) => Some(ActionCommand::pass_to(mate.x, mate.y, AgentRef { id: mate.id })),
        None => Some(ActionCommand::move_to(bb.enemy_goal_x, bb.rink.center_y)),
    }
}

fn execute_carry(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    let target = bb.carry_target.unwrap_or_else(|| bb.enemy_goal());
    Some(ActionCommand::move_to(target.x, target.y))
}

fn clear_puck(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    let cy = bb.rink.center_y;
    // Far corner, opposite the side the puck is on
    let corner_y = if bb.agent.puck.y < cy { cy + DUMP_IN_SPREAD } else { cy - DUMP_IN_SPREAD };
    Some(ActionCommand::shoot_at(bb.enemy_goal_x, corner_y))
}

fn smart_intercept(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    Some(ActionCommand::move_to(bb.intercept_point.x, bb.intercept_point.y))
}

fn defend_home(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    let cy = bb.rink.center_y;
    Some(match bb.carrier {
        Some(carrier) => ActionCommand::move_to((carrier.x + bb.my_goal_x) / 2.0, (carrier.y + cy) / 2.0),
        None => ActionCommand::move_to(bb.my_goal_x, cy),
    })
}

fn hover_blue_line(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    Some(ActionCommand::move_to(
        bb.rink.center_x + bb.forward_dir * bb.rink.zone_margin,
        bb.rink.center_y,
    ))
}

fn support_position(bb: &Blackboard<'_>, params: &ActionParams) -> Option<ActionCommand> {
    let Some(carrier) = bb.carrier else {
        return Some(stay(bb));
    };
    let off_x = params.get(NumericParam::OffsetX).unwrap_or(-40.0);
    let off_y = params.get(NumericParam::OffsetY).unwrap_or(60.0);
    let ty = if bb.agent.y < bb.rink.center_y { carrier.y - off_y } else { carrier.y + off_y };
    Some(ActionCommand::move_to(carrier.x + bb.forward_dir * off_x, ty))
}

fn safety_position(bb: &Blackboard<'_>, params: &ActionParams) -> Option<ActionCommand> {
    let depth = params.get(NumericParam::Depth).unwrap_or(120.0);
    Some(ActionCommand::move_to(
        bb.my_goal_x + bb.forward_dir * depth,
        bb.rink.center_y,
    ))
}

fn chill(bb: &Blackboard<'_>, _: &ActionParams) -> Option<ActionCommand> {
    Some(stay(bb))
}

/// Every action the standard catalogue registers
pub fn standard_actions() -> Vec<EffectAction> {
    use RequiredContext::{Any, HasPuck, NoPuck};

    vec![
        EffectAction::new("actShoot", "Shoot at the enemy net", HasPuck, shoot),
        EffectAction::new("actPass", "Pass forward to an open teammate", HasPuck, pass),
        EffectAction::new("actExecutePass", "Pass to the memoized target or drive", HasPuck, execute_pass),
        EffectAction::new("actDriveNet", "Skate the puck at the enemy net", HasPuck, drive_net),
        EffectAction::new("actExecuteCarry", "Carry to the memoized lane target", HasPuck, execute_carry),
        EffectAction::new("actClearPuck", "Dump the puck into the far corner", HasPuck, clear_puck),
        EffectAction::new("actSmartIntercept", "Skate to the predicted puck position", NoPuck, smart_intercept),
        EffectAction::new("actDefendHome", "Close the gap between carrier and own net", NoPuck, defend_home),
        EffectAction::new("actHoverBlueLine", "Hold just past centre ice", NoPuck, hover_blue_line),
        EffectAction::new(SUPPORT_POSITION, "Hold an offset from the carrier", NoPuck, support_position)
            .with_params(SUPPORT_PARAMS),
        EffectAction::new(SAFETY_POSITION, "Hold a depth in front of own net", NoPuck, safety_position)
            .with_params(SAFETY_PARAMS),
        EffectAction::new("actChill", "Stay in place", Any, chill),
        EffectAction::new("actIdle", "Stay in place", Any, chill),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RinkConfig;
    use crate::engines::runtime::blackboard::fixtures::attacking_centre;
    use crate::engines::runtime::PuckState;
    use crate::types::ActionKind;

    fn run(alias: &str, bb: &Blackboard<'_>, params: &ActionParams) -> Option<ActionCommand> {
        let action = standard_actions().into_iter().find(|a| a.alias() == alias).unwrap();
        action.execute(bb, params)
    }

    #[test]
    fn test_shoot_targets_enemy_goal() {
        let rink = RinkConfig::default();
        let state = attacking_centre();
        let bb = Blackboard::new(&state, &rink);
        let cmd = run("actShoot", &bb, &ActionParams::default()).unwrap();
        assert_eq!(cmd.action, ActionKind::Shoot);
        assert_eq!((cmd.tx, cmd.ty), (950.0, 320.0));
    }

    #[test]
    fn test_pass_picks_forward_teammate() {
        let rink = RinkConfig::default();
        let state = attacking_centre();
        let bb = Blackboard::new(&state, &rink);
        let cmd = run("actPass", &bb, &ActionParams::default()).unwrap();
        assert_eq!(cmd.action, ActionKind::Pass);
        assert_eq!(cmd.target, Some(AgentRef { id: 2 }));
    }

    #[test]
    fn test_pass_without_target_is_empty() {
        let rink = RinkConfig::default();
        let mut state = attacking_centre();
        for mate in &mut state.teammates {
            mate.lane_open = false;
        }
        let bb = Blackboard::new(&state, &rink);
        assert!(run("actPass", &bb, &ActionParams::default()).is_none());

        state.possession_time = 0;
        let bb = Blackboard::new(&state, &rink);
        assert!(run("actPass", &bb, &ActionParams::default()).is_none());
    }

    #[test]
    fn test_support_position_uses_params() {
        let rink = RinkConfig::default();
        let mut state = attacking_centre();
        state.id = 3;
        state.x = 400.0;
        state.y = 400.0;
        state.puck = PuckState { x: 500.0, y: 320.0, vx: 0.0, vy: 0.0, owner: Some(2) };
        state.teammates = vec![crate::engines::runtime::SkaterView { id: 2, x: 500.0, y: 320.0, lane_open: true }];
        let bb = Blackboard::new(&state, &rink);

        let mut params = ActionParams::default();
        params.set(NumericParam::OffsetX, -20.0);
        params.set(NumericParam::OffsetY, 50.0);
        let cmd = run(SUPPORT_POSITION, &bb, &params).unwrap();
        assert_eq!((cmd.tx, cmd.ty), (480.0, 370.0));
    }

    #[test]
    fn test_support_position_without_carrier_stays() {
        let rink = RinkConfig::default();
        let mut state = attacking_centre();
        state.puck.owner = None;
        let bb = Blackboard::new(&state, &rink);
        let cmd = run(SUPPORT_POSITION, &bb, &ActionParams::default()).unwrap();
        assert_eq!((cmd.tx, cmd.ty), (state.x, state.y));
    }

    #[test]
    fn test_safety_position_depth() {
        let rink = RinkConfig::default();
        let state = attacking_centre();
        let bb = Blackboard::new(&state, &rink);
        let mut params = ActionParams::default();
        params.set(NumericParam::Depth, 150.0);
        let cmd = run(SAFETY_POSITION, &bb, &params).unwrap();
        assert_eq!((cmd.tx, cmd.ty), (200.0, 320.0));
    }
}
