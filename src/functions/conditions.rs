use super::traits::ConditionPrimitive;
use crate::engines::runtime::{Blackboard, Zone};
use crate::types::Point;

/// Condition backed by a plain function over the blackboard
pub struct PredicateCondition {
    alias: &'static str,
    description: &'static str,
    predicate: fn(&mut Blackboard<'_>) -> bool,
}

impl PredicateCondition {
    pub fn new(
        alias: &'static str,
        description: &'static str,
        predicate: fn(&mut Blackboard<'_>) -> bool,
    ) -> Self {
        Self { alias, description, predicate }
    }
}

impl ConditionPrimitive for PredicateCondition {
    fn alias(&self) -> &'static str {
        self.alias
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn evaluate(&self, bb: &mut Blackboard<'_>) -> bool {
        (self.predicate)(bb)
    }
}

fn forward_lane_clear(bb: &mut Blackboard<'_>) -> bool {
    let agent = bb.agent;
    bb.carry_target = Some(Point::new(
        agent.x + bb.forward_dir * bb.rink.carry_distance,
        agent.y,
    ));
    agent.forward_lane_clear
}

fn has_breakout_pass(bb: &mut Blackboard<'_>) -> bool {
    let target = bb.forward_options().next().copied();
    if target.is_some() {
        bb.pass_target = target;
    }
    target.is_some()
}

fn has_backdoor(bb: &mut Blackboard<'_>) -> bool {
    let goal = bb.enemy_goal();
    let radius = bb.rink.backdoor_radius;
    let target = bb
        .agent
        .teammates
        .iter()
        .find(|m| m.lane_open && m.position().distance_to(goal) < radius)
        .copied();
    if target.is_some() {
        bb.pass_target = target;
    }
    target.is_some()
}

/// Every condition the standard catalogue registers
pub fn standard_conditions() -> Vec<PredicateCondition> {
    vec![
        PredicateCondition::new("condHasPuck", "Agent carries the puck", |bb| bb.has_puck),
        PredicateCondition::new("condLoosePuck", "Nobody carries the puck", |bb| bb.loose_puck),
        PredicateCondition::new("condOppHasPuck", "An opponent carries the puck", |bb| {
            bb.opp_has_puck
        }),
        PredicateCondition::new("condTeamHasPuck", "Agent or a teammate carries the puck", |bb| {
            bb.team_has_puck
        }),
        PredicateCondition::new("condPuckInDefZone", "Puck is in the defensive zone", |bb| {
            bb.puck_zone == Zone::Defensive
        }),
        PredicateCondition::new("condPuckInNeuZone", "Puck is in the neutral zone", |bb| {
            bb.puck_zone == Zone::Neutral
        }),
        PredicateCondition::new("condPuckInOffZone", "Puck is in the offensive zone", |bb| {
            bb.puck_zone == Zone::Offensive
        }),
        PredicateCondition::new("condInShotRange", "Agent is within shooting range", |bb| {
            bb.in_shot_range
        }),
        PredicateCondition::new(
            "condForwardLaneClear",
            "Lane ahead is open; stores the carry target",
            forward_lane_clear,
        ),
        PredicateCondition::new(
            "condHasBreakoutPass",
            "An open teammate is further up the ice; stores the pass target",
            has_breakout_pass,
        ),
        PredicateCondition::new("condAmIClosest", "Agent is the closest teammate to the puck", |bb| {
            bb.am_i_closest
        }),
        PredicateCondition::new("condIsPressured", "An opponent is within pressure range", |bb| {
            bb.is_pressured
        }),
        PredicateCondition::new(
            "condHasBackdoor",
            "An open teammate waits at the enemy net; stores the pass target",
            has_backdoor,
        ),
    ]
}
