use crate::config::RinkConfig;
use crate::types::{Point, Role};
use serde::{Deserialize, Serialize};

/// Another skater as seen by the agent this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkaterView {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    /// Host-computed: the passing lane from the agent to this skater is open
    #[serde(default)]
    pub lane_open: bool,
}

impl SkaterView {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PuckState {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    /// Id of the skater carrying the puck, `None` when loose
    #[serde(default)]
    pub owner: Option<u32>,
}

impl PuckState {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Raw per-tick state supplied by the simulation for one agent.
///
/// Lane-of-sight checks need the physics world, so the host computes them and
/// passes the answers in (`forward_lane_clear`, `SkaterView::lane_open`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: u32,
    /// 0 defends the left goal, 1 the right one
    pub team: u8,
    pub role: Role,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub possession_time: u32,
    pub puck: PuckState,
    #[serde(default)]
    pub teammates: Vec<SkaterView>,
    #[serde(default)]
    pub opponents: Vec<SkaterView>,
    #[serde(default)]
    pub forward_lane_clear: bool,
}

impl AgentState {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Defensive,
    Neutral,
    Offensive,
}

/// Derived sensory snapshot every node of a tree reads during one tick.
///
/// Built fresh per tick. `carry_target` and `pass_target` are scratch slots a
/// condition fills for the action that follows it in the same tick.
#[derive(Debug, Clone)]
pub struct Blackboard<'a> {
    pub agent: &'a AgentState,
    pub rink: &'a RinkConfig,
    pub my_goal_x: f64,
    pub enemy_goal_x: f64,
    /// +1 when attacking to the right, -1 otherwise
    pub forward_dir: f64,
    pub has_puck: bool,
    pub loose_puck: bool,
    pub opp_has_puck: bool,
    pub team_has_puck: bool,
    pub puck_zone: Zone,
    pub dist_to_goal: f64,
    pub in_shot_range: bool,
    pub is_pressured: bool,
    pub am_i_closest: bool,
    pub carrier: Option<Point>,
    pub intercept_point: Point,
    pub carry_target: Option<Point>,
    pub pass_target: Option<SkaterView>,
}

impl<'a> Blackboard<'a> {
    pub fn new(agent: &'a AgentState, rink: &'a RinkConfig) -> Self {
        let (my_goal_x, enemy_goal_x) = if agent.team == 0 {
            (rink.left_goal_x, rink.right_goal_x)
        } else {
            (rink.right_goal_x, rink.left_goal_x)
        };
        let forward_dir = if enemy_goal_x > my_goal_x { 1.0 } else { -1.0 };

        let owner = agent.puck.owner;
        let has_puck = owner == Some(agent.id);
        let team_has_puck = has_puck
            || owner.map_or(false, |id| agent.teammates.iter().any(|m| m.id == id));
        let opp_has_puck = owner.map_or(false, |id| agent.opponents.iter().any(|o| o.id == id));

        let carrier = owner.and_then(|id| {
            if id == agent.id {
                Some(agent.position())
            } else {
                agent
                    .teammates
                    .iter()
                    .chain(agent.opponents.iter())
                    .find(|s| s.id == id)
                    .map(SkaterView::position)
            }
        });

        let me = agent.position();
        let puck = agent.puck.position();
        let goal = Point::new(enemy_goal_x, rink.center_y);
        let dist_to_goal = me.distance_to(goal);
        let my_puck_dist = me.distance_to(puck);

        Self {
            agent,
            rink,
            my_goal_x,
            enemy_goal_x,
            forward_dir,
            has_puck,
            loose_puck: owner.is_none(),
            opp_has_puck,
            team_has_puck,
            puck_zone: Self::zone_of(puck.x, forward_dir, rink),
            dist_to_goal,
            in_shot_range: dist_to_goal < rink.shot_range,
            is_pressured: agent
                .opponents
                .iter()
                .any(|o| me.distance_to(o.position()) < rink.pressure_radius),
            am_i_closest: agent
                .teammates
                .iter()
                .all(|m| my_puck_dist <= m.position().distance_to(puck)),
            carrier,
            intercept_point: Point::new(
                puck.x + agent.puck.vx * rink.intercept_lookahead,
                puck.y + agent.puck.vy * rink.intercept_lookahead,
            ),
            carry_target: None,
            pass_target: None,
        }
    }

    fn zone_of(x: f64, forward_dir: f64, rink: &RinkConfig) -> Zone {
        // Positive = towards the enemy goal
        let advance = (x - rink.center_x) * forward_dir;
        if advance < -rink.zone_margin {
            Zone::Defensive
        } else if advance > rink.zone_margin {
            Zone::Offensive
        } else {
            Zone::Neutral
        }
    }

    pub fn enemy_goal(&self) -> Point {
        Point::new(self.enemy_goal_x, self.rink.center_y)
    }

    /// Open teammates further up the ice than the agent
    pub fn forward_options(&self) -> impl Iterator<Item = &SkaterView> + '_ {
        let x = self.agent.x;
        let dir = self.forward_dir;
        self.agent
            .teammates
            .iter()
            .filter(move |m| m.lane_open && (m.x - x) * dir > 0.0)
    }
}
