use serde::{Deserialize, Serialize};
use std::fmt;

/// Skater positions a team genome carries one tree for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Centre
    C,
    /// Left wing
    Lw,
    /// Right wing
    Rw,
    /// Left defence
    Ld,
    /// Right defence
    Rd,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::C, Role::Lw, Role::Rw, Role::Ld, Role::Rd];

    /// Genome file key (`"lw"`)
    pub fn key(&self) -> &'static str {
        match self {
            Role::C => "c",
            Role::Lw => "lw",
            Role::Rw => "rw",
            Role::Ld => "ld",
            Role::Rd => "rd",
        }
    }

    pub fn from_key(key: &str) -> Option<Role> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key().to_uppercase())
    }
}

/// What the agent does with the puck on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    None,
    Shoot,
    Pass,
}

/// Reference to another skater on the ice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Per-tick output of a policy: a movement target plus an optional puck action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionCommand {
    pub tx: f64,
    pub ty: f64,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AgentRef>,
}

impl ActionCommand {
    pub fn move_to(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            action: ActionKind::None,
            target: None,
        }
    }

    pub fn shoot_at(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            action: ActionKind::Shoot,
            target: None,
        }
    }

    pub fn pass_to(tx: f64, ty: f64, target: AgentRef) -> Self {
        Self {
            tx,
            ty,
            action: ActionKind::Pass,
            target: Some(target),
        }
    }

    /// Both coordinates are finite numbers
    pub fn is_well_formed(&self) -> bool {
        self.tx.is_finite() && self.ty.is_finite()
    }
}
