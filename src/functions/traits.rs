use crate::engines::runtime::Blackboard;
use crate::genome::{GenomeNode, NumericParam};
use crate::types::ActionCommand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Game context an action makes sense in. Action swaps stay within the current
/// action's context or move to a context-free one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequiredContext {
    Any,
    HasPuck,
    NoPuck,
}

impl RequiredContext {
    /// Whether an action tagged `self` may replace one tagged `current`
    pub fn compatible_with(&self, current: RequiredContext) -> bool {
        *self == RequiredContext::Any || *self == current
    }
}

impl fmt::Display for RequiredContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RequiredContext::Any => "ANY",
            RequiredContext::HasPuck => "HAS_PUCK",
            RequiredContext::NoPuck => "NO_PUCK",
        };
        f.write_str(tag)
    }
}

/// A numeric parameter an action declares, with the value it falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub param: NumericParam,
    pub default: i64,
}

/// Parameter values resolved from a genome node when the tree is compiled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionParams {
    offsetx: Option<f64>,
    offsety: Option<f64>,
    depth: Option<f64>,
}

impl ActionParams {
    /// Reads each declared param from `node`; missing, zero or non-numeric values
    /// take the default
    pub fn resolve(specs: &[ParamSpec], node: &GenomeNode) -> Self {
        let mut params = Self::default();
        for spec in specs {
            let value = match node.param(spec.param).map(|v| v.as_int()) {
                Some(Some(0)) => spec.default,
                Some(Some(v)) => v,
                Some(None) => {
                    log::warn!(
                        "Corrupt {} on '{}', using default {}",
                        spec.param, node.kind, spec.default
                    );
                    spec.default
                }
                None => spec.default,
            };
            params.set(spec.param, value as f64);
        }
        params
    }

    pub fn set(&mut self, param: NumericParam, value: f64) {
        match param {
            NumericParam::OffsetX => self.offsetx = Some(value),
            NumericParam::OffsetY => self.offsety = Some(value),
            NumericParam::Depth => self.depth = Some(value),
        }
    }

    pub fn get(&self, param: NumericParam) -> Option<f64> {
        match param {
            NumericParam::OffsetX => self.offsetx,
            NumericParam::OffsetY => self.offsety,
            NumericParam::Depth => self.depth,
        }
    }
}

/// A named predicate a `cond` node can reference
pub trait ConditionPrimitive: Send + Sync {
    /// Name used as the genome `type`
    fn alias(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// May write into the blackboard's scratch slots for later siblings
    fn evaluate(&self, bb: &mut Blackboard<'_>) -> bool;
}

/// A named effect an `act` node can reference
pub trait ActionPrimitive: Send + Sync {
    fn alias(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn required_context(&self) -> RequiredContext;

    /// Numeric params read from the genome at compile time
    fn params(&self) -> &'static [ParamSpec] {
        &[]
    }

    /// `None` when the effect has no valid target this tick
    fn execute(&self, bb: &Blackboard<'_>, params: &ActionParams) -> Option<ActionCommand>;
}
