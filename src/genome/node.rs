use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const SELECTOR: &str = "Selector";
pub const SEQUENCE: &str = "Sequence";

/// Index path from a role's node list down to a node: `[root_index, child, grandchild, ...]`
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Struct,
    Cond,
    Act,
}

/// Numeric fields an action node may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericParam {
    OffsetX,
    OffsetY,
    Depth,
}

impl NumericParam {
    pub const ALL: [NumericParam; 3] = [NumericParam::OffsetX, NumericParam::OffsetY, NumericParam::Depth];

    pub fn key(&self) -> &'static str {
        match self {
            NumericParam::OffsetX => "offsetx",
            NumericParam::OffsetY => "offsety",
            NumericParam::Depth => "depth",
        }
    }
}

impl fmt::Display for NumericParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A stored numeric parameter, kept as the raw JSON value so corrupt entries survive loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamValue(Value);

impl ParamValue {
    pub fn from_int(value: i64) -> Self {
        Self(Value::from(value))
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Integer reading of the stored value: numbers truncate, numeric strings parse
    /// their leading integer, everything else is `None`.
    pub fn as_int(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Value::String(s) => parse_leading_int(s),
            _ => None,
        }
    }

    /// Counts as a number for the tweak path. `null` reads as 0 there.
    pub fn is_numeric(&self) -> bool {
        self.0.is_null() || self.as_int().is_some()
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    // Overlong digit runs saturate
    match digits.parse::<i64>() {
        Ok(v) => Some(sign * v),
        Err(_) if sign < 0 => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// A present key always yields `Some`, even when its value is `null`
fn present_param<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ParamValue>, D::Error> {
    Value::deserialize(deserializer).map(|v| Some(ParamValue(v)))
}

/// One node of a genome tree as it appears in a genome file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeNode {
    pub cat: NodeCategory,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GenomeNode>,
    #[serde(default, deserialize_with = "present_param", skip_serializing_if = "Option::is_none")]
    pub offsetx: Option<ParamValue>,
    #[serde(default, deserialize_with = "present_param", skip_serializing_if = "Option::is_none")]
    pub offsety: Option<ParamValue>,
    #[serde(default, deserialize_with = "present_param", skip_serializing_if = "Option::is_none")]
    pub depth: Option<ParamValue>,
}

impl GenomeNode {
    fn leaf(cat: NodeCategory, kind: &str) -> Self {
        Self {
            cat,
            kind: kind.to_string(),
            children: Vec::new(),
            offsetx: None,
            offsety: None,
            depth: None,
        }
    }

    pub fn selector(children: Vec<GenomeNode>) -> Self {
        Self {
            children,
            ..Self::leaf(NodeCategory::Struct, SELECTOR)
        }
    }

    pub fn sequence(children: Vec<GenomeNode>) -> Self {
        Self {
            children,
            ..Self::leaf(NodeCategory::Struct, SEQUENCE)
        }
    }

    pub fn condition(kind: &str) -> Self {
        Self::leaf(NodeCategory::Cond, kind)
    }

    pub fn action(kind: &str) -> Self {
        Self::leaf(NodeCategory::Act, kind)
    }

    pub fn with_param(mut self, param: NumericParam, value: impl Into<ParamValue>) -> Self {
        self.set_param(param, value.into());
        self
    }

    pub fn is_struct(&self) -> bool {
        self.cat == NodeCategory::Struct
    }

    pub fn is_selector(&self) -> bool {
        self.is_struct() && self.kind == SELECTOR
    }

    pub fn is_sequence(&self) -> bool {
        self.is_struct() && self.kind == SEQUENCE
    }

    pub fn is_action(&self) -> bool {
        self.cat == NodeCategory::Act
    }

    pub fn param(&self, param: NumericParam) -> Option<&ParamValue> {
        match param {
            NumericParam::OffsetX => self.offsetx.as_ref(),
            NumericParam::OffsetY => self.offsety.as_ref(),
            NumericParam::Depth => self.depth.as_ref(),
        }
    }

    pub fn set_param(&mut self, param: NumericParam, value: ParamValue) {
        let slot = match param {
            NumericParam::OffsetX => &mut self.offsetx,
            NumericParam::OffsetY => &mut self.offsety,
            NumericParam::Depth => &mut self.depth,
        };
        *slot = Some(value);
    }

    pub fn clear_params(&mut self) {
        self.offsetx = None;
        self.offsety = None;
        self.depth = None;
    }

    /// Params that are present on the node, valid or not
    pub fn present_params(&self) -> Vec<NumericParam> {
        NumericParam::ALL
            .iter()
            .copied()
            .filter(|p| self.param(*p).is_some())
            .collect()
    }

    /// At least one present param reads as a number
    pub fn has_valid_params(&self) -> bool {
        NumericParam::ALL
            .iter()
            .any(|p| self.param(*p).is_some_and(ParamValue::is_numeric))
    }

    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(GenomeNode::count_nodes).sum::<usize>()
    }

    /// Depth-first, pre-order visit
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a GenomeNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Paths (relative to `prefix`) of every node in this subtree that matches `predicate`
    pub fn collect_paths<P>(&self, predicate: &P, prefix: &mut NodePath, out: &mut Vec<NodePath>)
    where
        P: Fn(&GenomeNode) -> bool,
    {
        if predicate(self) {
            out.push(prefix.clone());
        }
        for (i, child) in self.children.iter().enumerate() {
            prefix.push(i);
            child.collect_paths(predicate, prefix, out);
            prefix.pop();
        }
    }

    /// Descend through `children` following `path`; an empty path is this node
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut GenomeNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get_mut(*head)?.descendant_mut(rest),
        }
    }

    pub fn descendant(&self, path: &[usize]) -> Option<&GenomeNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.children.get(*head)?.descendant(rest),
        }
    }
}
