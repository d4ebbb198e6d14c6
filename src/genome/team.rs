use super::node::{GenomeNode, NodePath};
use crate::error::Result;
use crate::types::Role;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_TEAM_NAME: &str = "Trainee";
pub const DEFAULT_TEAM_CODE: &str = "TRN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColors {
    pub main: String,
    pub secondary: String,
}

impl Default for TeamColors {
    fn default() -> Self {
        Self {
            main: "#00ff00".to_string(),
            secondary: "#004400".to_string(),
        }
    }
}

/// The node list stored under one role key. Files write it as a one-element list;
/// a bare node is accepted too. The first element is the root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleTree {
    nodes: Vec<GenomeNode>,
}

impl RoleTree {
    pub fn new(root: GenomeNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> Option<&GenomeNode> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[GenomeNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Paths of every matching node across the whole list
    pub fn find_paths<P>(&self, predicate: P) -> Vec<NodePath>
    where
        P: Fn(&GenomeNode) -> bool,
    {
        let mut out = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let mut prefix = vec![i];
            node.collect_paths(&predicate, &mut prefix, &mut out);
        }
        out
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&GenomeNode> {
        let (head, rest) = path.split_first()?;
        self.nodes.get(*head)?.descendant(rest)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut GenomeNode> {
        let (head, rest) = path.split_first()?;
        self.nodes.get_mut(*head)?.descendant_mut(rest)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleTreeRepr {
    List(Vec<GenomeNode>),
    Bare(GenomeNode),
}

impl<'de> Deserialize<'de> for RoleTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let nodes = match RoleTreeRepr::deserialize(deserializer)? {
            RoleTreeRepr::List(nodes) => nodes,
            RoleTreeRepr::Bare(node) => vec![node],
        };
        Ok(Self { nodes })
    }
}

impl Serialize for RoleTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

/// A complete team policy: one tree per role plus display metadata.
///
/// Clones are deep; nothing inside is shared, so a "best" genome and a candidate
/// derived from it never alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TeamGenomeFile")]
pub struct TeamGenome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<TeamColors>,
    #[serde(flatten)]
    pub roles: BTreeMap<Role, RoleTree>,
}

/// On-disk shape: role keys are picked out of the remaining top-level keys, anything
/// else (authoring metadata and the like) is ignored
#[derive(Deserialize)]
struct TeamGenomeFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    colors: Option<TeamColors>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl TryFrom<TeamGenomeFile> for TeamGenome {
    type Error = serde_json::Error;

    fn try_from(file: TeamGenomeFile) -> std::result::Result<Self, Self::Error> {
        let mut roles = BTreeMap::new();
        for (key, value) in file.rest {
            match Role::ALL.iter().find(|role| role.key() == key) {
                Some(role) => {
                    roles.insert(*role, serde_json::from_value(value)?);
                }
                None => log::debug!("Ignoring genome key '{}'", key),
            }
        }
        Ok(Self {
            name: file.name,
            code: file.code,
            colors: file.colors,
            roles,
        })
    }
}

impl TeamGenome {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            code: Some(code.to_string()),
            colors: None,
            roles: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: Role, root: GenomeNode) -> Self {
        self.roles.insert(role, RoleTree::new(root));
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(DEFAULT_TEAM_NAME)
    }

    pub fn display_code(&self) -> &str {
        self.code.as_deref().filter(|c| !c.is_empty()).unwrap_or(DEFAULT_TEAM_CODE)
    }

    pub fn display_colors(&self) -> TeamColors {
        self.colors.clone().unwrap_or_default()
    }

    pub fn root(&self, role: Role) -> Option<&GenomeNode> {
        self.roles.get(&role).and_then(RoleTree::root)
    }

    pub fn role_tree(&self, role: Role) -> Option<&RoleTree> {
        self.roles.get(&role)
    }

    pub fn role_tree_mut(&mut self, role: Role) -> Option<&mut RoleTree> {
        self.roles.get_mut(&role)
    }

    /// Roles that have at least one node, in role order
    pub fn populated_roles(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter(|(_, tree)| !tree.is_empty())
            .map(|(role, _)| *role)
            .collect()
    }

    /// Canonical serialized form, used for snapshots and de-duplication
    pub fn canonical_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
