use super::{
    actions::standard_actions,
    conditions::standard_conditions,
    traits::{ActionPrimitive, ConditionPrimitive, ParamSpec, RequiredContext},
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A registered primitive, tagged by the genome category it can appear under
#[derive(Clone)]
pub enum Primitive {
    Condition(Arc<dyn ConditionPrimitive>),
    Action(Arc<dyn ActionPrimitive>),
}

impl Primitive {
    pub fn alias(&self) -> &'static str {
        match self {
            Primitive::Condition(c) => c.alias(),
            Primitive::Action(a) => a.alias(),
        }
    }
}

/// One line of the catalogue listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub alias: &'static str,
    pub category: &'static str,
    pub context: Option<RequiredContext>,
    pub params: Vec<String>,
    pub description: &'static str,
}

/// Closed catalogue of every condition and action a genome may name.
///
/// Ordered by alias so that random draws from it are reproducible under a fixed seed.
pub struct PrimitiveRegistry {
    functions: BTreeMap<String, Primitive>,
}

impl PrimitiveRegistry {
    /// The standard hockey catalogue
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_conditions();
        registry.register_actions();
        registry
    }

    pub fn empty() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    pub fn register_condition(&mut self, condition: Arc<dyn ConditionPrimitive>) {
        self.functions
            .insert(condition.alias().to_string(), Primitive::Condition(condition));
    }

    pub fn register_action(&mut self, action: Arc<dyn ActionPrimitive>) {
        self.functions
            .insert(action.alias().to_string(), Primitive::Action(action));
    }

    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.functions.get(name)
    }

    pub fn get_condition(&self, name: &str) -> Option<Arc<dyn ConditionPrimitive>> {
        match self.functions.get(name)? {
            Primitive::Condition(c) => Some(Arc::clone(c)),
            Primitive::Action(_) => None,
        }
    }

    pub fn get_action(&self, name: &str) -> Option<Arc<dyn ActionPrimitive>> {
        match self.functions.get(name)? {
            Primitive::Action(a) => Some(Arc::clone(a)),
            Primitive::Condition(_) => None,
        }
    }

    pub fn condition_names(&self) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|(_, f)| matches!(f, Primitive::Condition(_)))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|(_, f)| matches!(f, Primitive::Action(_)))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Params an action declares; empty for unknown names and conditions
    pub fn declared_params(&self, name: &str) -> &'static [ParamSpec] {
        self.get_action(name).map(|a| a.params()).unwrap_or(&[])
    }

    /// Actions that may replace `current`: a different action whose context matches
    /// the current one's or is `Any`. `None` when `current` is not a registered action.
    pub fn replacement_candidates(&self, current: &str) -> Option<Vec<&str>> {
        let context = self.get_action(current)?.required_context();
        Some(
            self.functions
                .iter()
                .filter_map(|(name, f)| match f {
                    Primitive::Action(a)
                        if name != current && a.required_context().compatible_with(context) =>
                    {
                        Some(name.as_str())
                    }
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn catalogue(&self) -> Vec<CatalogueEntry> {
        self.functions
            .values()
            .map(|f| match f {
                Primitive::Condition(c) => CatalogueEntry {
                    alias: c.alias(),
                    category: "cond",
                    context: None,
                    params: Vec::new(),
                    description: c.description(),
                },
                Primitive::Action(a) => CatalogueEntry {
                    alias: a.alias(),
                    category: "act",
                    context: Some(a.required_context()),
                    params: a
                        .params()
                        .iter()
                        .map(|p| format!("{}={}", p.param, p.default))
                        .collect(),
                    description: a.description(),
                },
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_conditions(&mut self) {
        for condition in standard_conditions() {
            self.register_condition(Arc::new(condition));
        }
    }

    fn register_actions(&mut self) {
        for action in standard_actions() {
            self.register_action(Arc::new(action));
        }
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}
