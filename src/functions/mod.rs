pub mod actions;
pub mod conditions;
pub mod registry;
pub mod traits;

pub use registry::{CatalogueEntry, Primitive, PrimitiveRegistry};
pub use traits::{ActionParams, ActionPrimitive, ConditionPrimitive, ParamSpec, RequiredContext};
