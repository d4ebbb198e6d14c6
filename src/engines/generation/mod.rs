pub mod mutation_engine;
pub mod operators;
pub mod undo;
pub mod validator;

pub use mutation_engine::{MutationEngine, MutationResult};
pub use operators::MutationOperator;
pub use undo::UndoStack;
pub use validator::{GenomeValidator, ValidationIssue};
