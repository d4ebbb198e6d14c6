//! Evolves behavior-tree hockey policies by mutation and match-based hill climbing.

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod genome;
pub mod types;

pub use engines::compiler::{CompileDiagnostic, CompiledTeam, GenomeCompiler};
pub use engines::generation::{MutationEngine, MutationResult};
pub use engines::training::{Coach, CoachState, EpisodeStep, MatchEvaluator, TrainingReport};
pub use error::{CoachError, Result};
pub use functions::PrimitiveRegistry;
pub use genome::TeamGenome;
pub use types::{ActionCommand, ActionKind, Role};
