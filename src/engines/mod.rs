pub mod compiler;
pub mod generation;
pub mod runtime;
pub mod training;
