use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Fitness subject '{candidate_id}' missing from standings of episode {episode}")]
    MissingFitnessSubject { candidate_id: String, episode: usize },

    #[error("No eligible mutation target after {attempts} attempts")]
    NoEligibleMutationTarget { attempts: usize },

    #[error("Invalid trainer state: {0}")]
    InvalidState(String),

    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("Evaluator error: {0}")]
    Evaluator(String),

    #[error("Training cancelled before episode {episode}")]
    Cancelled { episode: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CoachError>;
