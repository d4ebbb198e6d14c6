pub mod traits;
pub mod training;
pub mod mutation;
pub mod rink;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use training::TrainingConfig;
pub use mutation::MutationConfig;
pub use rink::RinkConfig;
