use super::fitness::FitnessKey;
use super::history::{Outcome, TrainingHistoryEntry};
use std::sync::mpsc::Sender;

pub trait ProgressCallback: Send {
    fn on_episode_start(&mut self, episode: usize, budget: usize);
    fn on_episode_complete(&mut self, entry: &TrainingHistoryEntry, best_fitness: FitnessKey);
}

/// Reports progress through the `log` facade
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_episode_start(&mut self, episode: usize, budget: usize) {
        log::info!("Episode {}/{} starting", episode, budget);
    }

    fn on_episode_complete(&mut self, entry: &TrainingHistoryEntry, best_fitness: FitnessKey) {
        log::info!(
            "Episode {} {}: {} (best {})",
            entry.episode,
            entry.outcome,
            entry.stats.fitness(),
            best_fitness
        );
    }
}

// For hosts that drive a UI from another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    EpisodeStart { episode: usize, budget: usize },
    EpisodeComplete { episode: usize, outcome: Outcome, fitness: FitnessKey, best_fitness: FitnessKey },
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_episode_start(&mut self, episode: usize, budget: usize) {
        let _ = self.sender.send(ProgressMessage::EpisodeStart { episode, budget });
    }

    fn on_episode_complete(&mut self, entry: &TrainingHistoryEntry, best_fitness: FitnessKey) {
        let _ = self.sender.send(ProgressMessage::EpisodeComplete {
            episode: entry.episode,
            outcome: entry.outcome,
            fitness: entry.stats.fitness(),
            best_fitness,
        });
    }
}
