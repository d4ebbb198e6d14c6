use super::evaluator::{FixtureSet, MatchEvaluator, Standings, TraineeEntry};
use super::fitness::FitnessKey;
use super::hall_of_fame::{HallOfFame, RankedGenome};
use super::history::{EpisodeStats, Outcome, TrainingHistoryEntry};
use super::perturbation::{ActionPerturber, Perturbation};
use super::progress::ProgressCallback;
use crate::config::{AppConfig, TrainingConfig};
use crate::engines::compiler::GenomeCompiler;
use crate::engines::generation::MutationEngine;
use crate::error::{CoachError, Result};
use crate::functions::registry::PrimitiveRegistry;
use crate::genome::TeamGenome;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const BASELINE_ASSESSMENT: &str = "Baseline Assessment (No Mutation)";
const BASELINE_ESTABLISHED: &str = "Baseline Established.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachState {
    Idle,
    Running { episode: usize },
    Finished,
    Aborted,
}

/// What the caller does after reporting an episode
#[derive(Debug, Clone)]
pub enum EpisodeStep {
    /// Play this fixture set next
    Continue(FixtureSet),
    Finished(TrainingReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub finished_at: DateTime<Utc>,
    pub episodes: usize,
    pub improvements: usize,
    pub best_fitness: FitnessKey,
    pub best_genome: TeamGenome,
    pub top: Vec<RankedGenome>,
}

impl TrainingReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// (1+1) hill climber over team genomes.
///
/// Hands out one fixture set per episode and waits for its standings before producing
/// the next. The candidate replaces the best genome only when it scores strictly higher.
pub struct Coach {
    config: TrainingConfig,
    compiler: GenomeCompiler,
    perturber: ActionPerturber,
    mutation_engine: MutationEngine,
    rng: StdRng,
    state: CoachState,
    opponents: Vec<String>,
    matches_per_episode: usize,
    episode_budget: usize,
    best: Option<TeamGenome>,
    best_fitness: Option<FitnessKey>,
    candidate: Option<TeamGenome>,
    mutation_details: String,
    history: Vec<TrainingHistoryEntry>,
    cancelled: Arc<AtomicBool>,
}

impl Coach {
    pub fn new(registry: Arc<PrimitiveRegistry>, config: AppConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.training.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut mutation = config.mutation.clone();
        if mutation.seed.is_none() {
            mutation.seed = config.training.seed.map(|seed| seed.wrapping_add(1));
        }

        Ok(Self {
            compiler: GenomeCompiler::new(Arc::clone(&registry), config.rink.clone()),
            perturber: ActionPerturber::new(Arc::clone(&registry), &config.training),
            mutation_engine: MutationEngine::new(registry, mutation)?,
            rng,
            state: CoachState::Idle,
            opponents: Vec::new(),
            matches_per_episode: config.training.matches_per_episode,
            episode_budget: config.training.episode_budget,
            best: None,
            best_fitness: None,
            candidate: None,
            mutation_details: String::new(),
            history: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
            config: config.training,
        })
    }

    /// Start a session from `seed` and return the fixture set for episode 1
    pub fn initialize(
        &mut self,
        seed: &TeamGenome,
        opponents: Vec<String>,
        matches_per_episode: usize,
        episode_budget: usize,
    ) -> Result<FixtureSet> {
        if matches_per_episode == 0 || episode_budget == 0 {
            return Err(CoachError::Configuration(
                "Matches per episode and episode budget must be at least 1".to_string(),
            ));
        }
        if let CoachState::Running { episode } = self.state {
            log::warn!("Discarding session in progress at episode {}", episode);
        }

        log::info!(
            "Training '{}' against {} opponents for {} episodes",
            seed.display_name(),
            opponents.len(),
            episode_budget
        );

        self.best = Some(seed.clone());
        self.candidate = Some(seed.clone());
        self.best_fitness = None;
        self.opponents = opponents;
        self.matches_per_episode = matches_per_episode;
        self.episode_budget = episode_budget;
        self.mutation_details = BASELINE_ASSESSMENT.to_string();
        self.history.clear();
        self.cancelled.store(false, Ordering::SeqCst);
        self.state = CoachState::Running { episode: 1 };

        self.fixture_set(1)
    }

    /// Record the standings of the episode in flight and move on
    pub fn on_fixture_set_complete(&mut self, standings: &Standings) -> Result<EpisodeStep> {
        let CoachState::Running { episode } = self.state else {
            return Err(CoachError::InvalidState(format!(
                "Standings reported while {:?}",
                self.state
            )));
        };

        let Some(standing) = standings.get(&self.config.candidate_id) else {
            log::error!(
                "Candidate '{}' missing from standings of episode {}",
                self.config.candidate_id,
                episode
            );
            self.state = CoachState::Aborted;
            return Err(CoachError::MissingFitnessSubject {
                candidate_id: self.config.candidate_id.clone(),
                episode,
            });
        };

        let stats = EpisodeStats::from(standing);
        let fitness = stats.fitness();
        log::info!("Episode {} report: {}", episode, fitness);

        let outcome = match self.best_fitness {
            _ if episode == 1 => {
                self.mutation_details = BASELINE_ESTABLISHED.to_string();
                Outcome::Baseline
            }
            Some(best) if fitness > best => Outcome::Improved,
            _ => Outcome::Rejected,
        };

        let candidate = self.candidate_genome()?.clone();
        match outcome {
            Outcome::Baseline => self.best_fitness = Some(fitness),
            Outcome::Improved => {
                log::info!("Episode {} improved on the best genome", episode);
                self.best_fitness = Some(fitness);
                self.best = Some(candidate.clone());
            }
            Outcome::Rejected => log::debug!("Episode {} rejected", episode),
        }

        self.history.push(TrainingHistoryEntry {
            episode,
            description: self.mutation_details.clone(),
            outcome,
            stats,
            genome: candidate,
        });

        if episode >= self.episode_budget {
            self.state = CoachState::Finished;
            log::info!("Training complete after {} episodes", episode);
            return Ok(EpisodeStep::Finished(self.report()?));
        }

        if self.cancelled.load(Ordering::SeqCst) {
            self.state = CoachState::Aborted;
            log::warn!("Training cancelled before episode {}", episode + 1);
            return Err(CoachError::Cancelled { episode: episode + 1 });
        }

        if let Err(e) = self.prepare_next_candidate(outcome == Outcome::Improved) {
            self.state = CoachState::Aborted;
            return Err(e);
        }

        self.state = CoachState::Running { episode: episode + 1 };
        Ok(EpisodeStep::Continue(self.fixture_set(episode + 1)?))
    }

    /// Drive a whole session against `evaluator`, checking for cancellation before
    /// every episode
    pub fn run<E, C>(
        &mut self,
        seed: &TeamGenome,
        opponents: Vec<String>,
        evaluator: &mut E,
        callback: &mut C,
    ) -> Result<TrainingReport>
    where
        E: MatchEvaluator,
        C: ProgressCallback,
    {
        let mut fixtures = self.initialize(
            seed,
            opponents,
            self.config.matches_per_episode,
            self.config.episode_budget,
        )?;

        loop {
            if self.cancelled.load(Ordering::SeqCst) {
                self.state = CoachState::Aborted;
                return Err(CoachError::Cancelled { episode: fixtures.episode });
            }

            callback.on_episode_start(fixtures.episode, self.episode_budget);
            let standings = match evaluator.run_fixture_set(&fixtures) {
                Ok(standings) => standings,
                Err(e) => {
                    self.state = CoachState::Aborted;
                    return Err(CoachError::Evaluator(format!("{:#}", e)));
                }
            };

            let step = self.on_fixture_set_complete(&standings)?;
            if let (Some(entry), Some(best)) = (self.history.last(), self.best_fitness) {
                callback.on_episode_complete(entry, best);
            }

            match step {
                EpisodeStep::Continue(next) => fixtures = next,
                EpisodeStep::Finished(report) => return Ok(report),
            }
        }
    }

    /// Ask the session to stop before its next episode
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Shared flag for cancelling from another thread
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn state(&self) -> CoachState {
        self.state
    }

    pub fn history(&self) -> &[TrainingHistoryEntry] {
        &self.history
    }

    pub fn best_genome(&self) -> Option<&TeamGenome> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<FitnessKey> {
        self.best_fitness
    }

    pub fn current_candidate(&self) -> Option<&TeamGenome> {
        self.candidate.as_ref()
    }

    pub fn export_best_genome(&self) -> Result<String> {
        self.best_or_err()?.to_json_pretty()
    }

    pub fn export_history(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }

    /// Best `k` distinct candidates evaluated so far
    pub fn export_top_k(&self, k: usize) -> Vec<RankedGenome> {
        HallOfFame::from_history(k, &self.history).get_all().to_vec()
    }

    /// `<name>_V<episode>_BEST.json`
    pub fn best_genome_file_name(&self) -> String {
        format!("{}_V{}_BEST.json", self.file_stem(), self.history.len())
    }

    /// `<name>_FULL_HISTORY_LOG.json`
    pub fn history_file_name(&self) -> String {
        format!("{}_FULL_HISTORY_LOG.json", self.file_stem())
    }

    /// Write the best genome and the history into `dir`
    pub fn save_exports<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let best_path = dir.join(self.best_genome_file_name());
        fs::write(&best_path, self.export_best_genome()?)?;
        let history_path = dir.join(self.history_file_name());
        fs::write(&history_path, self.export_history()?)?;

        log::info!("Saved {} and {}", best_path.display(), history_path.display());
        Ok((best_path, history_path))
    }

    fn file_stem(&self) -> String {
        let name = self.best.as_ref().and_then(|g| g.name.as_deref()).unwrap_or("Team");
        name.split_whitespace().collect::<Vec<_>>().join("_")
    }

    fn best_or_err(&self) -> Result<&TeamGenome> {
        self.best
            .as_ref()
            .ok_or_else(|| CoachError::InvalidState("No training session has been started".to_string()))
    }

    fn candidate_genome(&self) -> Result<&TeamGenome> {
        self.candidate
            .as_ref()
            .ok_or_else(|| CoachError::InvalidState("No candidate in flight".to_string()))
    }

    fn fixture_set(&self, episode: usize) -> Result<FixtureSet> {
        let candidate = self.candidate_genome()?;
        Ok(FixtureSet {
            episode,
            candidate_id: self.config.candidate_id.clone(),
            opponents: self.opponents.clone(),
            matches_per_opponent: self.matches_per_episode,
            trainee: TraineeEntry {
                name: format!("{} (V{})", candidate.display_name(), episode),
                code: candidate.display_code().to_string(),
                colors: candidate.display_colors(),
                team: Arc::new(self.compiler.compile(candidate)),
            },
        })
    }

    fn prepare_next_candidate(&mut self, last_was_improvement: bool) -> Result<()> {
        let best = self.best_or_err()?.clone();
        let status = if last_was_improvement { "KEEPING." } else { "REVERTING." };

        let structural_first = self.rng.gen_bool(self.config.structural_mutation_rate);
        let perturbation = if structural_first {
            match self.structural_mutation(&best) {
                Some(p) => Some(p),
                None => self.perturber.perturb(&best, &mut self.rng),
            }
        } else {
            match self.perturber.perturb(&best, &mut self.rng) {
                Some(p) => Some(p),
                None => self.structural_mutation(&best),
            }
        };

        let Some(Perturbation { genome, description }) = perturbation else {
            log::error!("No mutable node found in '{}'", best.display_name());
            return Err(CoachError::NoEligibleMutationTarget {
                attempts: self.perturber.max_attempts(),
            });
        };

        self.mutation_details = format!("{} {}", status, description);
        log::debug!("Next candidate: {}", self.mutation_details);
        self.candidate = Some(genome);
        Ok(())
    }

    fn structural_mutation(&mut self, best: &TeamGenome) -> Option<Perturbation> {
        for _ in 0..self.perturber.max_attempts() {
            let result = self.mutation_engine.mutate(best);
            if result.applied {
                return Some(Perturbation {
                    genome: result.genome,
                    description: format!("Restructuring {}", result.description),
                });
            }
        }
        None
    }

    fn report(&self) -> Result<TrainingReport> {
        let best_fitness = self
            .best_fitness
            .ok_or_else(|| CoachError::InvalidState("No episode has been scored".to_string()))?;
        Ok(TrainingReport {
            finished_at: Utc::now(),
            episodes: self.history.len(),
            improvements: self
                .history
                .iter()
                .filter(|e| e.outcome == Outcome::Improved)
                .count(),
            best_fitness,
            best_genome: self.best_or_err()?.clone(),
            top: self.export_top_k(self.config.top_k),
        })
    }
}
