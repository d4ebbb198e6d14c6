use rinkcoach::config::AppConfig;
use rinkcoach::engines::training::{
    ChannelProgressCallback, Coach, CoachState, FitnessKey, FixtureSet, LogProgressCallback,
    MatchEvaluator, Outcome, ProgressMessage, Standings, TeamStanding, TrainingHistoryEntry,
};
use rinkcoach::genome::GenomeNode;
use rinkcoach::{CoachError, PrimitiveRegistry, Role, TeamGenome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

/// Replays a fixed list of (points, goals for, goals against) results
struct ScriptedEvaluator {
    script: VecDeque<(i64, i64, i64)>,
    seen: Vec<(usize, String)>,
    report_candidate: bool,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedEvaluator {
    fn new(script: &[(i64, i64, i64)]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            seen: Vec::new(),
            report_candidate: true,
            cancel_after: None,
        }
    }
}

impl MatchEvaluator for ScriptedEvaluator {
    fn run_fixture_set(&mut self, fixtures: &FixtureSet) -> anyhow::Result<Standings> {
        self.seen.push((fixtures.episode, fixtures.trainee.name.clone()));
        if let Some((episode, flag)) = &self.cancel_after {
            if fixtures.episode == *episode {
                flag.store(true, Ordering::SeqCst);
            }
        }

        let (points, goals_for, goals_against) = self
            .script
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted at episode {}", fixtures.episode))?;

        let mut table = Standings::new();
        for opponent in &fixtures.opponents {
            table.insert(opponent.clone(), TeamStanding::default());
        }
        if self.report_candidate {
            table.insert(
                fixtures.candidate_id.clone(),
                TeamStanding {
                    games_played: (fixtures.opponents.len() * fixtures.matches_per_opponent) as u32,
                    wins: (points / 2) as u32,
                    losses: 0,
                    points,
                    goals_for,
                    goals_against,
                },
            );
        }
        Ok(table)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(budget: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.training.seed = Some(2024);
    config.training.episode_budget = budget;
    config.training.matches_per_episode = 2;
    config
}

fn coach(config: AppConfig) -> Coach {
    Coach::new(Arc::new(PrimitiveRegistry::new()), config).unwrap()
}

fn seed_genome() -> TeamGenome {
    TeamGenome::new("Seed", "SED")
        .with_role(
            Role::C,
            GenomeNode::selector(vec![
                GenomeNode::sequence(vec![
                    GenomeNode::condition("condHasPuck"),
                    GenomeNode::action("actShoot"),
                ]),
                GenomeNode::action("actSmartIntercept"),
            ]),
        )
        .with_role(Role::Ld, GenomeNode::action("actDefendHome"))
}

fn sample_team() -> TeamGenome {
    TeamGenome::from_json(include_str!("data/sample_team.json")).unwrap()
}

fn opponents() -> Vec<String> {
    vec!["BOS".to_string(), "MTL".to_string()]
}

#[test]
fn test_four_episode_accept_reject_sequence() {
    init_logging();
    let mut coach = coach(config(4));
    let mut evaluator = ScriptedEvaluator::new(&[(4, 5, 5), (6, 4, 3), (6, 2, 4), (5, 12, 2)]);

    let report = coach
        .run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback)
        .unwrap();

    let outcomes: Vec<Outcome> = coach.history().iter().map(|e| e.outcome).collect();
    assert_eq!(
        outcomes,
        vec![Outcome::Baseline, Outcome::Improved, Outcome::Rejected, Outcome::Rejected]
    );

    // Best is the episode-2 candidate, not the seed nor any later candidate
    let episode_two = &coach.history()[1].genome;
    assert_eq!(coach.best_genome(), Some(episode_two));
    assert_ne!(episode_two, &seed_genome());
    assert_eq!(coach.best_fitness(), Some(FitnessKey::new(6, 1)));

    assert_eq!(report.episodes, 4);
    assert_eq!(report.improvements, 1);
    assert_eq!(report.best_fitness, FitnessKey::new(6, 1));
    assert_eq!(&report.best_genome, episode_two);
    assert_eq!(coach.state(), CoachState::Finished);

    let names: Vec<String> = evaluator.seen.iter().map(|(_, name)| name.clone()).collect();
    assert_eq!(names, vec!["Seed (V1)", "Seed (V2)", "Seed (V3)", "Seed (V4)"]);
}

#[test]
fn test_history_is_complete_and_described() {
    let mut coach = coach(config(4));
    let mut evaluator = ScriptedEvaluator::new(&[(4, 5, 5), (6, 4, 3), (6, 2, 4), (5, 12, 2)]);
    coach
        .run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback)
        .unwrap();

    let history = coach.history();
    let episodes: Vec<usize> = history.iter().map(|e| e.episode).collect();
    assert_eq!(episodes, vec![1, 2, 3, 4]);

    assert_eq!(history[0].description, "Baseline Established.");
    assert_eq!(history[0].genome, seed_genome());
    assert!(history[1].description.starts_with("REVERTING. "));
    assert!(history[2].description.starts_with("KEEPING. "));
    assert!(history[3].description.starts_with("REVERTING. "));
    for entry in &history[1..] {
        assert!(
            entry.description.contains("Tweaking") || entry.description.contains("Swapping"),
            "unexpected description: {}",
            entry.description
        );
    }

    assert_eq!(history[2].stats.points, 6);
    assert_eq!(history[2].stats.goals_against, 4);
    assert_eq!(history[2].stats.games_played, 4);

    let exported: Vec<TrainingHistoryEntry> =
        serde_json::from_str(&coach.export_history().unwrap()).unwrap();
    assert_eq!(exported, history.to_vec());

    let best: TeamGenome = serde_json::from_str(&coach.export_best_genome().unwrap()).unwrap();
    assert_eq!(Some(&best), coach.best_genome());
}

#[test]
fn test_top_k_ranks_candidates() {
    let mut coach = coach(config(4));
    let mut evaluator = ScriptedEvaluator::new(&[(4, 5, 5), (6, 4, 3), (6, 2, 4), (5, 12, 2)]);
    coach
        .run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback)
        .unwrap();

    let top = coach.export_top_k(10);
    assert_eq!(top[0].episode, 2);
    assert_eq!(top[0].fitness, FitnessKey::new(6, 1));
    assert!(top.windows(2).all(|w| w[0].fitness >= w[1].fitness));
    for (i, a) in top.iter().enumerate() {
        for b in &top[i + 1..] {
            assert_ne!(a.genome, b.genome);
        }
    }
    assert_eq!(coach.export_top_k(1).len(), 1);
}

#[test]
fn test_missing_candidate_aborts_run() {
    let mut coach = coach(config(4));
    let mut evaluator = ScriptedEvaluator::new(&[(4, 5, 5)]);
    evaluator.report_candidate = false;

    let result = coach.run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback);
    assert!(matches!(
        result,
        Err(CoachError::MissingFitnessSubject { episode: 1, ref candidate_id }) if candidate_id == "TRAINEE"
    ));
    assert_eq!(coach.state(), CoachState::Aborted);
    assert!(coach.history().is_empty());
}

#[test]
fn test_evaluator_failure_aborts_run() {
    let mut coach = coach(config(4));
    let mut evaluator = ScriptedEvaluator::new(&[(4, 5, 5)]);

    let result = coach.run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback);
    assert!(matches!(result, Err(CoachError::Evaluator(ref msg)) if msg.contains("episode 2")));
    assert_eq!(coach.state(), CoachState::Aborted);
    assert_eq!(coach.history().len(), 1);
}

#[test]
fn test_cancellation_stops_before_next_episode() {
    let mut coach = coach(config(10));
    let mut evaluator = ScriptedEvaluator::new(&[(1, 1, 1); 10]);
    evaluator.cancel_after = Some((2, coach.cancel_handle()));

    let result = coach.run(&seed_genome(), opponents(), &mut evaluator, &mut LogProgressCallback);
    assert!(matches!(result, Err(CoachError::Cancelled { episode: 3 })));
    assert_eq!(coach.history().len(), 2);
    assert_eq!(evaluator.seen.len(), 2);
    assert_eq!(coach.state(), CoachState::Aborted);
}

#[test]
fn test_manual_session_rejects_out_of_turn_reports() {
    let mut coach = coach(config(2));
    let mut table = Standings::new();
    table.insert("TRAINEE".to_string(), TeamStanding { points: 2, ..TeamStanding::default() });

    assert!(matches!(coach.on_fixture_set_complete(&table), Err(CoachError::InvalidState(_))));

    let first = coach.initialize(&seed_genome(), opponents(), 1, 2).unwrap();
    assert_eq!(first.episode, 1);
    assert_eq!(first.matches_per_opponent, 1);
    coach.on_fixture_set_complete(&table).unwrap();
    coach.on_fixture_set_complete(&table).unwrap();
    assert_eq!(coach.state(), CoachState::Finished);

    assert!(matches!(coach.on_fixture_set_complete(&table), Err(CoachError::InvalidState(_))));
    assert_eq!(coach.history().len(), 2);
}

#[test]
fn test_structural_mode_restructures_candidates() {
    let mut config = config(6);
    config.training.structural_mutation_rate = 1.0;
    let mut coach = coach(config);
    let mut evaluator = ScriptedEvaluator::new(&[(3, 2, 2); 6]);

    coach
        .run(&sample_team(), opponents(), &mut evaluator, &mut LogProgressCallback)
        .unwrap();

    for entry in &coach.history()[1..] {
        assert!(entry.description.contains("Restructuring"), "{}", entry.description);
        assert_eq!(entry.outcome, Outcome::Rejected);
    }
    assert_eq!(coach.best_genome(), Some(&sample_team()));
}

#[test]
fn test_channel_progress_reports_each_episode() {
    let (sender, receiver) = mpsc::channel();
    let mut callback = ChannelProgressCallback::new(sender);
    let mut coach = coach(config(3));
    let mut evaluator = ScriptedEvaluator::new(&[(2, 1, 1), (4, 1, 1), (0, 0, 3)]);

    coach.run(&sample_team(), opponents(), &mut evaluator, &mut callback).unwrap();

    let messages: Vec<ProgressMessage> = receiver.try_iter().collect();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[0], ProgressMessage::EpisodeStart { episode: 1, budget: 3 });
    assert_eq!(
        messages[3],
        ProgressMessage::EpisodeComplete {
            episode: 2,
            outcome: Outcome::Improved,
            fitness: FitnessKey::new(4, 0),
            best_fitness: FitnessKey::new(4, 0),
        }
    );
}

#[test]
fn test_save_exports_writes_named_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut coach = coach(config(2));
    let mut evaluator = ScriptedEvaluator::new(&[(2, 1, 1), (4, 1, 1)]);
    coach
        .run(&sample_team(), opponents(), &mut evaluator, &mut LogProgressCallback)
        .unwrap();

    let (best, history) = coach.save_exports(dir.path()).unwrap();
    assert_eq!(best.file_name().unwrap(), "Harbour_Hawks_V2_BEST.json");
    assert_eq!(history.file_name().unwrap(), "Harbour_Hawks_FULL_HISTORY_LOG.json");

    let saved = TeamGenome::from_json(&std::fs::read_to_string(best).unwrap()).unwrap();
    assert_eq!(Some(&saved), coach.best_genome());
}
