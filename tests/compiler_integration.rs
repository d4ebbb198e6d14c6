use rinkcoach::config::RinkConfig;
use rinkcoach::engines::runtime::AgentState;
use rinkcoach::{ActionCommand, ActionKind, CompileDiagnostic, GenomeCompiler, PrimitiveRegistry, Role, TeamGenome};
use serde_json::json;
use std::sync::Arc;

fn compiler() -> GenomeCompiler {
    GenomeCompiler::new(Arc::new(PrimitiveRegistry::new()), RinkConfig::default())
}

fn sample_team() -> TeamGenome {
    TeamGenome::from_json(include_str!("data/sample_team.json")).unwrap()
}

fn agent(value: serde_json::Value) -> AgentState {
    serde_json::from_value(value).unwrap()
}

fn carrying_centre(x: f64) -> AgentState {
    agent(json!({
        "id": 1, "team": 0, "role": "c", "x": x, "y": 320.0, "possession_time": 30,
        "puck": { "x": x, "y": 320.0, "owner": 1 },
        "teammates": [
            { "id": 2, "x": 700.0, "y": 250.0, "lane_open": true },
            { "id": 4, "x": 200.0, "y": 300.0, "lane_open": true }
        ],
        "opponents": [{ "id": 11, "x": 800.0, "y": 320.0 }],
        "forward_lane_clear": true
    }))
}

#[test]
fn test_sample_team_compiles_cleanly() {
    let team = compiler().compile(&sample_team());
    assert!(team.diagnostics().is_empty(), "{:?}", team.diagnostics());
    assert_eq!(team.roles().collect::<Vec<_>>(), Role::ALL.to_vec());
}

#[test]
fn test_centre_drives_then_shoots() {
    let team = compiler().compile(&sample_team());

    assert_eq!(team.think(&carrying_centre(500.0)), ActionCommand::move_to(950.0, 320.0));

    let close = team.think(&carrying_centre(850.0));
    assert_eq!(close.action, ActionKind::Shoot);
    assert_eq!((close.tx, close.ty), (950.0, 320.0));
}

#[test]
fn test_defenders_react_to_possession() {
    let team = compiler().compile(&sample_team());

    let pressured = agent(json!({
        "id": 4, "team": 0, "role": "ld", "x": 200.0, "y": 300.0,
        "puck": { "x": 300.0, "y": 320.0, "owner": 11 },
        "opponents": [{ "id": 11, "x": 300.0, "y": 320.0 }]
    }));
    assert_eq!(team.think(&pressured), ActionCommand::move_to(175.0, 320.0));

    let quiet = agent(json!({
        "id": 4, "team": 0, "role": "ld", "x": 200.0, "y": 300.0,
        "puck": { "x": 600.0, "y": 320.0 }
    }));
    assert_eq!(team.think(&quiet), ActionCommand::move_to(170.0, 320.0));

    // Team 1 defends the right-hand net
    let right_side = agent(json!({
        "id": 15, "team": 1, "role": "rd", "x": 850.0, "y": 400.0,
        "puck": { "x": 800.0, "y": 320.0 }
    }));
    assert_eq!(team.think(&right_side), ActionCommand::move_to(950.0, 320.0));
}

#[test]
fn test_compilation_is_deterministic() {
    let genome = sample_team();
    let first = compiler().compile(&genome);
    let second = compiler().compile(&genome);

    let states = [
        carrying_centre(500.0),
        carrying_centre(850.0),
        agent(json!({
            "id": 2, "team": 0, "role": "lw", "x": 400.0, "y": 200.0,
            "puck": { "x": 500.0, "y": 320.0, "owner": 1 },
            "teammates": [{ "id": 1, "x": 500.0, "y": 320.0 }]
        })),
        agent(json!({
            "id": 3, "team": 1, "role": "rw", "x": 450.0, "y": 500.0,
            "puck": { "x": 480.0, "y": 400.0, "vx": -3.0, "vy": 1.5 }
        })),
    ];
    for state in &states {
        assert_eq!(first.think(state), second.think(state));
        assert_eq!(first.think(state), first.think(state));
    }
}

#[test]
fn test_corrupt_genome_fails_closed() {
    let genome = TeamGenome::from_json(
        &json!({
            "name": "Broken",
            "c": {
                "cat": "struct", "type": "Selector",
                "children": [
                    { "cat": "cond", "type": "condMindReading" },
                    { "cat": "act", "type": "actSafetyPosition", "depth": "abc" }
                ]
            },
            "lw": [{ "cat": "act", "type": "actMoonwalk" }]
        })
        .to_string(),
    )
    .unwrap();

    let team = compiler().compile(&genome);
    assert_eq!(
        team.diagnostics(),
        &[
            CompileDiagnostic::UnresolvedCondition { role: Role::C, kind: "condMindReading".into() },
            CompileDiagnostic::UnresolvedAction { role: Role::Lw, kind: "actMoonwalk".into() },
        ]
    );

    // Corrupt depth falls back to the declared default of 120
    assert_eq!(team.think(&carrying_centre(500.0)), ActionCommand::move_to(170.0, 320.0));

    let mut winger = carrying_centre(500.0);
    winger.role = Role::Lw;
    assert_eq!(team.think(&winger), ActionCommand::move_to(0.0, 0.0));

    let mut defender = carrying_centre(420.0);
    defender.role = Role::Rd;
    assert_eq!(team.think(&defender), ActionCommand::move_to(420.0, 320.0));
}

#[test]
fn test_zero_depth_compiles_to_default() {
    let genome = TeamGenome::from_json(
        &json!({ "ld": [{ "cat": "act", "type": "actSafetyPosition", "depth": 0 }] }).to_string(),
    )
    .unwrap();
    let team = compiler().compile(&genome);
    assert!(team.diagnostics().is_empty());

    let quiet = agent(json!({
        "id": 4, "team": 0, "role": "ld", "x": 200.0, "y": 300.0,
        "puck": { "x": 600.0, "y": 320.0 }
    }));
    assert_eq!(team.think(&quiet), ActionCommand::move_to(170.0, 320.0));
}
