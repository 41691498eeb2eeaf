//! End-to-end tests for running sessions.
//!
//! Projects are built in memory (or parsed from JSON) and driven through
//! the public API: `session::start`, `Session::step`, and the async
//! `run_session` loop with a collecting presenter.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pixelscript_core::config::{SimulationBoundsConfig, SimulationConfig, WaitPolicy};
use pixelscript_core::control::SessionEndReason;
use pixelscript_core::runner::{CollectingPresenter, NoOpPresenter, run_session};
use pixelscript_core::session;
use pixelscript_types::{
    ColorToken, Command, Direction, PlacedTemplate, Position, Project, ScriptSet, Shape, Template,
    TemplateId, TurnMode,
};

fn fast_config() -> SimulationConfig {
    SimulationConfig {
        simulation: SimulationBoundsConfig {
            stop_poll_ms: 0,
            ..SimulationBoundsConfig::default()
        },
        ..SimulationConfig::default()
    }
}

fn with_wait_policy(policy: WaitPolicy) -> SimulationConfig {
    let mut config = fast_config();
    config.scripting.wait_policy = policy;
    config
}

fn single_cell(token: ColorToken) -> Shape {
    let mut shape = Shape::blank();
    shape.set_cell(0, 0, token);
    shape
}

fn project_of(placements: Vec<PlacedTemplate>) -> Project {
    let mut project = Project::new("integration", ColorToken::Black);
    for placement in placements {
        project.place(placement);
    }
    project
}

fn placed(id: u64, shape: Shape, anchor: Position, scripts: ScriptSet) -> PlacedTemplate {
    PlacedTemplate::new(
        TemplateId(id),
        Template {
            name: format!("sprite-{id}"),
            shape,
        },
        anchor,
        scripts,
    )
}

#[tokio::test]
async fn uncancelled_session_yields_exactly_one_hundred_frames() {
    let project = project_of(vec![placed(
        1,
        single_cell(ColorToken::Red),
        Position::new(0, 0),
        ScriptSet::default(),
    )]);
    let mut session = session::start(project, &fast_config());
    let mut presenter = CollectingPresenter::new();

    let result = run_session(&mut session, &mut presenter).await.unwrap();

    assert_eq!(result.end_reason, SessionEndReason::TickBudgetExhausted);
    assert_eq!(result.frames_emitted, 100);
    assert_eq!(result.final_tick, 100);
    assert_eq!(presenter.frames.len(), 100);
    assert_eq!(presenter.frames.first().unwrap().tick, 1);
    assert_eq!(presenter.frames.last().unwrap().tick, 100);
}

#[tokio::test]
async fn empty_project_yields_background_only_frames() {
    let mut session = session::start(Project::new("empty", ColorToken::Green), &fast_config());
    let mut presenter = CollectingPresenter::new();

    let _ = run_session(&mut session, &mut presenter).await.unwrap();

    // Fixed background is black regardless of the project's color.
    assert!(presenter.frames.iter().all(|f| f.scene.count(ColorToken::Black) == 378));
}

#[test]
fn red_cell_moves_from_anchor() {
    let project = project_of(vec![placed(
        1,
        single_cell(ColorToken::Red),
        Position::new(2, 3),
        ScriptSet {
            on_start: vec![Command::Wait { ticks: 1 }, Command::move_by(Direction::Right, 3)],
            ..ScriptSet::default()
        },
    )]);
    let mut session = session::start(project, &fast_config());

    let tick0 = session.current_scene();
    assert_eq!(tick0.get(Position::new(2, 3)), Some(ColorToken::Red));

    let summary = session.step().unwrap().unwrap();
    assert_eq!(summary.frame.scene.get(Position::new(2, 6)), Some(ColorToken::Red));
    assert_eq!(summary.frame.scene.get(Position::new(2, 3)), Some(ColorToken::Black));
    assert_eq!(summary.frame.scene.count(ColorToken::Red), 1);
}

fn wait_then_move() -> Project {
    project_of(vec![placed(
        1,
        single_cell(ColorToken::Orange),
        Position::new(0, 0),
        ScriptSet {
            on_start: vec![Command::Wait { ticks: 5 }, Command::move_by(Direction::Right, 1)],
            ..ScriptSet::default()
        },
    )])
}

fn orange_columns(config: &SimulationConfig, ticks: usize) -> Vec<i32> {
    let mut session = session::start(wait_then_move(), config);
    let mut cols = vec![session.state().entities.first().unwrap().position().col];
    for _ in 0..ticks {
        session.step().unwrap();
        cols.push(session.state().entities.first().unwrap().position().col);
    }
    cols
}

#[test]
fn wait_then_move_under_resume_moves_at_tick_five() {
    let cols = orange_columns(&with_wait_policy(WaitPolicy::Resume), 8);
    assert_eq!(cols, vec![0, 0, 0, 0, 0, 1, 1, 1, 1]);
}

#[test]
fn wait_then_move_under_truncate_never_moves() {
    let cols = orange_columns(&with_wait_policy(WaitPolicy::Truncate), 8);
    assert!(cols.iter().all(|&c| c == 0));
}

#[test]
fn duplicate_inside_on_duplicate_never_spawns() {
    let project = project_of(vec![placed(
        1,
        single_cell(ColorToken::Yellow),
        Position::new(0, 0),
        ScriptSet {
            on_start: vec![Command::Duplicate { row: 1, col: 1 }],
            on_tick: Vec::new(),
            on_duplicate: vec![
                Command::Duplicate { row: 5, col: 5 },
                Command::Wait { ticks: 2 },
                Command::Duplicate { row: 6, col: 6 },
            ],
        },
    )]);
    let mut session = session::start(project, &fast_config());
    for _ in 0..10 {
        session.step().unwrap();
    }
    assert_eq!(session.state().entities.len(), 2);
    assert!(session.state().pending_spawns.is_empty());
}

#[test]
fn later_placement_wins_and_hidden_contributes_nothing() {
    let project = project_of(vec![
        placed(1, single_cell(ColorToken::Red), Position::new(4, 4), ScriptSet::default()),
        placed(2, single_cell(ColorToken::Blue), Position::new(4, 4), ScriptSet::default()),
        placed(
            3,
            single_cell(ColorToken::White),
            Position::new(4, 4),
            ScriptSet {
                on_start: vec![Command::SetHidden { flag: true }],
                ..ScriptSet::default()
            },
        ),
    ]);
    let mut session = session::start(project, &fast_config());
    let frame = session.step().unwrap().unwrap().frame;
    assert_eq!(frame.scene.get(Position::new(4, 4)), Some(ColorToken::Blue));
    assert_eq!(frame.scene.count(ColorToken::White), 0);
}

#[test]
fn turns_keep_the_shape_five_by_five() {
    let mut shape = Shape::blank();
    shape.set_cell(0, 4, ColorToken::Purple);
    let project = project_of(vec![placed(
        1,
        shape,
        Position::new(0, 0),
        ScriptSet {
            on_tick: vec![
                Command::turn(TurnMode::Transpose),
                Command::turn(TurnMode::MirrorHorizontal),
                Command::turn(TurnMode::AntiTranspose),
            ],
            ..ScriptSet::default()
        },
    )]);
    let mut session = session::start(project, &fast_config());
    for _ in 0..7 {
        let frame = session.step().unwrap().unwrap().frame;
        assert_eq!(frame.scene.count(ColorToken::Purple), 1);
    }
    let entity = session.state().entities.first().unwrap();
    assert_eq!(entity.shape().rows().len(), 5);
    assert!(entity.shape().rows().iter().all(|r| r.len() == 5));
}

#[test]
fn project_json_runs_end_to_end() {
    let json = r#"{
        "name": "json-demo",
        "background": "white",
        "placements": [
            {
                "id": 7,
                "template": {
                    "name": "dot",
                    "shape": [
                        ["green", "blank", "blank", "blank", "blank"],
                        ["blank", "blank", "blank", "blank", "blank"],
                        ["blank", "blank", "blank", "blank", "blank"],
                        ["blank", "blank", "blank", "blank", "blank"],
                        ["blank", "blank", "blank", "blank", "blank"]
                    ]
                },
                "anchor": { "row": 1, "col": 1 },
                "scripts": {
                    "on_tick": [
                        { "op": "move", "direction": 1, "distance": 1 },
                        { "op": "teleport" }
                    ]
                }
            }
        ]
    }"#;
    let project = Project::from_json(json).unwrap();
    let mut session = session::start(Arc::new(project), &fast_config());
    let frame = session.step().unwrap().unwrap().frame;
    assert_eq!(frame.scene.get(Position::new(2, 1)), Some(ColorToken::Green));
}

#[tokio::test]
async fn stop_handle_ends_a_running_session() {
    let project = project_of(Vec::new());
    let mut config = fast_config();
    config.simulation.max_ticks = 0;
    config.simulation.stop_poll_ms = 10;
    let mut session = session::start(project, &config);
    let handle = session.stop_handle();

    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(35)).await;
        handle.stop();
    });

    let result = run_session(&mut session, &mut NoOpPresenter).await.unwrap();
    assert_eq!(result.end_reason, SessionEndReason::Stopped);
    assert!(result.frames_emitted >= 1);
}

#[test]
fn bundled_demo_project_runs() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
        .join("project.json");
    if !path.exists() {
        return;
    }
    let project = Project::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let mut session = session::start(project, &fast_config());
    let mut frames = 0_u32;
    while session.step().unwrap().is_some() {
        frames = frames.saturating_add(1);
    }
    assert_eq!(frames, 100);
    assert_eq!(session.end_reason(), Some(SessionEndReason::TickBudgetExhausted));
}

#[test]
fn every_placement_becomes_an_entity_past_the_spawn_cap() {
    let placements = (0..300_u64)
        .map(|id| {
            placed(
                id,
                single_cell(ColorToken::Brown),
                Position::new(0, 0),
                ScriptSet::default(),
            )
        })
        .collect();
    let project = project_of(placements);
    let config = fast_config();
    assert_eq!(config.simulation.max_entities, 256);

    let session = session::start(project, &config);
    assert_eq!(session.state().entities.len(), 300);
    assert_eq!(session.project().placements.len(), 300);
}
