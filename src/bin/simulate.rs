use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase_sim::board::{BoardError, SpriteMap, TileGraph};
use maze_chase_sim::constants::FRAME_MS;
use maze_chase_sim::engine::{Simulation, SimulationOptions};
use maze_chase_sim::high_score_store::HighScoreStore;
use maze_chase_sim::stats::KILL_SCREEN_LEVEL;
use maze_chase_sim::types::{
    AppState, Direction, GameEvent, InputSnapshot, Snapshot, SoundCue,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value = "assets/board.txt")]
    board: PathBuf,
    #[arg(long, default_value = "assets/sprites.txt")]
    sprites: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long)]
    frame_ms: Option<u32>,
    #[arg(long)]
    single: bool,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seed: u32,
    frames: u64,
    #[serde(rename = "frameMs")]
    frame_ms: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    frames: u64,
    #[serde(rename = "gamesStarted")]
    games_started: u32,
    #[serde(rename = "gamesOver")]
    games_over: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    #[serde(rename = "maxLevel")]
    max_level: u32,
    deaths: u32,
    pellets: u32,
    #[serde(rename = "powerPellets")]
    power_pellets: u32,
    eliminations: u32,
    #[serde(rename = "bonusItems")]
    bonus_items: u32,
    #[serde(rename = "extraLives")]
    extra_lives: u32,
    #[serde(rename = "finalScore")]
    final_score: i32,
    #[serde(rename = "highScore")]
    high_score: i32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    frame: u64,
    message: String,
}

struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "totalFrames")]
    total_frames: u64,
    #[serde(rename = "averageScore")]
    average_score: i32,
    #[serde(rename = "highScore")]
    high_score: i32,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<u64>,
    details: Value,
}

/// Scripted input: confirms in the menu, then wanders toward adjacent pellets.
struct Autopilot {
    rng: StdRng,
    heading: Direction,
}

impl Autopilot {
    fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed as u64),
            heading: Direction::Left,
        }
    }

    fn input(&mut self, sim: &Simulation) -> InputSnapshot {
        if sim.app_state() == AppState::InMenu {
            return InputSnapshot::confirm();
        }

        let graph = sim.graph();
        let tile = sim.roster().seeker.current_tile();
        let open: Vec<Direction> = Direction::PRIORITY
            .into_iter()
            .filter(|dir| {
                graph
                    .neighbor(tile, *dir)
                    .is_some_and(|next| graph.tile(next).is_traversable())
            })
            .collect();
        let baited: Vec<Direction> = open
            .iter()
            .copied()
            .filter(|dir| {
                graph
                    .neighbor(tile, *dir)
                    .is_some_and(|next| graph.has_pellet(next))
            })
            .collect();

        if !baited.is_empty() {
            if !baited.contains(&self.heading) {
                self.heading = baited[self.rng.random_range(0..baited.len())];
            }
        } else if !open.is_empty()
            && (!open.contains(&self.heading) || self.rng.random_range(0..16) == 0)
        {
            self.heading = open[self.rng.random_range(0..open.len())];
        }
        InputSnapshot::holding(self.heading)
    }
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let started_at = now_rfc3339();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, now_ms()));

    let graph = match load_board(&cli.board, &cli.sprites) {
        Ok(graph) => graph,
        Err(error) => {
            emit_log(
                "error",
                "board_load_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "board": cli.board.to_string_lossy(),
                    "sprites": cli.sprites.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let mut store = cli.high_score_file.clone().map(HighScoreStore::open);
    let mut high_score = store.as_ref().map(HighScoreStore::value).unwrap_or(0);
    let mut has_anomaly = false;
    let mut total_anomalies = 0usize;
    let mut scenario_results = Vec::new();

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "frames": scenario.frames,
                "frameMs": scenario.frame_ms,
                "highScore": high_score,
            }),
        );

        let scenario_run = match run_scenario(&scenario, &graph, high_score, &run_id) {
            Ok(run) => run,
            Err(error) => {
                emit_log(
                    "error",
                    "scenario_setup_failed",
                    &run_id,
                    Some(&scenario.name),
                    Some(scenario.seed),
                    None,
                    json!({ "error": error.to_string() }),
                );
                std::process::exit(2);
            }
        };

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.frame),
                json!({ "message": anomaly.message }),
            );
        }
        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        high_score = high_score.max(scenario_run.result.high_score);

        emit_log(
            "info",
            "scenario_finished",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario.frames),
            json!({
                "finalScore": scenario_run.result.final_score,
                "maxLevel": scenario_run.result.max_level,
                "gamesOver": scenario_run.result.games_over,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => eprintln!("[simulate] failed to serialize scenario result: {error}"),
        }
        scenario_results.push(scenario_run.result);
    }

    if let Some(store) = store.as_mut() {
        store.save(high_score);
    }

    let summary = build_run_summary(
        run_id.clone(),
        started_at,
        now_rfc3339(),
        scenario_results,
        total_anomalies,
        high_score,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "highScore": summary.high_score,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_board(board: &Path, sprites: &Path) -> Result<TileGraph, BoardError> {
    let graph = TileGraph::load(board)?;
    SpriteMap::load(sprites)?.validate_covers(&graph)?;
    Ok(graph)
}

fn run_scenario(
    scenario: &Scenario,
    graph: &TileGraph,
    high_score: i32,
    run_id: &str,
) -> Result<ScenarioRunResult, BoardError> {
    let mut sim = Simulation::new(
        graph.clone(),
        SimulationOptions {
            seed: scenario.seed,
            high_score,
        },
    )?;
    let mut autopilot = Autopilot::new(scenario.seed);
    let mut result = ScenarioResultLine {
        scenario: scenario.name.clone(),
        seed: scenario.seed,
        frames: scenario.frames,
        max_level: 1,
        ..ScenarioResultLine::default()
    };
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut last_score = 0;

    for _ in 0..scenario.frames {
        let input = autopilot.input(&sim);
        let report = sim.tick(scenario.frame_ms, &input);

        for event in &report.handled {
            tally_event(&mut result, *event);
            if !matches!(event, GameEvent::PointsPellet) {
                emit_log(
                    "debug",
                    "game_event",
                    run_id,
                    Some(&scenario.name),
                    Some(scenario.seed),
                    Some(sim.frame()),
                    json!({
                        "event": event,
                        "level": sim.stats().level(),
                        "lives": sim.stats().lives(),
                        "score": sim.stats().score(),
                    }),
                );
            }
        }
        result.extra_lives += report
            .sounds
            .iter()
            .filter(|sound| **sound == SoundCue::ExtraLife)
            .count() as u32;

        let snapshot = sim.snapshot();
        let new_game = report.handled.contains(&GameEvent::StartFromMenu);
        for message in collect_snapshot_anomalies(&snapshot, last_score, new_game) {
            push_anomaly(
                &mut result.anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.frame,
                message,
            );
        }
        last_score = snapshot.score;
        result.max_level = result.max_level.max(snapshot.level);
    }

    result.final_score = sim.stats().score();
    result.high_score = sim.stats().high_score();
    Ok(ScenarioRunResult {
        result,
        anomaly_records,
    })
}

fn tally_event(result: &mut ScenarioResultLine, event: GameEvent) {
    match event {
        GameEvent::StartFromMenu => result.games_started += 1,
        GameEvent::GameOver if result.games_started > 0 => result.games_over += 1,
        GameEvent::LevelWin => result.levels_cleared += 1,
        GameEvent::PlaySeekerDeath => result.deaths += 1,
        GameEvent::PointsPellet => result.pellets += 1,
        GameEvent::PointsPowerPellet => result.power_pellets += 1,
        GameEvent::HunterEliminated => result.eliminations += 1,
        GameEvent::PointsBonusItem => result.bonus_items += 1,
        _ => {}
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot, last_score: i32, new_game: bool) -> Vec<String> {
    let mut anomalies = Vec::new();
    if snapshot.remaining_pellets > snapshot.total_pellets {
        anomalies.push(format!(
            "remaining pellets exceed total: {}/{}",
            snapshot.remaining_pellets, snapshot.total_pellets
        ));
    }
    if snapshot.level == 0 || snapshot.level >= KILL_SCREEN_LEVEL {
        anomalies.push(format!("level out of range: {}", snapshot.level));
    }
    if snapshot.score < 0 {
        anomalies.push(format!("negative score: {}", snapshot.score));
    }
    if !new_game && snapshot.score < last_score {
        anomalies.push(format!(
            "score went backwards: {last_score} -> {}",
            snapshot.score
        ));
    }
    if snapshot.high_score < snapshot.score {
        anomalies.push(format!(
            "high score below score: {} < {}",
            snapshot.high_score, snapshot.score
        ));
    }
    if !snapshot.seeker.x.is_finite() || !snapshot.seeker.y.is_finite() {
        anomalies.push("seeker position is not finite".to_string());
    }
    if snapshot.hunters.len() != 4 {
        anomalies.push(format!("unexpected hunter count: {}", snapshot.hunters.len()));
    }
    for hunter in &snapshot.hunters {
        if !hunter.agent.x.is_finite() || !hunter.agent.y.is_finite() {
            anomalies.push(format!("hunter position is not finite: {:?}", hunter.kind));
        }
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| rand::random::<u32>() as u64));
    let frame_ms = cli.frame_ms.unwrap_or(FRAME_MS).clamp(1, 100);

    if cli.single || cli.frames.is_some() {
        return vec![Scenario {
            name: "custom".to_string(),
            seed,
            frames: cli.frames.unwrap_or(60 * 60 * 3).max(1),
            frame_ms,
        }];
    }

    vec![
        Scenario {
            name: "quick-check".to_string(),
            seed,
            frames: 60 * 60,
            frame_ms,
        },
        Scenario {
            name: "endurance".to_string(),
            seed: normalize_seed(seed as u64 + 1),
            frames: 60 * 60 * 10,
            frame_ms,
        },
    ]
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    frame: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        frame,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at: String,
    finished_at: String,
    scenarios: Vec<ScenarioResultLine>,
    anomaly_count: usize,
    high_score: i32,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let total_frames = scenarios.iter().map(|scenario| scenario.frames).sum();
    let average_score = if scenario_count == 0 {
        0
    } else {
        scenarios.iter().map(|scenario| scenario.final_score).sum::<i32>() / scenario_count as i32
    };
    RunSummary {
        run_id,
        started_at,
        finished_at,
        scenario_count,
        anomaly_count,
        total_frames,
        average_score,
        high_score,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    frame: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        frame,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(line) => eprintln!("{line}"),
        Err(error) => eprintln!("[simulate] failed to serialize log line: {error}"),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
