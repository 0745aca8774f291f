use crate::config::ScenarioConfig;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use blockmotion_audio::SoundLog;
use blockmotion_physics::{MovableEntity, PlayerBody, TickReport};
use blockmotion_testkit::{
    EventRecord, JsonlSink, KinematicsMetrics, MetricsReportBuilder, MetricsSink,
    TestExecutionMetrics, TestResult,
};
use glam::DVec3;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub scenario: ScenarioConfig,
    pub scripted_input: Option<PathBuf>,
    /// Overrides `scenario.run.ticks`.
    pub max_ticks: Option<u64>,
    pub trace: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
}

/// One line of the JSONL trace.
#[derive(Debug, Serialize)]
struct TickTrace<'a> {
    report: &'a TickReport,
    position: [f64; 3],
    velocity: [f64; 3],
    gravity: f64,
    yaw: f64,
    pitch: f64,
    touching_ground: bool,
    swimming: bool,
    head_under_water: bool,
}

#[derive(Debug, Serialize)]
struct AbortedTick {
    error: String,
}

pub fn run(cfg: HeadlessConfig) -> Result<KinematicsMetrics> {
    let started = Instant::now();
    let scenario = &cfg.scenario;
    let ticks = cfg.max_ticks.unwrap_or(scenario.run.ticks);

    let grid = scenario.world.build().context("failed to build world")?;
    let mut player = MovableEntity::new(
        scenario.player.body().context("invalid player shape")?,
        scenario.movement,
        SoundLog::default(),
        scenario.player.spawn(),
    )?
    .with_lookup_policy(scenario.run.lookup_policy);
    player.set_yaw(scenario.player.yaw);
    player.set_pitch(scenario.player.pitch);
    player.set_god_mode(scenario.player.god_mode);

    let mut script = cfg
        .scripted_input
        .as_deref()
        .map(ScriptedInputPlayer::from_path)
        .transpose()?;
    let mut trace = cfg.trace.as_deref().map(JsonlSink::create).transpose()?;

    info!(
        ticks,
        seed = scenario.world.seed,
        chunks = grid.chunk_count(),
        scripted = script.is_some(),
        "Starting headless run"
    );

    let mut metrics = KinematicsMetrics::default();
    for _ in 0..ticks {
        if let Some(script) = script.as_mut() {
            player.body_mut().set_commands(script.advance());
        }
        let tick = player.tick();
        let before = player.position();

        match player.update(&grid) {
            Ok(report) => {
                record(&mut metrics, &report, &player, before);
                if let Some(sink) = trace.as_mut() {
                    write_tick(sink, &report, &player)?;
                }
            }
            Err(err) => {
                metrics.aborted_ticks += 1;
                warn!(tick = tick.0, %err, "Tick abandoned");
                if let Some(sink) = trace.as_mut() {
                    sink.write(&EventRecord {
                        tick,
                        kind: "aborted",
                        payload: &AbortedTick {
                            error: err.to_string(),
                        },
                    })?;
                }
            }
        }
        metrics.ticks += 1;
        player.sound_mut().drain();
    }
    metrics.final_position = player.position().to_array();

    if let Some(sink) = trace.as_mut() {
        sink.flush()?;
    }

    info!(
        ticks = metrics.ticks,
        aborted = metrics.aborted_ticks,
        final_position = ?player.position(),
        "Headless run finished"
    );

    if let Some(path) = &cfg.metrics {
        let result = if metrics.aborted_ticks == 0 {
            TestResult::Pass
        } else {
            TestResult::Fail
        };
        let report = MetricsReportBuilder::new("headless_run")
            .result(result)
            .kinematics(metrics.clone())
            .execution(TestExecutionMetrics {
                duration_seconds: started.elapsed().as_secs_f64(),
                assertions_checked: None,
                validations_passed: None,
            })
            .build();
        MetricsSink::create(path)?.write(&report)?;
    }

    Ok(metrics)
}

fn record(
    metrics: &mut KinematicsMetrics,
    report: &TickReport,
    player: &MovableEntity<PlayerBody, SoundLog>,
    before: DVec3,
) {
    let state = player.state();
    let after = state.position();
    metrics.vertical_collisions += u64::from(report.vertical_collision);
    metrics.horizontal_collisions += u64::from(report.horizontal_collision);
    metrics.grounded_ticks += u64::from(state.touching_ground());
    metrics.swimming_ticks += u64::from(state.is_swimming());
    metrics.sounds_played += report.sounds_played.len() as u64;
    metrics.terrain_clamps += u64::from(report.clamped_to_terrain);
    metrics.distance_walked += DVec3::new(after.x - before.x, 0.0, after.z - before.z).length();
}

fn write_tick(
    sink: &mut JsonlSink,
    report: &TickReport,
    player: &MovableEntity<PlayerBody, SoundLog>,
) -> Result<()> {
    let state = player.state();
    let line = TickTrace {
        report,
        position: state.position().to_array(),
        velocity: state.velocity().to_array(),
        gravity: state.gravity(),
        yaw: state.yaw(),
        pitch: state.pitch(),
        touching_ground: state.touching_ground(),
        swimming: state.is_swimming(),
        head_under_water: state.is_head_under_water(),
    };
    sink.write(&EventRecord {
        tick: report.tick,
        kind: "tick",
        payload: &line,
    })
}
