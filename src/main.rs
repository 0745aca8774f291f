//! blockmotion - headless driver for the entity kinematics core
//!
//! Loads a TOML scenario, builds a flat voxel world, steers a player from a
//! scripted input file and writes a JSONL trace plus a metrics report.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use config::{ScenarioConfig, DEFAULT_SCENARIO_PATH};
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting blockmotion v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO_PATH));
    let scenario = ScenarioConfig::load_from_path(&config_path)?;

    let metrics = headless::run(HeadlessConfig {
        scenario,
        scripted_input: cli.scripted_input,
        max_ticks: cli.max_ticks,
        trace: cli.trace,
        metrics: cli.metrics,
    })?;

    println!(
        "ticks={} aborted={} final_position={:?}",
        metrics.ticks, metrics.aborted_ticks, metrics.final_position
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    scripted_input: Option<PathBuf>,
    max_ticks: Option<u64>,
    trace: Option<PathBuf>,
    metrics: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => opts.config = path_arg(&mut args, "--config"),
                "--script" => opts.scripted_input = path_arg(&mut args, "--script"),
                "--trace" => opts.trace = path_arg(&mut args, "--trace"),
                "--metrics" => opts.metrics = path_arg(&mut args, "--metrics"),
                "--ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--ticks requires an integer");
                    }
                }
                other => tracing::warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        opts
    }
}

fn path_arg<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<PathBuf> {
    let path = args.next().map(PathBuf::from);
    if path.is_none() {
        tracing::error!("{flag} requires a file path");
    }
    path
}
