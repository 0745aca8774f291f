use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("blockmotion_{name}_{nanos:x}"));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn headless_run_writes_trace_and_metrics() {
    let dir = scratch_dir("headless");
    let config = dir.join("scenario.toml");
    let script = dir.join("script.json");
    let trace = dir.join("out/trace.jsonl");
    let metrics = dir.join("out/metrics.json");

    fs::write(
        &config,
        r#"
        [world]
        seed = 5
        chunk_radius = 1
        ground_height = 4

        [player]
        spawn = [0.0, 6.0, 0.0]

        [run]
        ticks = 1000
        "#,
    )
    .unwrap();
    fs::write(
        &script,
        r#"{"steps": [{"ticks": 40}, {"ticks": 40, "forward": true}]}"#,
    )
    .unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_blockmotion"))
        .arg("--config")
        .arg(&config)
        .arg("--script")
        .arg(&script)
        .arg("--ticks")
        .arg("80")
        .arg("--trace")
        .arg(&trace)
        .arg("--metrics")
        .arg(&metrics)
        .status()
        .expect("run headless binary");
    assert!(status.success());

    let lines: Vec<Value> = fs::read_to_string(&trace)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 80);
    assert_eq!(lines[0]["tick"], 0);
    assert_eq!(lines[79]["kind"], "tick");
    let last = &lines[79]["payload"];
    assert_eq!(last["touching_ground"], true);
    // Walking forward at yaw 0 heads towards -Z.
    assert!(last["position"][2].as_f64().unwrap() < -0.5);

    let report: Value = serde_json::from_str(&fs::read_to_string(&metrics).unwrap()).unwrap();
    assert_eq!(report["result"], "pass");
    assert_eq!(report["kinematics"]["ticks"], 80);
    assert_eq!(report["kinematics"]["aborted_ticks"], 0);
    assert!(report["kinematics"]["sounds_played"].as_u64().unwrap() >= 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_config_fails_the_run() {
    let dir = scratch_dir("malformed");
    let config = dir.join("broken.toml");
    fs::write(&config, "[run\nticks = ").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_blockmotion"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("run headless binary");
    assert!(!output.status.success());

    let _ = fs::remove_dir_all(&dir);
}
