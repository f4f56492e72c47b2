/// End-to-end runs of move files through configured machines
use anyhow::Result;
use linkage::{
    cli::{load_machine, segment::SegmentArgs},
    job::{self, MoveFile, MoveStatus},
};
use linkage_core::{ContinuityState, JointPose};
use std::{fs, path::Path};

const TAPSTER: &str = r#"
[machine]
kinematics = "delta"
crank_length = 70.0
link_length = 133.5
crank_side_length = 179.437
effector_side_length = 86.6025
max_negative_angle = -1.0471975511965976
max_positive_angle = 1.5707963267948966
"#;

fn write(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

#[test]
fn test_delta_job_skips_rejected_move() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write(dir.path(), "tapster.toml", TAPSTER)?;
    let moves = write(
        dir.path(),
        "moves.toml",
        r#"
start = [0.0, 0.0, -150.0]

[[moves]]
target = [10.0, 0.0, -150.0]
feed_rate = 1200.0

[[moves]]
target = [10.0, 0.0, -230.0]
feed_rate = 1200.0

[[moves]]
target = [10.0, 0.0, -151.0]
feed_rate = 1200.0
rapid = true
"#,
    )?;

    let (config, mut machine) = load_machine(&config)?;
    let job = MoveFile::from_file(&moves)?;
    job.validate(config.axes)?;

    let mut continuity = ContinuityState::new(config.initial_joints());
    let start = job.start.clone().unwrap();
    let report = job::run(&mut machine, &mut continuity, start, &job.moves, None);

    assert_eq!(report.moves[0], MoveStatus::Completed {
        emitted: 20,
        skipped: 0
    });
    assert!(matches!(report.moves[1], MoveStatus::Rejected { .. }));
    assert_eq!(report.moves[2], MoveStatus::Completed {
        emitted: 2,
        skipped: 0
    });
    assert!(report.segments[20..].iter().all(|s| s.feed_rate == 1200.0));

    let position = machine.forward_kinematics(continuity.last()).unwrap();
    assert!((position[0] - 10.0).abs() < 1e-3);
    assert!((position[2] + 151.0).abs() < 1e-3);

    Ok(())
}

#[test]
fn test_segment_command_writes_json_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write(dir.path(), "tapster.toml", TAPSTER)?;
    // no start: the job begins at the homed position, 91.936 mm below the base
    let moves = write(
        dir.path(),
        "moves.json",
        r#"{"moves": [{"target": [0.0, 0.0, -150.0], "feed_rate": 600.0}]}"#,
    )?;
    let output = dir.path().join("segments.jsonl");

    SegmentArgs {
        config,
        moves,
        output: Some(output.clone()),
        limit: None,
    }
    .run()?;

    let content = fs::read_to_string(&output)?;
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 117);

    let last: serde_json::Value = serde_json::from_str(lines[116])?;
    assert_eq!(last["move"], 0);
    let joints: Vec<f64> = serde_json::from_value(last["joints"].clone())?;
    for angle in joints {
        assert!((angle - 0.6804618).abs() < 1e-6);
    }

    Ok(())
}

#[test]
fn test_scara_job_from_json_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write(
        dir.path(),
        "scara.json",
        r#"{
            "machine": {"kinematics": "scara", "length_r1": 100.0, "length_r2": 100.0},
            "segmenter": {"segment_length": 1.0},
            "home": [0.0, 90.0, 0.0]
        }"#,
    )?;
    let (config, mut machine) = load_machine(&config)?;

    let mut continuity = ContinuityState::new(config.initial_joints());
    let start = machine
        .post_homing(&mut continuity, config.initial_joints())
        .unwrap();
    assert!((start[0] - 100.0).abs() < 1e-9);
    assert!((start[1] - 100.0).abs() < 1e-9);

    let job: MoveFile = serde_json::from_str(
        r#"{"moves": [{"target": [150.0, 0.0, 5.0], "feed_rate": 3000.0}]}"#,
    )?;
    let report = job::run(&mut machine, &mut continuity, start, &job.moves, None);
    assert!(matches!(report.moves[0], MoveStatus::Completed { skipped: 0, .. }));

    let last = continuity.last();
    assert!((last[0] + 41.4096).abs() < 1e-3);
    assert!((last[1] - 82.8192).abs() < 1e-3);
    assert_eq!(last[2], 5.0);
    assert_ne!(last, &JointPose::zeros(3));

    Ok(())
}
