use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use upkeep::session::{self, RecordCommand};

fn record(data: &Path, log: Option<&Path>, rating: &str) {
    session::record_inspection(RecordCommand {
        location: "Processing".to_string(),
        element: "Floors".to_string(),
        detector: "aya".to_string(),
        rating: rating.to_string(),
        comment: "crack near drain".to_string(),
        person: "sameh".to_string(),
        safety: false,
        quality: false,
        image: None,
        data_dir: Some(data.to_path_buf()),
        log: log.map(Path::to_path_buf),
    })
    .unwrap();
}

#[test]
fn every_action_appends_one_parseable_line() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    let log = tmp.path().join("activity.ndjson");

    record(&data, Some(&log), "2");
    record(&data, Some(&log), "0");
    session::update_expected_date(
        "Work Order 1",
        "2024-04-20",
        "sameh",
        Some(data.clone()),
        Some(log.clone()),
    )
    .unwrap();
    session::update_actual_date(
        "Work Order 1",
        "2024-05-01",
        "sameh",
        Some(data.clone()),
        Some(log.clone()),
    )
    .unwrap();

    // Four separate invocations appending to the same file.
    let raw = fs::read_to_string(&log).unwrap();
    let lines: Vec<Value> = raw
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);

    assert_eq!(lines[0]["op"], "record");
    assert_eq!(lines[0]["table"], "work_orders");
    assert_eq!(lines[0]["event"], "Work Order 1");
    assert_eq!(lines[0]["rating"], "2");

    assert_eq!(lines[1]["table"], "checklist");
    assert_eq!(lines[1]["event"], "check");
    assert_eq!(lines[1]["rating"], "0");

    assert_eq!(lines[2]["op"], "update Expected repair Date");
    assert_eq!(lines[2]["event"], "Work Order 1");
    assert_eq!(lines[2]["modifier"], "sameh");
    assert_eq!(lines[2]["new_date"], "2024-04-20");

    assert_eq!(lines[3]["op"], "update Actual Repair Date");
    assert_eq!(lines[3]["new_date"], "2024-05-01");
}

#[test]
fn no_mirror_without_a_log_path() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");

    record(&data, None, "2");

    assert!(!tmp.path().join("activity.ndjson").exists());
    assert!(data.join("work_orders.csv").exists());
}
