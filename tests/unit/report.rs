//! Unit tests for the JSON report shape

use candidate_scan::models::candidates::CandidateGroup;
use candidate_scan::models::indicators::{Bar, IndicatorRecord};
use candidate_scan::report::CandidateReport;
use chrono::NaiveDate;

fn full_record(d: u32) -> IndicatorRecord {
    let date = NaiveDate::from_ymd_opt(2025, 2, d).unwrap();
    IndicatorRecord::new(Bar::new("EVGO", date, 3.1, 3.2, 3.0, 3.03, 1_000))
        .with_rsi(33.8709677419)
        .with_moving_averages(4.2387564, 4.2243391)
        .with_macd(-0.3463684, -0.3988112)
        .with_bollinger(3.7147671, 3.2418904, 2.7690131)
        .with_adx(39.8224731)
}

#[test]
fn test_report_shape() {
    let mut group = CandidateGroup::new();
    group.insert("EVGO", vec![full_record(13), full_record(14)]);

    let report = CandidateReport::from_group(&group);
    assert!(report.to_json_pretty().unwrap().starts_with("{\n  \"candidates\""));
    let json = serde_json::to_value(&report).unwrap();

    let top = json.as_object().unwrap();
    assert_eq!(top.len(), 1);
    let candidates = top["candidates"].as_object().unwrap();
    assert_eq!(candidates.len(), 1);

    let rows = candidates["EVGO"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2025-02-14");
    assert_eq!(rows[1]["date"], "2025-02-13");

    let row = rows[0].as_object().unwrap();
    let mut keys: Vec<&str> = row.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["adx", "bb_lower", "bb_middle", "bb_upper", "close", "date", "ma200", "ma50", "macd", "macd_signal", "rsi"]
    );

    assert_eq!(row["close"], 3.03);
    assert_eq!(row["rsi"], 33.870968);
    assert_eq!(row["ma50"], 4.238756);
    assert_eq!(row["macd"], -0.346368);
    assert_eq!(row["adx"], 39.822473);
}

#[test]
fn test_undefined_values_render_as_null() {
    let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
    let mut group = CandidateGroup::new();
    group.insert(
        "HIVE",
        vec![IndicatorRecord::new(Bar::new("HIVE", date, 2.8, 2.9, 2.7, 2.85, 5)).with_rsi(54.0239137)],
    );

    let report = CandidateReport::from_group(&group);
    let json = serde_json::to_value(&report).unwrap();
    let row = &json["candidates"]["HIVE"][0];
    assert_eq!(row["rsi"], 54.023914);
    assert!(row["adx"].is_null());
    assert!(row["ma200"].is_null());
}

#[test]
fn test_history_only_for_candidates() {
    let mut group = CandidateGroup::new();
    group.insert("EVGO", vec![full_record(14)]);

    let mut history = std::collections::BTreeMap::new();
    history.insert("EVGO".to_string(), vec![full_record(14), full_record(13), full_record(12)]);
    history.insert("HIVE".to_string(), vec![full_record(14)]);

    let report = CandidateReport::from_group(&group).with_history(&history);
    let json = serde_json::to_value(&report).unwrap();

    let rows = json["history"]["EVGO"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "2025-02-14");
    assert_eq!(rows[2]["date"], "2025-02-12");
    assert!(json["history"].get("HIVE").is_none());
}

#[test]
fn test_history_omitted_when_empty() {
    let mut group = CandidateGroup::new();
    group.insert("EVGO", vec![full_record(14)]);

    let report = CandidateReport::from_group(&group).with_history(&Default::default());
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("history").is_none());
}
