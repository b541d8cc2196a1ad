//! JSON report shape for matched candidates

use crate::error::ScanError;
use crate::models::candidates::CandidateGroup;
use crate::models::indicators::IndicatorRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fractional digits kept for every number in the report.
pub const REPORT_PRECISION: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub candidates: BTreeMap<String, Vec<CandidateRow>>,
    /// Recent bars per candidate, newest first. Omitted when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub history: BTreeMap<String, Vec<CandidateRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub adx: Option<f64>,
}

impl From<&IndicatorRecord> for CandidateRow {
    fn from(record: &IndicatorRecord) -> Self {
        Self {
            date: record.date(),
            close: round(record.close()),
            rsi: record.rsi.map(round),
            ma50: record.ma50.map(round),
            ma200: record.ma200.map(round),
            macd: record.macd.map(round),
            macd_signal: record.macd_signal.map(round),
            bb_upper: record.bb_upper.map(round),
            bb_middle: record.bb_middle.map(round),
            bb_lower: record.bb_lower.map(round),
            adx: record.adx.map(round),
        }
    }
}

impl CandidateReport {
    pub fn from_group(group: &CandidateGroup) -> Self {
        let candidates = group
            .iter()
            .map(|(symbol, records)| {
                (
                    symbol.to_string(),
                    records.iter().map(CandidateRow::from).collect(),
                )
            })
            .collect();

        Self {
            candidates,
            history: BTreeMap::new(),
        }
    }

    /// Attach per-symbol history. Symbols that are not candidates are ignored.
    pub fn with_history(mut self, history: &BTreeMap<String, Vec<IndicatorRecord>>) -> Self {
        self.history = history
            .iter()
            .filter(|(symbol, records)| {
                self.candidates.contains_key(symbol.as_str()) && !records.is_empty()
            })
            .map(|(symbol, records)| {
                (
                    symbol.clone(),
                    records.iter().map(CandidateRow::from).collect(),
                )
            })
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Round half away from zero to [`REPORT_PRECISION`] digits.
pub fn round(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_PRECISION);
    (value * scale).round() / scale
}
