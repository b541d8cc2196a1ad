//! Per-run grouping of matching records by symbol

use crate::models::indicators::IndicatorRecord;
use std::collections::BTreeMap;

/// Symbol -> matching records, newest first.
///
/// Symbols without matches are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateGroup {
    matches: BTreeMap<String, Vec<IndicatorRecord>>,
}

impl CandidateGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add matches for a symbol. Empty input is ignored.
    pub fn insert(&mut self, symbol: impl Into<String>, records: Vec<IndicatorRecord>) {
        if records.is_empty() {
            return;
        }

        let entry = self.matches.entry(symbol.into()).or_default();
        entry.extend(records);
        entry.sort_by(|a, b| b.date().cmp(&a.date()));
        entry.dedup_by(|a, b| a.date() == b.date());
    }

    pub fn get(&self, symbol: &str) -> Option<&[IndicatorRecord]> {
        self.matches.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.matches.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndicatorRecord])> {
        self.matches
            .iter()
            .map(|(symbol, records)| (symbol.as_str(), records.as_slice()))
    }
}
