//! Candidate selection over a trailing calendar window

use crate::models::candidates::CandidateGroup;
use crate::models::indicators::IndicatorRecord;
use crate::signals::criteria::Predicate;
use chrono::{Days, NaiveDate};

/// The trailing `days` calendar days ending at `as_of` (inclusive).
///
/// `days = 1` covers only `as_of`; `days = 0` covers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    as_of: NaiveDate,
    days: u32,
}

impl LookbackWindow {
    pub fn new(as_of: NaiveDate, days: u32) -> Self {
        Self { as_of, days }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Earliest date inside the window, `None` when the window is empty.
    pub fn first_date(&self) -> Option<NaiveDate> {
        let span = self.days.checked_sub(1)?;
        Some(
            self.as_of
                .checked_sub_days(Days::new(u64::from(span)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.first_date() {
            Some(first) => date >= first && date <= self.as_of,
            None => false,
        }
    }
}

pub struct CandidateSelector<P> {
    predicate: P,
    window: LookbackWindow,
}

impl<P: Predicate> CandidateSelector<P> {
    pub fn new(predicate: P, window: LookbackWindow) -> Self {
        Self { predicate, window }
    }

    /// Matching records of one ascending series, newest first.
    ///
    /// The predecessor handed to the predicate is the previous bar of the full
    /// series, even when that bar falls before the window.
    pub fn select_symbol(&self, records: &[IndicatorRecord]) -> Vec<IndicatorRecord> {
        let mut matches: Vec<IndicatorRecord> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.window.contains(record.date()))
            .filter(|(i, record)| {
                let previous = i.checked_sub(1).map(|j| &records[j]);
                self.predicate.matches(record, previous)
            })
            .map(|(_, record)| record.clone())
            .collect();

        matches.reverse();
        matches
    }

    /// Select across many symbols. Symbols with no matches are left out.
    pub fn select<'a, I>(&self, series: I) -> CandidateGroup
    where
        I: IntoIterator<Item = (&'a str, &'a [IndicatorRecord])>,
    {
        let mut group = CandidateGroup::new();
        for (symbol, records) in series {
            group.insert(symbol, self.select_symbol(records));
        }
        group
    }
}
