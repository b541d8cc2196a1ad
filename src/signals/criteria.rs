//! Selection rule applied to each enriched record

use crate::models::indicators::IndicatorRecord;
use serde::{Deserialize, Serialize};

/// A causal selection rule.
///
/// Sees one record and, optionally, its immediate predecessor in the same
/// series. Never sees later records.
pub trait Predicate: Send + Sync {
    fn matches(&self, current: &IndicatorRecord, previous: Option<&IndicatorRecord>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&IndicatorRecord, Option<&IndicatorRecord>) -> bool + Send + Sync,
{
    fn matches(&self, current: &IndicatorRecord, previous: Option<&IndicatorRecord>) -> bool {
        self(current, previous)
    }
}

/// Oversold pullback inside a young uptrend.
///
/// A record matches when all of the following hold:
/// - `min_close <= close <= max_close`
/// - `rsi <= rsi_limit`
/// - `ma50 > ma200` and `ma50 - ma200 <= max_ma_spread`
/// - `macd > macd_signal`
/// - `close < bb_middle`
/// - `adx_min <= adx <= adx_max`
/// - with `require_macd_cross`, the predecessor had `macd <= macd_signal`
///
/// Any undefined indicator fails the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub min_close: f64,
    pub max_close: f64,
    pub rsi_limit: f64,
    pub max_ma_spread: f64,
    pub adx_min: f64,
    pub adx_max: f64,
    #[serde(default)]
    pub require_macd_cross: bool,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_close: 2.0,
            max_close: 22.0,
            rsi_limit: 30.0,
            max_ma_spread: 0.3,
            adx_min: 20.0,
            adx_max: 40.0,
            require_macd_cross: false,
        }
    }
}

impl Predicate for SelectionCriteria {
    fn matches(&self, current: &IndicatorRecord, previous: Option<&IndicatorRecord>) -> bool {
        let (Some(rsi), Some(ma50), Some(ma200), Some(macd), Some(signal), Some(bb_middle), Some(adx)) = (
            current.rsi,
            current.ma50,
            current.ma200,
            current.macd,
            current.macd_signal,
            current.bb_middle,
            current.adx,
        ) else {
            return false;
        };

        let close = current.close();
        let base = (self.min_close..=self.max_close).contains(&close)
            && rsi <= self.rsi_limit
            && ma50 > ma200
            && ma50 - ma200 <= self.max_ma_spread
            && macd > signal
            && close < bb_middle
            && (self.adx_min..=self.adx_max).contains(&adx);

        if !base {
            return false;
        }

        if self.require_macd_cross {
            return previous
                .and_then(|prev| Some(prev.macd? <= prev.macd_signal?))
                .unwrap_or(false);
        }

        true
    }
}
