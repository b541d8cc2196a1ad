//! Unit tests for the per-symbol indicator engine

use candidate_scan::indicators::{IndicatorEngine, IndicatorPeriods};
use candidate_scan::models::indicators::{Bar, IndicatorRecord};
use chrono::{Days, NaiveDate};

fn create_test_bars(symbol: &str, count: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut prev_close = 10.0;
    (0..count)
        .map(|i| {
            let x = i as f64;
            let close = 10.0 + (x * 0.3).sin() * 2.0 + x * 0.01;
            let bar = Bar::new(
                symbol,
                start + Days::new(i as u64),
                prev_close,
                close.max(prev_close) + 0.2 + (x * 0.7).cos().abs() * 0.1,
                close.min(prev_close) - 0.2,
                close,
                1_000 + i as u64,
            );
            prev_close = close;
            bar
        })
        .collect()
}

fn first_defined(records: &[IndicatorRecord], field: impl Fn(&IndicatorRecord) -> Option<f64>) -> usize {
    records.iter().position(|r| field(r).is_some()).unwrap()
}

#[test]
fn test_engine_preserves_length_and_dates() {
    let bars = create_test_bars("AAA", 250);
    let records = IndicatorEngine::default().compute(&bars);
    assert_eq!(records.len(), bars.len());
    for (bar, record) in bars.iter().zip(&records) {
        assert_eq!(&record.bar, bar);
    }
}

#[test]
fn test_engine_empty_series() {
    assert!(IndicatorEngine::default().compute(&[]).is_empty());
}

#[test]
fn test_engine_warm_up_thresholds() {
    let records = IndicatorEngine::default().compute(&create_test_bars("AAA", 250));

    assert_eq!(first_defined(&records, |r| r.rsi), 14);
    assert_eq!(first_defined(&records, |r| r.ma50), 49);
    assert_eq!(first_defined(&records, |r| r.ma200), 199);
    assert_eq!(first_defined(&records, |r| r.macd), 25);
    assert_eq!(first_defined(&records, |r| r.macd_signal), 33);
    assert_eq!(first_defined(&records, |r| r.bb_upper), 19);
    assert_eq!(first_defined(&records, |r| r.bb_middle), 19);
    assert_eq!(first_defined(&records, |r| r.bb_lower), 19);
    assert_eq!(first_defined(&records, |r| r.adx), 27);

    // Once defined, values stay defined.
    for record in &records[199..] {
        assert!(record.rsi.is_some() && record.ma50.is_some() && record.ma200.is_some());
        assert!(record.macd.is_some() && record.macd_signal.is_some());
        assert!(record.bb_middle.is_some() && record.adx.is_some());
    }
}

#[test]
fn test_engine_value_bounds() {
    let records = IndicatorEngine::default().compute(&create_test_bars("AAA", 300));
    for record in &records {
        if let Some(rsi) = record.rsi {
            assert!((0.0..=100.0).contains(&rsi));
        }
        if let Some(adx) = record.adx {
            assert!((0.0..=100.0).contains(&adx));
        }
        if let (Some(upper), Some(middle), Some(lower)) =
            (record.bb_upper, record.bb_middle, record.bb_lower)
        {
            assert!(upper >= middle && middle >= lower);
        }
    }
}

#[test]
fn test_engine_is_deterministic() {
    let bars = create_test_bars("AAA", 250);
    let engine = IndicatorEngine::default();
    let first = engine.compute(&bars);
    let second = engine.compute(&bars);

    let bits = |records: &[IndicatorRecord]| -> Vec<Vec<Option<u64>>> {
        records
            .iter()
            .map(|r| {
                [r.rsi, r.ma50, r.ma200, r.macd, r.macd_signal, r.bb_upper, r.bb_middle, r.bb_lower, r.adx]
                    .iter()
                    .map(|v| v.map(f64::to_bits))
                    .collect()
            })
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_engine_symbols_are_independent() {
    let engine = IndicatorEngine::default();
    let a = create_test_bars("AAA", 120);
    let b: Vec<Bar> = create_test_bars("BBB", 120)
        .into_iter()
        .map(|mut bar| {
            bar.close *= 3.0;
            bar.high *= 3.0;
            bar.low *= 3.0;
            bar
        })
        .collect();

    let alone = engine.compute(&a);
    let _ = engine.compute(&b);
    let after_other = engine.compute(&a);
    assert_eq!(alone, after_other);
}

#[test]
fn test_engine_flat_series() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for price in [10.0, 10.1, 3.03] {
        let bars: Vec<Bar> = (0..30)
            .map(|i| Bar::new("FLAT", start + Days::new(i), price, price, price, price, 100))
            .collect();
        let records = IndicatorEngine::default().compute(&bars);
        let last = records.last().unwrap();

        assert_eq!(last.bb_upper, Some(price));
        assert_eq!(last.bb_middle, Some(price));
        assert_eq!(last.bb_lower, Some(price));
        assert_eq!(last.rsi, Some(50.0));
        assert_eq!(last.adx, Some(0.0));
    }
}

#[test]
fn test_engine_custom_periods() {
    let periods = IndicatorPeriods {
        rsi: 5,
        ma_fast: 3,
        ma_slow: 6,
        ..IndicatorPeriods::default()
    };
    let engine = IndicatorEngine::new(periods);
    let records = engine.compute(&create_test_bars("AAA", 40));
    assert_eq!(first_defined(&records, |r| r.rsi), 5);
    assert_eq!(first_defined(&records, |r| r.ma50), 2);
    assert_eq!(first_defined(&records, |r| r.ma200), 5);
    assert_eq!(engine.periods().rsi, 5);
}
