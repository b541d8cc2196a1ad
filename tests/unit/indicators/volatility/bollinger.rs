//! Unit tests for Bollinger Bands

use candidate_scan::indicators::volatility::BollingerBands;

#[test]
fn test_bollinger_warm_up() {
    let mut bands = BollingerBands::default();
    for i in 0..30 {
        let value = bands.update(10.0 + i as f64);
        assert_eq!(value.is_some(), i >= 19, "bands at {}", i);
    }
}

#[test]
fn test_bollinger_flat_series_has_zero_width() {
    let mut bands = BollingerBands::default();
    let mut last = None;
    for _ in 0..30 {
        last = bands.update(10.0);
    }
    let last = last.unwrap();
    assert_eq!(last.upper, last.middle);
    assert_eq!(last.middle, last.lower);
    assert_eq!(last.middle, 10.0);
}

#[test]
fn test_bollinger_flat_series_inexact_prices() {
    for price in [10.1, 3.03, 0.1, 14.51, 21.97, 7.77] {
        let mut bands = BollingerBands::default();
        let mut last = None;
        for _ in 0..30 {
            last = bands.update(price);
        }
        let last = last.unwrap();
        assert_eq!(last.upper, price, "upper at {}", price);
        assert_eq!(last.middle, price, "middle at {}", price);
        assert_eq!(last.lower, price, "lower at {}", price);
    }
}

#[test]
fn test_bollinger_uses_sample_deviation() {
    let mut bands = BollingerBands::new(20, 2.0);
    let mut last = None;
    for v in 1..=20 {
        last = bands.update(v as f64);
    }
    let last = last.unwrap();
    // Sample variance of 1..=20 is n(n+1)/12 = 35
    let std = 35.0_f64.sqrt();
    assert!((last.middle - 10.5).abs() < 1e-12);
    assert!((last.upper - (10.5 + 2.0 * std)).abs() < 1e-9);
    assert!((last.lower - (10.5 - 2.0 * std)).abs() < 1e-9);
}

#[test]
fn test_bollinger_ordering() {
    let mut bands = BollingerBands::default();
    for i in 0..100 {
        let close = 5.0 + (i as f64 * 0.5).sin() * 2.0;
        if let Some(b) = bands.update(close) {
            assert!(b.upper >= b.middle && b.middle >= b.lower);
        }
    }
}
