//! Unit tests for RSI indicator

use candidate_scan::indicators::momentum::{calculate_rsi, rsi_from_averages, RSI};

#[test]
fn test_rsi_undefined_for_first_period_bars() {
    let closes: Vec<f64> = (0..30).map(|i| 10.0 + (i as f64 * 0.37).sin()).collect();
    let series = calculate_rsi(&closes, 14);
    assert_eq!(series.len(), closes.len());
    for (i, value) in series.iter().enumerate() {
        if i < 14 {
            assert!(value.is_none(), "index {} should be undefined", i);
        } else {
            assert!(value.is_some(), "index {} should be defined", i);
        }
    }
}

#[test]
fn test_rsi_hand_computed_wilder_value() {
    // One dip (-0.3) after an initial +0.5, then twelve +0.2 steps.
    let mut closes = vec![10.0, 10.5, 10.2];
    for i in 1..=12 {
        closes.push(10.2 + 0.2 * i as f64);
    }
    assert_eq!(closes.len(), 15);

    let series = calculate_rsi(&closes, 14);
    // avg gain = 2.9 / 14, avg loss = 0.3 / 14 -> RSI = 100 * 2.9 / 3.2
    let rsi = series[14].unwrap();
    assert!((rsi - 90.625).abs() < 1e-4, "got {}", rsi);

    // One more bar with a 0.2 loss exercises the recursive update.
    closes.push(closes[14] - 0.2);
    let series = calculate_rsi(&closes, 14);
    let expected = 100.0 * 37.7 / (37.7 + 6.7);
    let rsi = series[15].unwrap();
    assert!((rsi - expected).abs() < 1e-4, "got {}", rsi);
}

#[test]
fn test_rsi_all_gains_is_100() {
    let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
    for value in calculate_rsi(&closes, 14).into_iter().flatten() {
        assert_eq!(value, 100.0);
    }
}

#[test]
fn test_rsi_all_losses_is_0() {
    let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
    for value in calculate_rsi(&closes, 14).into_iter().flatten() {
        assert!(value.abs() < 1e-10);
    }
}

#[test]
fn test_rsi_flat_market_is_neutral() {
    let closes = vec![10.0; 30];
    let series = calculate_rsi(&closes, 14);
    assert_eq!(series.iter().flatten().count(), 16);
    for value in series.into_iter().flatten() {
        assert_eq!(value, 50.0);
    }
}

#[test]
fn test_rsi_range() {
    let closes = vec![
        44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
        44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
    ];
    for value in calculate_rsi(&closes, 14).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
    }
}

#[test]
fn test_rsi_from_averages_edge_cases() {
    assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
    assert_eq!(rsi_from_averages(1.5, 0.0), 100.0);
    assert_eq!(rsi_from_averages(0.0, 1.5), 0.0);
    assert!((rsi_from_averages(1.0, 1.0) - 50.0).abs() < 1e-12);
}

#[test]
fn test_rsi_default_period() {
    assert_eq!(RSI::default().period(), 14);
}
