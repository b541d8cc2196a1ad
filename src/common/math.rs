//! Windowed and recursive averages used across indicators

/// Simple moving average over the trailing `period` values.
///
/// Returns `None` if fewer than `period` values are available or `period` is 0.
/// A window of identical values averages to exactly that value.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    if is_flat(window) {
        return Some(window[0]);
    }
    Some(window.iter().sum::<f64>() / period as f64)
}

fn is_flat(window: &[f64]) -> bool {
    window.windows(2).all(|pair| pair[0] == pair[1])
}

/// Sample standard deviation (n - 1 denominator) over the trailing `period` values.
///
/// Exactly 0 when every value in the window is equal.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    if is_flat(window) {
        return Some(0.0);
    }

    let mean = sma(values, period)?;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (period - 1) as f64;

    Some(variance.sqrt())
}

/// Exponential smoothing constant `2 / (period + 1)`.
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One EMA step from the previous EMA value.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = ema_alpha(period);
    alpha * value + (1.0 - alpha) * previous
}

/// Full EMA over `values`, seeded with the SMA of the first `period` values.
///
/// Returns the last EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let seed = sma(&values[..period], period)?;
    Some(
        values[period..]
            .iter()
            .fold(seed, |prev, &v| ema_from_previous(v, prev, period)),
    )
}

/// Wilder's recursive average: `(previous * (n - 1) + current) / n`.
pub fn wilder_average(previous: f64, current: f64, period: usize) -> f64 {
    let n = period as f64;
    (previous * (n - 1.0) + current) / n
}

/// True range of a bar given the prior close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}
