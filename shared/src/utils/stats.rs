//! Growth, average and percentile calculations for dashboards and charts.
//!
//! None of these fail: empty inputs and zero denominators map to fixed values.

/// Percent change from `previous` to `current`.
///
/// With a zero baseline any positive value counts as 100% growth and anything
/// else as 0%, rather than dividing by zero.
pub fn calculate_growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn calculate_average(numbers: &[f64]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

/// Percentile with linear interpolation between closest ranks.
///
/// `percentile` is clamped to `[0, 100]`; an empty slice yields 0.
pub fn calculate_percentile(numbers: &[f64], percentile: f64) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);

    let percentile = if percentile.is_nan() {
        0.0
    } else {
        percentile.clamp(0.0, 100.0)
    };
    let index = percentile / 100.0 * (sorted.len() - 1) as f64;

    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;
    let lower = sorted[lower_index];
    if lower_index == upper_index {
        return lower;
    }

    let weight = index - lower_index as f64;
    lower + weight * (sorted[upper_index] - lower)
}
