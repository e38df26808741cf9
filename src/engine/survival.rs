//! Cox proportional-hazards transform from linear predictor to 10-year risk.

/// 10-year risk in percent: `(1 − S0^exp(lp)) × 100`, clamped to [0, 100].
#[must_use]
pub fn ten_year_risk(linear_estimate: f64, baseline_survival: f64) -> f64 {
    let survival = baseline_survival.powf(linear_estimate.exp());
    ((1.0 - survival) * 100.0).clamp(0.0, 100.0)
}

/// Round to one decimal, half away from zero.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole number with halves going toward +∞ (`-0.5` is `0`),
/// without a negative zero.
#[must_use]
pub fn round_whole(value: f64) -> f64 {
    (value + 0.5).floor() + 0.0
}
