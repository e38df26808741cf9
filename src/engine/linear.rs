//! Linear predictor of the MESA models.

use crate::domain::{PatientFeatures, Predictor, RiskCoefficientSet};

/// Whether the ln(CAC + 1) term enters the linear predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacTerm {
    Include,
    Exclude,
}

/// Σ weight × feature over the shared predictors, plus the CAC term when
/// requested and the set carries a CAC weight.
#[must_use]
pub fn linear_estimate(
    features: &PatientFeatures,
    coefficients: &RiskCoefficientSet,
    cac: CacTerm,
) -> f64 {
    let estimate = Predictor::ALL
        .iter()
        .fold(0.0, |acc, p| acc + coefficients.weight(*p) * features.value(*p));

    match (cac, coefficients.cac) {
        (CacTerm::Include, Some(weight)) => estimate + weight * (features.calcification + 1.0).ln(),
        _ => estimate,
    }
}
