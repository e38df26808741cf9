//! Risk engine: MESA 10-year CHD risk with and without CAC.
//!
//! Pipeline: normalize → linear predictor → survival transform → coronary age.
//! Every step is a total, pure function; the engine holds no state and
//! never fails, so it may be called concurrently without coordination.

mod coronary_age;
mod linear;
mod survival;

pub use coronary_age::{
    coronary_age, FEMALE_REFERENCE_RISK, MALE_REFERENCE_RISK, MAX_CORONARY_AGE,
    MIN_CORONARY_AGE, REFERENCE_AGES,
};
pub use linear::{linear_estimate, CacTerm};
pub use survival::{round_to_tenth, round_whole, ten_year_risk};

use crate::domain::{PatientAttributes, PatientFeatures, RiskResult, WITHOUT_CAC, WITH_CAC};

/// Calculate both MESA risks and the coronary age for a raw attribute record.
#[must_use]
pub fn calculate(attributes: &PatientAttributes) -> RiskResult {
    calculate_features(&attributes.normalize())
}

/// Calculate both MESA risks and the coronary age for normalized features.
#[must_use]
pub fn calculate_features(features: &PatientFeatures) -> RiskResult {
    let risk_with_cac = ten_year_risk(
        linear_estimate(features, &WITH_CAC, CacTerm::Include),
        WITH_CAC.baseline_survival,
    );
    let risk_without_cac = ten_year_risk(
        linear_estimate(features, &WITHOUT_CAC, CacTerm::Exclude),
        WITHOUT_CAC.baseline_survival,
    );

    let coronary_age = coronary_age(risk_with_cac, features.sex());

    RiskResult {
        risk_with_cac: round_to_tenth(risk_with_cac),
        risk_without_cac: round_to_tenth(risk_without_cac),
        coronary_age: round_whole(coronary_age),
        age_difference: round_whole(coronary_age - features.age),
    }
}
