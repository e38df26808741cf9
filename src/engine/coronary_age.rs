//! Coronary age: the age at which an average person of the same sex carries
//! the same 10-year CHD risk.
//!
//! This is a heuristic interpolation over a coarse population table, not a
//! calibrated inverse of the MESA model. Table values and the extrapolation
//! rule are kept exactly as published with the calculator.

use crate::domain::Gender;

/// Lower bound of any returned coronary age.
pub const MIN_CORONARY_AGE: f64 = 30.0;
/// Upper bound of any returned coronary age.
pub const MAX_CORONARY_AGE: f64 = 90.0;

/// Years added or removed per risk percentage point outside the table.
const EXTRAPOLATION_YEARS_PER_POINT: f64 = 2.0;

/// Ages at which the reference risks are tabulated.
pub const REFERENCE_AGES: [f64; 9] = [45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0];

/// Approximate average 10-year CHD risk (%) for men at each reference age.
pub const MALE_REFERENCE_RISK: [f64; 9] = [2.5, 4.0, 6.0, 9.0, 13.0, 18.0, 24.0, 30.0, 35.0];

/// Approximate average 10-year CHD risk (%) for women at each reference age.
pub const FEMALE_REFERENCE_RISK: [f64; 9] = [1.0, 1.8, 3.0, 5.0, 8.0, 12.0, 17.0, 23.0, 28.0];

fn reference_risk(gender: Gender) -> &'static [f64; 9] {
    match gender {
        Gender::Male => &MALE_REFERENCE_RISK,
        Gender::Female => &FEMALE_REFERENCE_RISK,
    }
}

/// Map an (unrounded) 10-year risk percentage onto the sex-specific reference table.
///
/// Inside the table the age is linearly interpolated between the bracketing
/// rows; outside it moves two years per percentage point, bounded to [30, 90].
#[must_use]
pub fn coronary_age(risk: f64, gender: Gender) -> f64 {
    let table = reference_risk(gender);

    for (ages, risks) in REFERENCE_AGES.windows(2).zip(table.windows(2)) {
        let (age1, age2) = (ages[0], ages[1]);
        let (risk1, risk2) = (risks[0], risks[1]);
        if risk >= risk1 && risk <= risk2 {
            let proportion = (risk - risk1) / (risk2 - risk1);
            return age1 + proportion * (age2 - age1);
        }
    }

    let (first_age, first_risk) = (REFERENCE_AGES[0], table[0]);
    let (last_age, last_risk) = (REFERENCE_AGES[8], table[8]);
    if risk < first_risk {
        (first_age - (first_risk - risk) * EXTRAPOLATION_YEARS_PER_POINT).max(MIN_CORONARY_AGE)
    } else {
        (last_age + (risk - last_risk) * EXTRAPOLATION_YEARS_PER_POINT).min(MAX_CORONARY_AGE)
    }
}
