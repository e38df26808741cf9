//! MESA CHD risk score coefficient sets.
//!
//! Published regression coefficients (McClelland et al., JACC 2015) for the
//! 10-year CHD risk model with and without coronary artery calcium.
//! These are fixed constants and never mutated.

use serde::Serialize;

/// Predictors shared by both MESA models, in summation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Predictor {
    Age,
    Gender,
    Chinese,
    Black,
    Hispanic,
    Diabetes,
    Smoking,
    TotalCholesterol,
    HdlCholesterol,
    LipidMedication,
    SystolicBp,
    HypertensionMedication,
    FamilyHistory,
}

impl Predictor {
    pub const ALL: [Predictor; 13] = [
        Self::Age,
        Self::Gender,
        Self::Chinese,
        Self::Black,
        Self::Hispanic,
        Self::Diabetes,
        Self::Smoking,
        Self::TotalCholesterol,
        Self::HdlCholesterol,
        Self::LipidMedication,
        Self::SystolicBp,
        Self::HypertensionMedication,
        Self::FamilyHistory,
    ];
}

/// Weights of one MESA model plus its baseline survival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskCoefficientSet {
    pub name: &'static str,
    /// 10-year survival at the reference covariate level, in (0, 1)
    pub baseline_survival: f64,
    /// Weights indexed by `Predictor as usize`
    weights: [f64; 13],
    /// Weight of ln(CAC + 1); only the with-CAC model has one
    pub cac: Option<f64>,
}

impl RiskCoefficientSet {
    #[must_use]
    pub fn weight(&self, predictor: Predictor) -> f64 {
        self.weights[predictor as usize]
    }
}

/// MESA model including the coronary artery calcium term.
pub const WITH_CAC: RiskCoefficientSet = RiskCoefficientSet {
    name: "MESA with CAC",
    baseline_survival: 0.99833,
    weights: [
        0.0172,  // age
        0.4079,  // gender (male = 1)
        -0.3475, // chinese
        0.0353,  // black
        -0.0222, // hispanic
        0.3892,  // diabetes
        0.3717,  // smoking
        0.0043,  // totalCholesterol
        -0.0114, // hdlCholesterol
        0.1206,  // lipidMedication
        0.0066,  // systolicBP
        0.2278,  // hypertensionMedication
        0.3239,  // familyHistory
    ],
    cac: Some(0.2743),
};

/// MESA model from traditional risk factors only.
pub const WITHOUT_CAC: RiskCoefficientSet = RiskCoefficientSet {
    name: "MESA without CAC",
    baseline_survival: 0.99963,
    weights: [
        0.0455,  // age
        0.7496,  // gender (male = 1)
        -0.5055, // chinese
        -0.2111, // black
        -0.1900, // hispanic
        0.5168,  // diabetes
        0.4732,  // smoking
        0.0053,  // totalCholesterol
        -0.0140, // hdlCholesterol
        0.2473,  // lipidMedication
        0.0085,  // systolicBP
        0.3381,  // hypertensionMedication
        0.4522,  // familyHistory
    ],
    cac: None,
};
