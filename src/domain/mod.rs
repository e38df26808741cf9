//! Domain layer: Core types of the MESA risk score.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable; raw input is lenient, normalized features are strict.

mod assessment;
pub mod coefficients;
mod patient;

pub use assessment::{Assessment, FormattedRiskResult, RiskResult};
pub use coefficients::{Predictor, RiskCoefficientSet, WITHOUT_CAC, WITH_CAC};
pub use patient::{
    AttributeField, Ethnicity, FieldValue, Gender, PatientAttributes, PatientFeatures,
    DEFAULT_AGE, DEFAULT_CALCIFICATION, DEFAULT_HDL_CHOLESTEROL, DEFAULT_SYSTOLIC_BP,
    DEFAULT_TOTAL_CHOLESTEROL,
};
