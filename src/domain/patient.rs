//! Patient attribute types for MESA coronary heart disease risk estimation.
//!
//! `PatientAttributes` is the loosely typed record handed over by input
//! collectors (forms, URL parameters, JSON files). `PatientFeatures` is the
//! normalized numeric vector the risk engine consumes.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::coefficients::Predictor;

/// Age substituted when the age field cannot be parsed.
pub const DEFAULT_AGE: f64 = 65.0;
/// Total cholesterol (mg/dL) substituted on parse failure.
pub const DEFAULT_TOTAL_CHOLESTEROL: f64 = 200.0;
/// HDL cholesterol (mg/dL) substituted on parse failure.
pub const DEFAULT_HDL_CHOLESTEROL: f64 = 50.0;
/// Systolic blood pressure (mmHg) substituted on parse failure.
pub const DEFAULT_SYSTOLIC_BP: f64 = 120.0;
/// Agatston score substituted on parse failure.
pub const DEFAULT_CALCIFICATION: f64 = 0.0;

/// A single raw field value as supplied by an input collector.
///
/// Deserialization never fails on the value's shape: numbers too large for
/// `f64` are kept as text, and arrays or objects land in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    /// Arrays and objects; never interpreted
    Other(Value),
}

impl FieldValue {
    /// Text form used for categorical comparisons.
    ///
    /// Numbers render as their shortest decimal form, so `2` and `"2"` compare equal.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Flag(true) => Cow::Borrowed("true"),
            Self::Flag(false) => Cow::Borrowed("false"),
            Self::Other(_) => Cow::Borrowed(""),
        }
    }

    /// Numeric interpretation of the value.
    ///
    /// Text is parsed by its leading decimal prefix (`"45 years"` is 45).
    /// Returns `None` when nothing parses or the result is not finite.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        let parsed = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_leading_float(s),
            Self::Flag(_) | Self::Other(_) => None,
        };
        parsed.filter(|v| v.is_finite())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Bool(b) => Self::Flag(b),
            other => Self::Other(other),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parse the longest leading decimal literal of `raw`.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Biological sex as encoded by the MESA models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Decode a raw field. Anything other than the literal `male` is female.
    #[must_use]
    pub fn from_field(value: Option<&FieldValue>) -> Self {
        match value {
            Some(v) if v.as_text() == "male" => Self::Male,
            _ => Self::Female,
        }
    }

    /// Model indicator: male = 1, female = 0.
    #[must_use]
    pub fn indicator(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Race/ethnicity categories of the MESA cohort.
///
/// Caucasian is the reference category (all indicators zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ethnicity {
    Caucasian,
    Chinese,
    Black,
    Hispanic,
}

impl Ethnicity {
    /// Decode a categorical code; unknown codes fall back to the reference category.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "2" => Self::Chinese,
            "3" => Self::Black,
            "4" => Self::Hispanic,
            _ => Self::Caucasian,
        }
    }

    #[must_use]
    pub fn from_field(value: Option<&FieldValue>) -> Self {
        value.map_or(Self::Caucasian, |v| Self::from_code(&v.as_text()))
    }

    /// 1 when `self` is `category`, 0 otherwise.
    #[must_use]
    pub fn indicator(self, category: Ethnicity) -> f64 {
        if self == category {
            1.0
        } else {
            0.0
        }
    }
}

/// Keys of the engine's input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    Gender,
    Age,
    Ethnicity,
    Diabetes,
    Smoking,
    FamilyHistory,
    TotalCholesterol,
    HdlCholesterol,
    SystolicBp,
    LipidMedication,
    HypertensionMedication,
    Calcification,
}

impl AttributeField {
    pub const ALL: [AttributeField; 12] = [
        Self::Gender,
        Self::Age,
        Self::Ethnicity,
        Self::Diabetes,
        Self::Smoking,
        Self::FamilyHistory,
        Self::TotalCholesterol,
        Self::HdlCholesterol,
        Self::SystolicBp,
        Self::LipidMedication,
        Self::HypertensionMedication,
        Self::Calcification,
    ];

    /// Wire name of the field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Ethnicity => "ethnicity",
            Self::Diabetes => "diabetes",
            Self::Smoking => "smoking",
            Self::FamilyHistory => "familyHistory",
            Self::TotalCholesterol => "totalCholesterol",
            Self::HdlCholesterol => "hdlCholesterol",
            Self::SystolicBp => "systolicBP",
            Self::LipidMedication => "lipidMedication",
            Self::HypertensionMedication => "hypertensionMedication",
            Self::Calcification => "calcification",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw patient attributes as supplied by an input collector.
///
/// Every field is optional; absent or malformed values never fail, they are
/// replaced by defaults during [`PatientAttributes::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diabetes: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_history: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cholesterol: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdl_cholesterol: Option<FieldValue>,
    #[serde(rename = "systolicBP", skip_serializing_if = "Option::is_none")]
    pub systolic_bp: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lipid_medication: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypertension_medication: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcification: Option<FieldValue>,
}

impl PatientAttributes {
    fn slot(&self, field: AttributeField) -> &Option<FieldValue> {
        match field {
            AttributeField::Gender => &self.gender,
            AttributeField::Age => &self.age,
            AttributeField::Ethnicity => &self.ethnicity,
            AttributeField::Diabetes => &self.diabetes,
            AttributeField::Smoking => &self.smoking,
            AttributeField::FamilyHistory => &self.family_history,
            AttributeField::TotalCholesterol => &self.total_cholesterol,
            AttributeField::HdlCholesterol => &self.hdl_cholesterol,
            AttributeField::SystolicBp => &self.systolic_bp,
            AttributeField::LipidMedication => &self.lipid_medication,
            AttributeField::HypertensionMedication => &self.hypertension_medication,
            AttributeField::Calcification => &self.calcification,
        }
    }

    fn slot_mut(&mut self, field: AttributeField) -> &mut Option<FieldValue> {
        match field {
            AttributeField::Gender => &mut self.gender,
            AttributeField::Age => &mut self.age,
            AttributeField::Ethnicity => &mut self.ethnicity,
            AttributeField::Diabetes => &mut self.diabetes,
            AttributeField::Smoking => &mut self.smoking,
            AttributeField::FamilyHistory => &mut self.family_history,
            AttributeField::TotalCholesterol => &mut self.total_cholesterol,
            AttributeField::HdlCholesterol => &mut self.hdl_cholesterol,
            AttributeField::SystolicBp => &mut self.systolic_bp,
            AttributeField::LipidMedication => &mut self.lipid_medication,
            AttributeField::HypertensionMedication => &mut self.hypertension_medication,
            AttributeField::Calcification => &mut self.calcification,
        }
    }

    #[must_use]
    pub fn get(&self, field: AttributeField) -> Option<&FieldValue> {
        self.slot(field).as_ref()
    }

    pub fn set(&mut self, field: AttributeField, value: impl Into<FieldValue>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Builder-style [`PatientAttributes::set`].
    #[must_use]
    pub fn with(mut self, field: AttributeField, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Number of fields carrying a value.
    #[must_use]
    pub fn present_count(&self) -> usize {
        AttributeField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .count()
    }

    /// Convert the raw record into the engine's numeric feature vector.
    ///
    /// Only a genuine parse failure triggers a default; a literal `0` is kept.
    #[must_use]
    pub fn normalize(&self) -> PatientFeatures {
        let ethnicity = Ethnicity::from_field(self.ethnicity.as_ref());

        PatientFeatures {
            age: numeric_or(self.age.as_ref(), DEFAULT_AGE),
            gender: Gender::from_field(self.gender.as_ref()).indicator(),
            chinese: ethnicity.indicator(Ethnicity::Chinese),
            black: ethnicity.indicator(Ethnicity::Black),
            hispanic: ethnicity.indicator(Ethnicity::Hispanic),
            diabetes: yes_no(self.diabetes.as_ref()),
            smoking: yes_no(self.smoking.as_ref()),
            total_cholesterol: numeric_or(
                self.total_cholesterol.as_ref(),
                DEFAULT_TOTAL_CHOLESTEROL,
            ),
            hdl_cholesterol: numeric_or(self.hdl_cholesterol.as_ref(), DEFAULT_HDL_CHOLESTEROL),
            lipid_medication: yes_no(self.lipid_medication.as_ref()),
            systolic_bp: numeric_or(self.systolic_bp.as_ref(), DEFAULT_SYSTOLIC_BP),
            hypertension_medication: yes_no(self.hypertension_medication.as_ref()),
            family_history: yes_no(self.family_history.as_ref()),
            // Agatston scores are non-negative; ln(CAC + 1) is undefined below -1.
            calcification: numeric_or(self.calcification.as_ref(), DEFAULT_CALCIFICATION)
                .max(0.0),
        }
    }
}

fn numeric_or(value: Option<&FieldValue>, default: f64) -> f64 {
    value.and_then(FieldValue::to_number).unwrap_or(default)
}

fn yes_no(value: Option<&FieldValue>) -> f64 {
    match value {
        Some(v) if v.as_text() == "yes" => 1.0,
        _ => 0.0,
    }
}

/// Normalized feature vector consumed by the risk engine.
///
/// Indicator fields hold exactly 0.0 or 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFeatures {
    /// Age in years
    pub age: f64,
    /// Male = 1, female = 0
    pub gender: f64,
    pub chinese: f64,
    pub black: f64,
    pub hispanic: f64,
    pub diabetes: f64,
    /// Current smoker
    pub smoking: f64,
    /// Total cholesterol in mg/dL
    pub total_cholesterol: f64,
    /// HDL cholesterol in mg/dL
    pub hdl_cholesterol: f64,
    pub lipid_medication: f64,
    /// Systolic blood pressure in mmHg
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    pub hypertension_medication: f64,
    /// Family history of heart attack
    pub family_history: f64,
    /// Coronary artery calcium, Agatston units
    pub calcification: f64,
}

impl PatientFeatures {
    /// Value of a model predictor.
    #[must_use]
    pub fn value(&self, predictor: Predictor) -> f64 {
        match predictor {
            Predictor::Age => self.age,
            Predictor::Gender => self.gender,
            Predictor::Chinese => self.chinese,
            Predictor::Black => self.black,
            Predictor::Hispanic => self.hispanic,
            Predictor::Diabetes => self.diabetes,
            Predictor::Smoking => self.smoking,
            Predictor::TotalCholesterol => self.total_cholesterol,
            Predictor::HdlCholesterol => self.hdl_cholesterol,
            Predictor::LipidMedication => self.lipid_medication,
            Predictor::SystolicBp => self.systolic_bp,
            Predictor::HypertensionMedication => self.hypertension_medication,
            Predictor::FamilyHistory => self.family_history,
        }
    }

    #[must_use]
    pub fn sex(&self) -> Gender {
        if self.gender == 1.0 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Check values against the ranges the input collector accepts.
    ///
    /// The engine computes regardless; callers use this to warn.
    ///
    /// # Errors
    /// Returns every out-of-range value as a message.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks = [
            ("Age", self.age, 45.0, 85.0),
            ("Calcification", self.calcification, 0.0, 2000.0),
            ("Total cholesterol", self.total_cholesterol, 100.0, 400.0),
            ("HDL cholesterol", self.hdl_cholesterol, 20.0, 100.0),
            ("Systolic BP", self.systolic_bp, 90.0, 200.0),
        ];

        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, value, min, max)| !(*min..=*max).contains(value))
            .map(|(label, value, min, max)| {
                format!("{label} {value} out of range [{min}, {max}]")
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
