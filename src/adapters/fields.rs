//! Field-argument intake: `key=value` pairs such as command-line arguments.
//!
//! No collector defaults are applied, so anything missing falls back to the
//! engine's own defaults.

use crate::domain::{AttributeField, PatientAttributes};
use crate::ports::{IntakeError, PatientIntake};

/// Intake from `key=value` arguments using the engine's field names.
#[derive(Debug, Clone, Default)]
pub struct FieldArgsIntake {
    attributes: PatientAttributes,
    unknown: Vec<String>,
}

impl FieldArgsIntake {
    /// Parse arguments of the form `key=value`.
    ///
    /// Unknown keys are kept aside (see [`FieldArgsIntake::unknown_keys`]);
    /// later occurrences of a key replace earlier ones.
    ///
    /// # Errors
    /// Returns `IntakeError::MalformedField` for an argument without `=` or with an empty key.
    pub fn parse<I, S>(args: I) -> Result<Self, IntakeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut intake = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| IntakeError::MalformedField(arg.to_string()))?;

            match AttributeField::from_key(key.trim()) {
                Some(field) => intake.attributes.set(field, value.trim()),
                None => intake.unknown.push(key.trim().to_string()),
            }
        }
        Ok(intake)
    }

    /// Keys that did not match any field.
    #[must_use]
    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown
    }
}

impl PatientIntake for FieldArgsIntake {
    fn source(&self) -> &'static str {
        "fields"
    }

    fn collect(&self) -> Result<PatientAttributes, IntakeError> {
        for key in &self.unknown {
            tracing::warn!("Ignoring unknown field '{}'", key);
        }
        Ok(self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, DEFAULT_CALCIFICATION};

    #[test]
    fn test_parse_fields() {
        let intake = FieldArgsIntake::parse(["gender=male", "age=61", "systolicBP = 138", "calcification=0"])
            .expect("Should parse");
        let attrs = intake.collect().expect("collect");
        assert_eq!(attrs.get(AttributeField::Gender), Some(&FieldValue::Text("male".into())));
        assert_eq!(attrs.get(AttributeField::SystolicBp), Some(&FieldValue::Text("138".into())));
        assert!(intake.unknown_keys().is_empty());

        let features = attrs.normalize();
        assert!((features.age - 61.0).abs() < f64::EPSILON);
        assert_eq!(features.calcification, DEFAULT_CALCIFICATION);
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let intake = FieldArgsIntake::parse(["age=50", "sbp=140", "bmi=27"]).expect("Should parse");
        assert_eq!(intake.unknown_keys(), ["sbp".to_string(), "bmi".to_string()]);
        assert_eq!(intake.collect().expect("collect").present_count(), 1);
    }

    #[test]
    fn test_malformed_argument() {
        let err = FieldArgsIntake::parse(["age"]).expect_err("Should fail");
        assert!(matches!(err, IntakeError::MalformedField(ref a) if a == "age"));

        assert!(FieldArgsIntake::parse(["=5"]).is_err());
    }

    #[test]
    fn test_empty_value_defaults_in_engine() {
        let intake = FieldArgsIntake::parse(["hdlCholesterol="]).expect("Should parse");
        let features = intake.collect().expect("collect").normalize();
        assert_eq!(features.hdl_cholesterol, crate::domain::DEFAULT_HDL_CHOLESTEROL);
    }
}
