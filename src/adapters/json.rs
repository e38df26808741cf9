//! JSON intake: reads a patient attribute record from a JSON document.
//!
//! The document is a single object using the engine's field names. Missing
//! keys, `null`s and unknown keys are accepted.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::PatientAttributes;
use crate::ports::{IntakeError, PatientIntake};

/// Where the JSON document comes from.
#[derive(Debug, Clone)]
enum JsonSource {
    File(PathBuf),
    Stdin,
    Inline(String),
}

/// Intake from a JSON object.
#[derive(Debug, Clone)]
pub struct JsonIntake {
    source: JsonSource,
}

impl JsonIntake {
    /// Read the record from a file; `-` reads standard input.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let source = if path == Path::new("-") {
            JsonSource::Stdin
        } else {
            JsonSource::File(path.to_path_buf())
        };
        Self { source }
    }

    /// Use an in-memory document.
    #[must_use]
    pub fn from_json(document: impl Into<String>) -> Self {
        Self {
            source: JsonSource::Inline(document.into()),
        }
    }

    fn read_document(&self) -> Result<String, IntakeError> {
        match &self.source {
            JsonSource::File(path) => Ok(std::fs::read_to_string(path)?),
            JsonSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            JsonSource::Inline(doc) => Ok(doc.clone()),
        }
    }
}

impl PatientIntake for JsonIntake {
    fn source(&self) -> &'static str {
        match self.source {
            JsonSource::File(_) => "json-file",
            JsonSource::Stdin => "json-stdin",
            JsonSource::Inline(_) => "json",
        }
    }

    fn collect(&self) -> Result<PatientAttributes, IntakeError> {
        let document = self.read_document()?;
        let attrs: PatientAttributes = serde_json::from_str(&document)?;
        tracing::debug!("Decoded JSON record with {} fields", attrs.present_count());
        Ok(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeField, FieldValue, DEFAULT_AGE, DEFAULT_SYSTOLIC_BP};
    use tempfile::tempdir;

    #[test]
    fn test_inline_document() {
        let intake = JsonIntake::from_json(
            r#"{"gender":"male","age":"58","ethnicity":2,"smoking":"yes","calcification":null}"#,
        );
        let attrs = intake.collect().expect("Should decode");
        assert_eq!(attrs.get(AttributeField::Ethnicity), Some(&FieldValue::Number(2.0)));
        assert!(attrs.get(AttributeField::Calcification).is_none());

        let features = attrs.normalize();
        assert_eq!(features.gender, 1.0);
        assert_eq!(features.chinese, 1.0);
        assert_eq!(features.smoking, 1.0);
        assert!((features.age - 58.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let attrs = JsonIntake::from_json("{}").collect().expect("Should decode");
        assert_eq!(attrs, PatientAttributes::default());
    }

    #[test]
    fn test_boolean_values_do_not_fail() {
        let attrs = JsonIntake::from_json(r#"{"diabetes":true}"#)
            .collect()
            .expect("Should decode");
        // Only the literal "yes" counts as a positive answer.
        assert_eq!(attrs.normalize().diabetes, 0.0);
    }

    #[test]
    fn test_unusable_values_fall_back_to_defaults() {
        let attrs = JsonIntake::from_json(
            r#"{"age":[45],"gender":"male","diabetes":{"answer":"yes"},"systolicBP":1e400}"#,
        )
        .collect()
        .expect("Should decode");
        assert!(matches!(attrs.get(AttributeField::Age), Some(FieldValue::Other(_))));

        let features = attrs.normalize();
        assert_eq!(features.gender, 1.0);
        assert!((features.age - DEFAULT_AGE).abs() < f64::EPSILON);
        assert_eq!(features.diabetes, 0.0);
        assert!((features.systolic_bp - DEFAULT_SYSTOLIC_BP).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_number_alone() {
        let features = JsonIntake::from_json(r#"{"age":1e400}"#)
            .collect()
            .expect("Should decode")
            .normalize();
        assert!((features.age - DEFAULT_AGE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_document() {
        let err = JsonIntake::from_json("{\"age\": ").collect().expect_err("Should fail");
        assert!(matches!(err, IntakeError::Json(_)));

        let err = JsonIntake::from_json("42").collect().expect_err("Should fail");
        assert!(matches!(err, IntakeError::Json(_)));
    }

    #[test]
    fn test_file_source() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("patient.json");
        std::fs::write(&path, r#"{"age": 72, "systolicBP": 145}"#).expect("write");

        let intake = JsonIntake::from_path(&path);
        assert_eq!(intake.source(), "json-file");
        let features = intake.collect().expect("Should decode").normalize();
        assert!((features.age - 72.0).abs() < f64::EPSILON);
        assert!((features.systolic_bp - 145.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let temp = tempdir().expect("tempdir");
        let err = JsonIntake::from_path(temp.path().join("absent.json"))
            .collect()
            .expect_err("Should fail");
        assert!(matches!(err, IntakeError::Read(_)));
    }

    #[test]
    fn test_dash_means_stdin() {
        assert_eq!(JsonIntake::from_path("-").source(), "json-stdin");
    }
}
