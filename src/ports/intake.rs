//! Intake port: Trait for collecting patient attributes.
//!
//! Collectors guarantee nothing about value quality; the engine defaults
//! whatever it cannot parse. Only a source that cannot be read at all is an error.

use crate::domain::PatientAttributes;

/// Errors that can occur while collecting patient attributes.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed JSON record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed field argument: {0}")]
    MalformedField(String),
}

/// Trait for input collectors.
///
/// Implementations provide a [`PatientAttributes`] record from some external
/// representation (URL parameters, JSON documents, command-line fields).
pub trait PatientIntake {
    /// Short name of the source, used in logs.
    fn source(&self) -> &'static str;

    /// Collect the patient attribute record.
    ///
    /// # Errors
    /// Returns `IntakeError` if the underlying source cannot be read or decoded.
    fn collect(&self) -> Result<PatientAttributes, IntakeError>;
}
