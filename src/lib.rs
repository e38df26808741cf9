//! # mesa-chd
//!
//! 10-year coronary heart disease risk from the MESA risk score.
//!
//! This crate provides:
//! - A pure risk engine evaluating both MESA models (with and without
//!   coronary artery calcium) plus an approximate "coronary age"
//! - Input collectors for URL query strings, JSON records and CLI fields
//! - Text and JSON presenters for the results
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient attributes, coefficient sets, results)
//! - `engine`: The deterministic risk calculation pipeline
//! - `ports`: Trait definitions for input collection and presentation
//! - `adapters`: Concrete implementations (query string, JSON, presenters, log sanitizing)
//! - `application`: Use cases orchestrating intake, engine and logging
//! - `config`: Explicit runtime configuration for the binary
//! - `cli`: Argument parsing for the binary

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ports;

pub use domain::{Assessment, PatientAttributes, PatientFeatures, RiskResult};
pub use engine::calculate;

/// Result type for mesa-chd operations
pub type Result<T> = std::result::Result<T, MesaError>;

/// Main error type for mesa-chd.
///
/// The risk engine itself is total and never produces one of these; they
/// come from collecting input and writing output.
#[derive(Debug, thiserror::Error)]
pub enum MesaError {
    #[error("Input collection failed: {0}")]
    Intake(#[from] ports::IntakeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}
