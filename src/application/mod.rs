//! Application layer: Use cases and services.
//!
//! This module orchestrates the risk engine with the intake and presenter
//! ports to implement a complete assessment.

mod assessment;

pub use assessment::AssessmentService;
