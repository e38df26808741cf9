//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the risk engine and the systems that feed it (forms, URLs, files)
//! or display its results.

mod intake;
mod presenter;

pub use intake::{IntakeError, PatientIntake};
pub use presenter::ResultPresenter;
