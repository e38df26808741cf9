//! Assessment service: Orchestrates one risk assessment.
//!
//! This service coordinates:
//! - Attribute collection through an intake port
//! - Normalization and range checks
//! - The risk engine
//! - Presentation of the finished assessment

use std::io::Write;

use crate::domain::{Assessment, AttributeField};
use crate::engine;
use crate::ports::{PatientIntake, ResultPresenter};
use crate::Result;

/// Service for running MESA risk assessments.
///
/// Holds no patient state between calls; one call is one independent assessment.
pub struct AssessmentService<P>
where
    P: ResultPresenter,
{
    presenter: P,
}

impl<P> AssessmentService<P>
where
    P: ResultPresenter,
{
    /// Create a new assessment service.
    pub fn new(presenter: P) -> Self {
        Self { presenter }
    }

    /// Collect attributes from `intake` and run the risk engine.
    ///
    /// Out-of-range values are reported as warnings on the assessment; the
    /// engine computes regardless.
    ///
    /// # Errors
    /// Returns error only if the intake source cannot be read.
    pub fn assess<I>(&self, intake: &I) -> Result<Assessment>
    where
        I: PatientIntake + ?Sized,
    {
        tracing::debug!("Step 1: Collecting attributes from {} intake...", intake.source());
        let attributes = intake.collect()?;
        tracing::debug!(
            "Collected {} of {} fields",
            attributes.present_count(),
            AttributeField::ALL.len()
        );

        tracing::debug!("Step 2: Normalizing attributes...");
        let features = attributes.normalize();
        let warnings = match features.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                tracing::warn!(
                    "{} value(s) outside the accepted input ranges; computing anyway",
                    errors.len()
                );
                errors
            }
        };

        tracing::debug!("Step 3: Running risk engine...");
        let result = engine::calculate_features(&features);

        tracing::info!(
            "Assessment complete: risk_with_cac={}%, risk_without_cac={}%, coronary_age={}, age_difference={}",
            result.risk_with_cac,
            result.risk_without_cac,
            result.coronary_age,
            result.age_difference
        );

        Ok(Assessment::new(features, result, warnings))
    }

    /// Assess and write the result through the presenter.
    ///
    /// # Errors
    /// Returns error if intake fails or the output cannot be written.
    pub fn assess_and_present<I>(
        &self,
        intake: &I,
        out: &mut dyn Write,
    ) -> Result<Assessment>
    where
        I: PatientIntake + ?Sized,
    {
        let assessment = self.assess(intake)?;
        self.presenter.present(&assessment, out)?;
        Ok(assessment)
    }
}
