//! Presenter port: Trait for rendering assessments.

use std::io::Write;

use crate::domain::Assessment;
use crate::Result;

/// Trait for result presenters.
///
/// Presenters only format; they never compute.
pub trait ResultPresenter {
    /// Write the assessment to `out`.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    fn present(&self, assessment: &Assessment, out: &mut dyn Write) -> Result<()>;
}

impl<P> ResultPresenter for Box<P>
where
    P: ResultPresenter + ?Sized,
{
    fn present(&self, assessment: &Assessment, out: &mut dyn Write) -> Result<()> {
        (**self).present(assessment, out)
    }
}
