//! Result presenters: plain text and JSON renderings of an assessment.

use std::io::Write;

use crate::domain::Assessment;
use crate::ports::ResultPresenter;
use crate::Result;

/// Human-readable report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPresenter;

impl ResultPresenter for TextPresenter {
    fn present(&self, assessment: &Assessment, out: &mut dyn Write) -> Result<()> {
        let formatted = assessment.result.formatted();

        writeln!(out, "MESA 10-year CHD risk")?;
        writeln!(out, "  Risk with CAC:      {}", formatted.risk_with_cac)?;
        writeln!(out, "  Risk without CAC:   {}", formatted.risk_without_cac)?;
        writeln!(out, "  Coronary age:       {}", formatted.coronary_age)?;
        writeln!(out, "  Age difference:     {}", formatted.age_difference)?;
        for warning in &assessment.warnings {
            writeln!(out, "  Note: {warning}")?;
        }
        Ok(())
    }
}

/// Machine-readable report.
#[derive(Debug, Clone, Copy)]
pub struct JsonPresenter {
    /// Emit the whole assessment rather than only the result record
    pub include_details: bool,
}

impl Default for JsonPresenter {
    fn default() -> Self {
        Self {
            include_details: true,
        }
    }
}

impl ResultPresenter for JsonPresenter {
    fn present(&self, assessment: &Assessment, out: &mut dyn Write) -> Result<()> {
        if self.include_details {
            serde_json::to_writer_pretty(&mut *out, assessment)?;
        } else {
            serde_json::to_writer_pretty(&mut *out, &assessment.result)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
