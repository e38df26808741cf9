//! Risk result types.
//!
//! Represents the output of the MESA risk engine and its presentation forms.

use serde::{Deserialize, Serialize};

use super::patient::PatientFeatures;

/// Output of one risk calculation.
///
/// Derived purely from the patient's features; identical input always yields
/// an identical result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// 10-year CHD risk (%) from the model including CAC, one decimal
    #[serde(rename = "riskWithCAC")]
    pub risk_with_cac: f64,

    /// 10-year CHD risk (%) from the model without CAC, one decimal
    #[serde(rename = "riskWithoutCAC")]
    pub risk_without_cac: f64,

    /// Estimated coronary age in whole years, within [30, 90]
    #[serde(rename = "coronaryAge")]
    pub coronary_age: f64,

    /// Coronary age minus actual age, whole years
    #[serde(rename = "ageDifference")]
    pub age_difference: f64,
}

impl RiskResult {
    /// Display strings for the result.
    #[must_use]
    pub fn formatted(&self) -> FormattedRiskResult {
        let age_difference = if self.age_difference >= 0.0 {
            format!("+{} years", self.age_difference)
        } else {
            format!("{} years", self.age_difference)
        };

        FormattedRiskResult {
            risk_with_cac: format!("{}%", self.risk_with_cac),
            risk_without_cac: format!("{}%", self.risk_without_cac),
            coronary_age: format!("{} years", self.coronary_age),
            age_difference,
        }
    }
}

/// Human-readable rendering of a [`RiskResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRiskResult {
    #[serde(rename = "riskWithCAC")]
    pub risk_with_cac: String,
    #[serde(rename = "riskWithoutCAC")]
    pub risk_without_cac: String,
    pub coronary_age: String,
    pub age_difference: String,
}

/// Complete assessment record including metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Normalized features the engine actually used
    pub features: PatientFeatures,

    /// The engine output
    pub result: RiskResult,

    /// Values outside the ranges the input collector accepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Timestamp of assessment
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(features: PatientFeatures, result: RiskResult, warnings: Vec<String>) -> Self {
        Self {
            features,
            result,
            warnings,
            assessed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(age_difference: f64) -> RiskResult {
        RiskResult {
            risk_with_cac: 6.9,
            risk_without_cac: 7.0,
            coronary_age: 62.0,
            age_difference,
        }
    }

    #[test]
    fn test_formatting() {
        let formatted = result(3.0).formatted();
        assert_eq!(formatted.risk_with_cac, "6.9%");
        assert_eq!(formatted.risk_without_cac, "7%");
        assert_eq!(formatted.coronary_age, "62 years");
        assert_eq!(formatted.age_difference, "+3 years");
    }

    #[test]
    fn test_formatting_signs() {
        assert_eq!(result(0.0).formatted().age_difference, "+0 years");
        assert_eq!(result(-4.0).formatted().age_difference, "-4 years");
    }

    #[test]
    fn test_result_output_contract_keys() {
        let json = serde_json::to_value(result(1.0)).expect("Should serialize");
        let obj = json.as_object().expect("Should be an object");
        for key in ["riskWithCAC", "riskWithoutCAC", "coronaryAge", "ageDifference"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 4);
    }
}
