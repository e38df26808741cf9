//! URL query-parameter intake.
//!
//! Accepts either a full URL or a bare query string and maps the calculator's
//! parameter names and their short aliases onto [`PatientAttributes`].
//! Values that are missing, unrecognized or outside the accepted range keep
//! the collector defaults.

use url::{form_urlencoded, Url};

use crate::domain::{AttributeField, PatientAttributes};
use crate::ports::{IntakeError, PatientIntake};

/// Collector defaults applied before any parameter is read.
pub const DEFAULT_AGE: i64 = 65;
pub const DEFAULT_CALCIFICATION: i64 = 100;
pub const DEFAULT_TOTAL_CHOLESTEROL: i64 = 200;
pub const DEFAULT_HDL_CHOLESTEROL: i64 = 50;
pub const DEFAULT_SYSTOLIC_BP: i64 = 120;

/// Integer fields: aliases in lookup order and the accepted inclusive range.
const NUMERIC_PARAMS: [(AttributeField, &[&str], i64, i64); 5] = [
    (AttributeField::Age, &["age"], 45, 85),
    (
        AttributeField::Calcification,
        &["calcification", "calc", "cac"],
        0,
        2000,
    ),
    (
        AttributeField::TotalCholesterol,
        &["totalCholesterol", "tchol", "tc"],
        100,
        400,
    ),
    (AttributeField::HdlCholesterol, &["hdlCholesterol", "hdl"], 20, 100),
    (AttributeField::SystolicBp, &["systolicBP", "sbp", "bp"], 90, 200),
];

/// Yes/no fields with their aliases, each tried in order.
const FLAG_PARAMS: [(AttributeField, &[&str]); 5] = [
    (AttributeField::Diabetes, &["diabetes"]),
    (AttributeField::Smoking, &["smoking", "smoke"]),
    (AttributeField::FamilyHistory, &["familyHistory", "family", "fh"]),
    (
        AttributeField::LipidMedication,
        &["lipidMedication", "lipid", "statin"],
    ),
    (
        AttributeField::HypertensionMedication,
        &["hypertensionMedication", "htn", "bp"],
    ),
];

/// Intake from URL query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryIntake {
    pairs: Vec<(String, String)>,
}

impl QueryIntake {
    /// Parse a full URL (`https://host/?age=60`) or a bare query (`age=60&sex=m`).
    ///
    /// # Errors
    /// Returns `IntakeError::InvalidUrl` if the input looks like a URL but does not parse.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let input = input.trim();
        let pairs: Vec<(String, String)> = if input.contains("://") {
            Url::parse(input)?.query_pairs().into_owned().collect()
        } else {
            let query = input.strip_prefix('?').unwrap_or(input);
            form_urlencoded::parse(query.as_bytes()).into_owned().collect()
        };
        Ok(Self { pairs })
    }

    /// First value of `name`, if present and non-empty.
    fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `names`.
    fn first(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    fn parse_flag(&self, name: &str) -> Option<&'static str> {
        let value = self.get(name)?.to_lowercase();
        match value.as_str() {
            "yes" | "y" | "true" | "1" => Some("yes"),
            "no" | "n" | "false" | "0" => Some("no"),
            _ => None,
        }
    }

    /// Build the attribute record.
    #[must_use]
    pub fn attributes(&self) -> PatientAttributes {
        let mut attrs = defaults();

        if let Some(gender) = self.first(&["gender", "sex"]) {
            match gender.to_lowercase().as_str() {
                "m" | "male" => attrs.set(AttributeField::Gender, "male"),
                "f" | "female" => attrs.set(AttributeField::Gender, "female"),
                _ => {}
            }
        }

        if let Some(race) = self.first(&["race", "ethnicity"]) {
            let code = match race.to_lowercase().as_str() {
                "caucasian" | "white" | "1" => Some("1"),
                "chinese" | "2" => Some("2"),
                "african american" | "black" | "aa" | "3" => Some("3"),
                "hispanic" | "latino" | "4" => Some("4"),
                _ => None,
            };
            if let Some(code) = code {
                attrs.set(AttributeField::Ethnicity, code);
            }
        }

        for (field, aliases, min, max) in NUMERIC_PARAMS {
            let value = self
                .first(aliases)
                .and_then(parse_leading_int)
                .filter(|v| (min..=max).contains(v));
            if let Some(value) = value {
                attrs.set(field, value);
            }
        }

        for (field, aliases) in FLAG_PARAMS {
            if let Some(answer) = aliases.iter().find_map(|name| self.parse_flag(name)) {
                attrs.set(field, answer);
            }
        }

        attrs
    }
}

impl PatientIntake for QueryIntake {
    fn source(&self) -> &'static str {
        "query"
    }

    fn collect(&self) -> Result<PatientAttributes, IntakeError> {
        Ok(self.attributes())
    }
}

/// The record a query without parameters produces.
#[must_use]
pub fn defaults() -> PatientAttributes {
    PatientAttributes::default()
        .with(AttributeField::Age, DEFAULT_AGE)
        .with(AttributeField::Calcification, DEFAULT_CALCIFICATION)
        .with(AttributeField::TotalCholesterol, DEFAULT_TOTAL_CHOLESTEROL)
        .with(AttributeField::HdlCholesterol, DEFAULT_HDL_CHOLESTEROL)
        .with(AttributeField::SystolicBp, DEFAULT_SYSTOLIC_BP)
}

/// Parse the leading base-10 integer of `raw` (`"60yrs"` is 60).
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let digits_start = usize::from(s.starts_with(|c: char| c == '+' || c == '-'));
    let digits_len = s[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    s[..digits_start + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn number(attrs: &PatientAttributes, field: AttributeField) -> f64 {
        attrs
            .get(field)
            .and_then(FieldValue::to_number)
            .expect("Numeric field should be set")
    }

    fn text(attrs: &PatientAttributes, field: AttributeField) -> Option<String> {
        attrs.get(field).map(|v| v.as_text().into_owned())
    }

    #[test]
    fn test_empty_query_gives_defaults() {
        let attrs = QueryIntake::parse("").expect("parse").attributes();
        assert_eq!(attrs, defaults());
        assert_eq!(number(&attrs, AttributeField::Calcification), 100.0);
        assert!(attrs.get(AttributeField::Gender).is_none());
    }

    #[test]
    fn test_full_url() {
        let attrs = QueryIntake::parse(
            "https://example.org/mesa?gender=male&age=60&race=african%20american&tc=240&hdl=40&sbp=150&cac=300",
        )
        .expect("parse")
        .attributes();
        assert_eq!(text(&attrs, AttributeField::Gender).as_deref(), Some("male"));
        assert_eq!(text(&attrs, AttributeField::Ethnicity).as_deref(), Some("3"));
        assert_eq!(number(&attrs, AttributeField::Age), 60.0);
        assert_eq!(number(&attrs, AttributeField::TotalCholesterol), 240.0);
        assert_eq!(number(&attrs, AttributeField::HdlCholesterol), 40.0);
        assert_eq!(number(&attrs, AttributeField::SystolicBp), 150.0);
        assert_eq!(number(&attrs, AttributeField::Calcification), 300.0);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        assert!(matches!(
            QueryIntake::parse("https://exa mple.org/?age=50"),
            Err(IntakeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_bare_query_with_aliases() {
        let attrs = QueryIntake::parse("?sex=F&ethnicity=Latino&calc=12&tchol=180&smoke=Y&fh=true&statin=0")
            .expect("parse")
            .attributes();
        assert_eq!(text(&attrs, AttributeField::Gender).as_deref(), Some("female"));
        assert_eq!(text(&attrs, AttributeField::Ethnicity).as_deref(), Some("4"));
        assert_eq!(number(&attrs, AttributeField::Calcification), 12.0);
        assert_eq!(number(&attrs, AttributeField::TotalCholesterol), 180.0);
        assert_eq!(text(&attrs, AttributeField::Smoking).as_deref(), Some("yes"));
        assert_eq!(text(&attrs, AttributeField::FamilyHistory).as_deref(), Some("yes"));
        assert_eq!(text(&attrs, AttributeField::LipidMedication).as_deref(), Some("no"));
        assert!(attrs.get(AttributeField::Diabetes).is_none());
    }

    #[test]
    fn test_out_of_range_values_keep_defaults() {
        let attrs = QueryIntake::parse("age=30&cac=5000&tc=50&hdl=150&sbp=250")
            .expect("parse")
            .attributes();
        assert_eq!(attrs, defaults());
    }

    #[test]
    fn test_integer_prefix_parsing() {
        let attrs = QueryIntake::parse("age=60.9&sbp=130mmHg&hdl=abc")
            .expect("parse")
            .attributes();
        assert_eq!(number(&attrs, AttributeField::Age), 60.0);
        assert_eq!(number(&attrs, AttributeField::SystolicBp), 130.0);
        assert_eq!(number(&attrs, AttributeField::HdlCholesterol), 50.0);
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let attrs = QueryIntake::parse("smoking=no&smoke=yes&gender=m&sex=f")
            .expect("parse")
            .attributes();
        assert_eq!(text(&attrs, AttributeField::Smoking).as_deref(), Some("no"));
        assert_eq!(text(&attrs, AttributeField::Gender).as_deref(), Some("male"));
    }

    #[test]
    fn test_unrecognized_flag_falls_through_to_alias() {
        let attrs = QueryIntake::parse("smoking=maybe&smoke=yes")
            .expect("parse")
            .attributes();
        assert_eq!(text(&attrs, AttributeField::Smoking).as_deref(), Some("yes"));
    }

    #[test]
    fn test_bp_alias_is_shared() {
        // A pressure reading sets systolic BP and is not a yes/no answer.
        let attrs = QueryIntake::parse("bp=135").expect("parse").attributes();
        assert_eq!(number(&attrs, AttributeField::SystolicBp), 135.0);
        assert!(attrs.get(AttributeField::HypertensionMedication).is_none());

        // A yes/no answer sets the medication flag and is not a valid pressure.
        let attrs = QueryIntake::parse("bp=1").expect("parse").attributes();
        assert_eq!(
            text(&attrs, AttributeField::HypertensionMedication).as_deref(),
            Some("yes")
        );
        assert_eq!(number(&attrs, AttributeField::SystolicBp), 120.0);
    }

    #[test]
    fn test_unknown_categories_ignored() {
        let attrs = QueryIntake::parse("gender=x&race=martian&diabetes=perhaps")
            .expect("parse")
            .attributes();
        assert_eq!(attrs, defaults());
    }

    #[test]
    fn test_collect_through_port() {
        let intake = QueryIntake::parse("age=50").expect("parse");
        assert_eq!(intake.source(), "query");
        let attrs = intake.collect().expect("collect");
        assert_eq!(number(&attrs, AttributeField::Age), 50.0);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7x"), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("x1"), None);
        assert_eq!(parse_leading_int("-"), None);
    }
}
