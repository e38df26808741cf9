//! Command-line parsing for the `mesa-chd` binary.

use crate::adapters::fields::FieldArgsIntake;
use crate::adapters::json::JsonIntake;
use crate::adapters::query::QueryIntake;
use crate::config::OutputFormat;
use crate::ports::PatientIntake;
use crate::{MesaError, Result};

pub const USAGE: &str = "\
Usage:
  mesa-chd [options] --query <url-or-query>
  mesa-chd [options] --json <path|->
  mesa-chd [options] key=value [key=value ...]

Options:
  --format <text|json>   Output format (default: text, or MESA_OUTPUT)
  --result-only          With --format json, print only the result record
  -h, --help             Show this help

Fields: gender, age, ethnicity (1=caucasian 2=chinese 3=black 4=hispanic),
        diabetes, smoking, familyHistory, lipidMedication, hypertensionMedication (yes/no),
        totalCholesterol, hdlCholesterol (mg/dL), systolicBP (mmHg), calcification (Agatston)";

/// Parsed command line.
pub struct CliArgs {
    pub intake: Box<dyn PatientIntake>,
    /// Overrides the configured output format
    pub format: Option<OutputFormat>,
    pub result_only: bool,
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| MesaError::Usage(format!("{flag} requires a value")))
}

/// Parse arguments (without the program name).
///
/// Returns `Ok(None)` when usage should be printed: no arguments, or `-h`/`--help`.
///
/// # Errors
/// Returns `MesaError::Usage` for unknown options, missing option values, or
/// field arguments mixed with `--query`/`--json`; intake and format errors pass through.
pub fn parse_args<I>(args: I) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut format = None;
    let mut result_only = false;
    let mut source: Option<Box<dyn PatientIntake>> = None;
    let mut fields = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--format" => format = Some(value_for("--format", iter.next())?.parse()?),
            "--result-only" => result_only = true,
            "--query" => {
                let value = value_for("--query", iter.next())?;
                source = Some(Box::new(QueryIntake::parse(&value)?));
            }
            "--json" => {
                let value = value_for("--json", iter.next())?;
                source = Some(Box::new(JsonIntake::from_path(value)));
            }
            other if other.starts_with("--") => {
                return Err(MesaError::Usage(format!("unknown option '{other}'")));
            }
            _ => fields.push(arg),
        }
    }

    let intake: Box<dyn PatientIntake> = match source {
        Some(_) if !fields.is_empty() => {
            return Err(MesaError::Usage(
                "field arguments cannot be combined with --query or --json".to_string(),
            ));
        }
        Some(source) => source,
        None if fields.is_empty() => return Ok(None),
        None => Box::new(FieldArgsIntake::parse(&fields)?),
    };

    Ok(Some(CliArgs {
        intake,
        format,
        result_only,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<CliArgs>> {
        parse_args(args.iter().map(|a| (*a).to_string()))
    }

    #[test]
    fn test_usage_requests() {
        assert!(parse(&[]).expect("parse").is_none());
        assert!(parse(&["-h"]).expect("parse").is_none());
        assert!(parse(&["age=50", "--help"]).expect("parse").is_none());
        assert!(parse(&["--format", "json"]).expect("parse").is_none());
    }

    #[test]
    fn test_field_arguments() {
        let cli = parse(&["gender=male", "age=60"]).expect("parse").expect("args");
        assert_eq!(cli.intake.source(), "fields");
        assert_eq!(cli.format, None);
        assert!(!cli.result_only);

        let features = cli.intake.collect().expect("collect").normalize();
        assert_eq!(features.gender, 1.0);
        assert!((features.age - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_query_and_json_sources() {
        let cli = parse(&["--query", "?sex=m&age=60"]).expect("parse").expect("args");
        assert_eq!(cli.intake.source(), "query");

        let cli = parse(&["--json", "-"]).expect("parse").expect("args");
        assert_eq!(cli.intake.source(), "json-stdin");
    }

    #[test]
    fn test_format_and_result_only() {
        let cli = parse(&["--format", "JSON", "--result-only", "age=50"])
            .expect("parse")
            .expect("args");
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.result_only);

        let err = parse(&["--format", "xml", "age=50"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Config(_)));

        let err = parse(&["age=50", "--format"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Usage(_)));
    }

    #[test]
    fn test_mixed_sources_rejected() {
        let err = parse(&["--query", "age=50", "sbp=140"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Usage(_)));

        let err = parse(&["age=50", "--json", "patient.json"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Usage(_)));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse(&["--verbose", "age=50"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Usage(msg) if msg.contains("--verbose")));
    }

    #[test]
    fn test_malformed_field_argument() {
        let err = parse(&["age"]).err().expect("Should fail");
        assert!(matches!(err, MesaError::Intake(_)));
    }
}
