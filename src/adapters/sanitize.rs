//! Log sanitization for clinical values.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`], which redacts:
//! - Patient attribute values written as `key=value` or `key: value`
//!   (canonical field names and the query-string aliases)
//! - Raw query strings carrying such parameters
//! - Email addresses
//!
//! Risk results are not redacted; they carry no patient identity on their own.
//!
//! Sanitizing strings is a fallback. Code should avoid formatting raw inputs
//! into log messages in the first place.
//!
//! # Performance
//!
//! Each call scans at most `max_bytes` of input; longer lines are cut at a
//! character boundary and marked `[TRUNCATED]`.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Default cap on the bytes sanitized per line.
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Compiled redaction patterns.
static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Field names and aliases whose values count as patient data.
const CLINICAL_KEYS: &str = "gender|sex|age|ethnicity|race|diabetes|smoking|smoke|familyHistory|family_history|family|fh|totalCholesterol|total_cholesterol|tchol|tc|hdlCholesterol|hdl_cholesterol|hdl|systolicBP|systolic_bp|sbp|bp|lipidMedication|lipid_medication|lipid|statin|hypertensionMedication|hypertension_medication|htn|calcification|calc|cac";

struct Pattern {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Pattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(String, &'static str)> = vec![
            // Query strings: everything after '?' up to whitespace.
            (
                format!(r"\?(?:[^\s]*&)?(?:{CLINICAL_KEYS})=[^\s]*"),
                "?[REDACTED-QUERY]",
            ),
            // key=value, key: value, "key": value
            (
                format!(r#"(?i)\b("?)({CLINICAL_KEYS})("?\s*[:=]\s*)("[^"]*"|[^\s,;&}}\]]+)"#),
                "$1$2$3[REDACTED]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str())).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Pattern {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Sanitize a string with the default size cap.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, DEFAULT_SANITIZE_MAX_BYTES)
}

/// Sanitize at most `max_bytes` of `input`.
#[must_use]
pub fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M, max_bytes: usize) -> Self {
        Self {
            inner,
            max_bytes: max_bytes.max(1),
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize_with_limit(&String::from_utf8_lossy(&line), self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter writing a huge line with no newline must not buffer unboundedly.
        if self.buffer.len() > self.max_bytes.saturating_mul(2) {
            let s = String::from_utf8_lossy(&self.buffer).into_owned();
            let sanitized = sanitize_with_limit(&s, self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let s = String::from_utf8_lossy(&self.buffer).into_owned();
            let sanitized = sanitize_with_limit(&s, self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
            max_bytes: self.max_bytes,
        }
    }
}
