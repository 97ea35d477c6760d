//! PHP-native coverage artifacts.
//!
//! PHPUnit and friends persist coverage either as a PHP script (an array
//! literal, or a script feeding data to a coverage object) or as the output
//! of `serialize()`. Both decode into a [`PhpValue`] tree first and are then
//! reduced to a [`CoverageMap`].
//!
//! Raw PHPUnit data maps every executable line to the list of tests that hit
//! it, so the hit count of a line is the length of that list. Scripts that
//! return an array with a `coverage` key already carry counts and are used
//! as they are.

mod literal;
mod serialized;
mod value;

use self::value::{PhpKey, PhpValue};

use self::literal::ScriptPayload;
use super::detect::ParseError;
use super::types::{CoverageMap, FormatHint, LineCount, LineMap};
use once_cell::sync::Lazy;
use regex::Regex;

/// Serialized field holding the per-file data inside a larger snapshot.
static COVERAGE_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r#"s:\d+:"coverage";"#).unwrap());

/// Executable PHP script returning or setting coverage data.
pub(crate) fn parse_script(content: &str, hint: &FormatHint) -> Result<CoverageMap, ParseError> {
    if !hint.is("php") && !hint.is("cov") {
        return Err(ParseError::NotApplicable);
    }

    match literal::load_script(content)? {
        ScriptPayload::Snapshot(data) => normalize_raw(unwrap_snapshot(&data)),
        ScriptPayload::Literal(value) => match value.get("coverage") {
            Some(coverage) => direct_counts(coverage),
            None => normalize_raw(unwrap_snapshot(&value)),
        },
    }
}

/// Output of PHP's `serialize()`, either the whole document or, failing
/// that, the value following a serialized `"coverage"` field.
pub(crate) fn parse_serialized(content: &str, _hint: &FormatHint) -> Result<CoverageMap, ParseError> {
    let whole = serialized::decode(content).and_then(|value| normalize_raw(unwrap_snapshot(&value)));
    match whole {
        Ok(map) if !map.is_empty() => Ok(map),
        Ok(_) => extract_coverage_field(content),
        Err(e) => {
            log::trace!("Whole-document unserialize failed: {}", e);
            extract_coverage_field(content)
        }
    }
}

fn extract_coverage_field(content: &str) -> Result<CoverageMap, ParseError> {
    if !content.contains("a:") && !content.contains("O:") {
        return Err(ParseError::NotApplicable);
    }
    let field = COVERAGE_FIELD
        .find(content)
        .ok_or_else(|| ParseError::malformed("no serialized coverage field"))?;
    let value = serialized::decode_prefix(&content[field.end()..])?;
    normalize_raw(unwrap_snapshot(&value))
}

/// Dig the per-file line data out of a coverage object.
///
/// `CodeCoverage` keeps it in its `data` property; newer versions wrap it
/// once more in a `ProcessedCodeCoverageData` with a `lineCoverage` array.
fn unwrap_snapshot(value: &PhpValue) -> &PhpValue {
    match value {
        PhpValue::Object { .. } => {
            if let Some(data) = value.property("data") {
                unwrap_snapshot(data)
            } else if let Some(lines) = value.property("lineCoverage") {
                lines
            } else {
                value
            }
        }
        PhpValue::Array(_) => match value.get("codeCoverage") {
            Some(inner @ PhpValue::Object { .. }) => unwrap_snapshot(inner),
            _ => value,
        },
        _ => value,
    }
}

/// Reduce raw `file => line => data` entries to hit counts.
///
/// A list counts its entries, null marks a non-executable line and any
/// other scalar counts as one hit when truthy. Files whose data is not an
/// array and lines without a numeric key are skipped.
fn normalize_raw(data: &PhpValue) -> Result<CoverageMap, ParseError> {
    let entries = data
        .as_array()
        .ok_or_else(|| ParseError::malformed("coverage data is not an array"))?;

    let mut coverage = CoverageMap::new();
    for (path, file) in entries {
        let Some(lines) = file.as_array() else {
            log::debug!("Skipping {}: line data is not an array", path.to_key_string());
            continue;
        };
        coverage.insert(path.to_key_string(), line_map(lines, raw_line_count));
    }
    Ok(coverage)
}

/// `coverage => file => line => count`, counts taken as given.
fn direct_counts(coverage: &PhpValue) -> Result<CoverageMap, ParseError> {
    let entries = coverage
        .as_array()
        .ok_or_else(|| ParseError::malformed("`coverage` is not an array"))?;

    Ok(entries
        .iter()
        .filter_map(|(path, file)| {
            file.as_array()
                .map(|lines| (path.to_key_string(), line_map(lines, direct_line_count)))
        })
        .collect())
}

fn line_map(lines: &[(PhpKey, PhpValue)], count: fn(&PhpValue) -> LineCount) -> LineMap {
    lines
        .iter()
        .filter_map(|(line, data)| Some((line.as_line_number()?, count(data))))
        .collect()
}

fn raw_line_count(data: &PhpValue) -> LineCount {
    match data {
        PhpValue::Null => None,
        PhpValue::Array(tests) => Some(tests.len() as u64),
        other => Some(u64::from(other.is_truthy())),
    }
}

fn direct_line_count(data: &PhpValue) -> LineCount {
    match data {
        PhpValue::Null => None,
        PhpValue::Bool(hit) => Some(u64::from(*hit)),
        PhpValue::Int(n) => Some((*n).max(0) as u64),
        PhpValue::Float(f) => Some(f.max(0.0) as u64),
        PhpValue::Str(s) => Some(s.trim().parse::<u64>().unwrap_or(0)),
        PhpValue::Array(tests) => Some(tests.len() as u64),
        PhpValue::Object { .. } => Some(1),
    }
}
