//! JSON coverage documents.
//!
//! Two shapes are accepted:
//!
//! ```text
//! {"files": {"src/A.php": {"lines": {"10": 1, "11": null}}}}   // wrapped
//! {"src/A.php": {"10": 1, "11": null}}                         // flat
//! ```
//!
//! The wrapped shape wins whenever a top-level `files` key exists.

use super::detect::ParseError;
use super::types::{CoverageMap, FormatHint, LineCount, LineMap};
use serde_json::{Map, Value};

pub(crate) fn parse(content: &str, hint: &FormatHint) -> Result<CoverageMap, ParseError> {
    if !hint.is("json") && !content.trim_start().starts_with('{') {
        return Err(ParseError::NotApplicable);
    }

    let root: Value =
        serde_json::from_str(content).map_err(|e| ParseError::malformed(e.to_string()))?;
    let Value::Object(root) = root else {
        return Err(ParseError::malformed("top-level JSON value is not an object"));
    };

    match root.get("files") {
        Some(Value::Object(files)) => Ok(parse_wrapped(files)),
        Some(_) => Err(ParseError::malformed("`files` is not an object")),
        None => Ok(root
            .into_iter()
            .map(|(path, lines)| (path, line_map(&lines)))
            .collect()),
    }
}

fn parse_wrapped(files: &Map<String, Value>) -> CoverageMap {
    files
        .iter()
        .filter_map(|(path, file)| file.get("lines").map(|lines| (path.clone(), line_map(lines))))
        .collect()
}

fn line_map(lines: &Value) -> LineMap {
    match lines {
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(line, count)| Some((line.trim().parse::<u32>().ok()?, line_count(count))))
            .collect(),
        // A list encodes sequential line keys starting at 0.
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .filter_map(|(line, count)| Some((u32::try_from(line).ok()?, line_count(count))))
            .collect(),
        _ => LineMap::new(),
    }
}

fn line_count(value: &Value) -> LineCount {
    match value {
        Value::Null => None,
        Value::Bool(hit) => Some(u64::from(*hit)),
        Value::Number(n) => Some(
            n.as_u64()
                .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
                .unwrap_or(0),
        ),
        Value::String(s) => Some(s.trim().parse::<u64>().unwrap_or(0)),
        Value::Array(tests) => Some(tests.len() as u64),
        Value::Object(tests) => Some(tests.len() as u64),
    }
}
