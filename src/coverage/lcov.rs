//! LCOV tracefiles (`lcov --capture`, `phpunit --coverage-lcov`, ...).
//!
//! Only `SF`, `DA` and `end_of_record` matter here. A file listed by more
//! than one record has its line counts summed.

use super::detect::ParseError;
use super::types::{CoverageMap, FormatHint, LineMap};
use ::lcov::{Reader, Record};

pub(crate) fn parse(content: &str, hint: &FormatHint) -> Result<CoverageMap, ParseError> {
    let sniffed = content.contains("SF:") && content.contains("end_of_record");
    if !hint.is("info") && !hint.is("lcov") && !sniffed {
        return Err(ParseError::NotApplicable);
    }

    let mut coverage = CoverageMap::new();
    let mut current: Option<(String, LineMap)> = None;

    for record in Reader::new(content.as_bytes()) {
        let record = record.map_err(|e| ParseError::malformed(format!("LCOV record: {}", e)))?;

        match record {
            Record::SourceFile { path } => {
                if let Some((file, lines)) = current.take() {
                    coverage.merge(file, lines);
                }
                current = Some((path.to_string_lossy().into_owned(), LineMap::new()));
            }
            Record::LineData { line, count, .. } => {
                if let Some((_, lines)) = current.as_mut() {
                    let entry = lines.entry(line).or_insert(Some(0));
                    *entry = Some(entry.unwrap_or(0).saturating_add(count));
                }
            }
            Record::EndOfRecord => {
                if let Some((file, lines)) = current.take() {
                    coverage.merge(file, lines);
                }
            }
            _ => {}
        }
    }

    // Tolerate a missing final end_of_record.
    if let Some((file, lines)) = current.take() {
        coverage.merge(file, lines);
    }

    Ok(coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_tracefile() {
        let info = indoc! {"
            TN:
            SF:/app/src/Service/Mailer.php
            FN:12,send
            FNDA:3,send
            DA:12,3
            DA:13,0
            LF:2
            LH:1
            end_of_record
            SF:/app/src/Service/Queue.php
            DA:4,1
            end_of_record
        "};
        let map = parse(info, &FormatHint::none()).unwrap();
        assert_eq!(map.len(), 2);

        let mailer = map.get("/app/src/Service/Mailer.php").unwrap();
        assert_eq!(mailer.get(&12), Some(&Some(3)));
        assert_eq!(mailer.get(&13), Some(&Some(0)));
    }

    #[test]
    fn test_repeated_records_are_summed() {
        let info = indoc! {"
            SF:a.php
            DA:1,1
            DA:2,0
            end_of_record
            SF:a.php
            DA:1,2
            DA:3,0
            end_of_record
        "};
        let map = parse(info, &FormatHint::from_extension("info")).unwrap();
        let lines = map.get("a.php").unwrap();
        assert_eq!(lines.get(&1), Some(&Some(3)));
        assert_eq!(lines.get(&2), Some(&Some(0)));
        assert_eq!(lines.get(&3), Some(&Some(0)));
    }

    #[test]
    fn test_other_content_is_not_applicable() {
        assert_eq!(
            parse(r#"{"a.php": {}}"#, &FormatHint::none()),
            Err(ParseError::NotApplicable)
        );
    }

    #[test]
    fn test_repeated_line_counts_saturate() {
        let info = indoc! {"
            SF:src/Hot.php
            DA:7,18446744073709551615
            DA:7,5
            end_of_record
        "};
        let map = parse(info, &FormatHint::none()).unwrap();
        assert_eq!(map.get("src/Hot.php").unwrap().get(&7), Some(&Some(u64::MAX)));
    }
}
