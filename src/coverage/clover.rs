//! Clover XML coverage reports.
//!
//! Only the parts of the document that carry line coverage are read: every
//! `<file name="…">` element and the `<line num="…" count="…" type="…"/>`
//! elements inside it. Lines whose `type` is not `stmt` (method and
//! conditional markers) are skipped.

use super::detect::ParseError;
use super::types::{CoverageMap, FormatHint, LineMap};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static FILE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<file\b").unwrap());

static FILE_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<file\b([^>]*?)(?:/>|>(.*?)</file\s*>)").unwrap()
});

static LINE_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<line\b([^>]*?)/?>").unwrap());

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap()
});

/// Parse a Clover XML document.
pub(crate) fn parse(content: &str, hint: &FormatHint) -> Result<CoverageMap, ParseError> {
    if !hint.is("xml") && !content.contains("<?xml") {
        return Err(ParseError::NotApplicable);
    }

    let opened = FILE_OPEN.find_iter(content).count();
    let elements: Vec<_> = FILE_ELEMENT.captures_iter(content).collect();
    if elements.is_empty() {
        return Err(ParseError::malformed("no <file> elements"));
    }
    if elements.len() != opened {
        return Err(ParseError::malformed("unterminated <file> element"));
    }

    let mut coverage = CoverageMap::new();
    for element in elements {
        let attributes = parse_attributes(element.get(1).map_or("", |m| m.as_str()));
        let Some(name) = attributes.get("name") else {
            return Err(ParseError::malformed("<file> element without a name"));
        };

        let body = element.get(2).map_or("", |m| m.as_str());
        coverage.insert(name.clone(), parse_lines(body));
    }

    Ok(coverage)
}

fn parse_lines(body: &str) -> LineMap {
    LINE_ELEMENT
        .captures_iter(body)
        .filter_map(|line| {
            let attributes = parse_attributes(line.get(1).map_or("", |m| m.as_str()));
            if attributes.get("type").map(String::as_str) != Some("stmt") {
                return None;
            }
            let num = attributes.get("num")?.trim().parse::<u32>().ok()?;
            let count = attributes
                .get("count")
                .and_then(|c| c.trim().parse::<i64>().ok())
                .unwrap_or(0)
                .max(0) as u64;
            Some((num, Some(count)))
        })
        .collect()
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|attr| {
            let value = attr.get(2).or_else(|| attr.get(3)).map_or("", |m| m.as_str());
            (attr[1].to_string(), unescape(value))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const CLOVER: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <coverage generated="1700000000">
          <project timestamp="1700000000">
            <file name="/app/src/Domain/User.php">
              <class name="App\Domain\User" namespace="App\Domain">
                <metrics complexity="2" methods="2" coveredmethods="1"/>
              </class>
              <line num="10" type="method" name="getName" visibility="public" complexity="1" crap="1" count="3"/>
              <line num="12" type="stmt" count="3"/>
              <line num="13" type="stmt" count="0"/>
              <line num="15" type="cond" truecount="1" falsecount="0" count="1"/>
              <metrics loc="20" ncloc="15" statements="2" coveredstatements="1"/>
            </file>
            <package name="Infra">
              <file name="/app/src/Infra/R&amp;D.php">
                <line num="5" type="stmt" count="2"/>
              </file>
            </package>
          </project>
        </coverage>
    "#};

    #[test]
    fn test_parse_clover_keeps_statements_only() {
        let map = parse(CLOVER, &FormatHint::none()).unwrap();
        assert_eq!(map.len(), 2);

        let user = map.get("/app/src/Domain/User.php").unwrap();
        assert_eq!(user.len(), 2);
        assert_eq!(user.get(&12), Some(&Some(3)));
        assert_eq!(user.get(&13), Some(&Some(0)));
        assert!(user.get(&10).is_none());
        assert!(user.get(&15).is_none());
    }

    #[test]
    fn test_parse_clover_unescapes_names() {
        let map = parse(CLOVER, &FormatHint::none()).unwrap();
        assert!(map.get("/app/src/Infra/R&D.php").is_some());
    }

    #[test]
    fn test_not_applicable_without_marker_or_hint() {
        assert_eq!(
            parse("<coverage></coverage>", &FormatHint::none()),
            Err(ParseError::NotApplicable)
        );
    }

    #[test]
    fn test_hint_enables_parsing_without_declaration() {
        let xml = r#"<coverage><file name="a.php"><line num="1" type="stmt" count="1"/></file></coverage>"#;
        let map = parse(xml, &FormatHint::from_extension("xml")).unwrap();
        assert_eq!(map.get("a.php").map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_unterminated_file_is_malformed() {
        let xml = r#"<?xml version="1.0"?><coverage><file name="a.php"><line num="1" type="stmt" count="1"/>"#;
        assert!(matches!(
            parse(xml, &FormatHint::none()),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_self_closing_file_has_no_lines() {
        let xml = r#"<?xml version="1.0"?><coverage><file name="empty.php"/></coverage>"#;
        let map = parse(xml, &FormatHint::none()).unwrap();
        assert_eq!(map.get("empty.php"), Some(&LineMap::new()));
    }
}
