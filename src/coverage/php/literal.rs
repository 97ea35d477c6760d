//! Loader for PHP coverage scripts.
//!
//! Coverage exporters write plain PHP files that either hand an array to a
//! coverage object (`$coverage->setData(array(...))`) or `return` a value:
//! an array literal, or `unserialize(...)` of a string or heredoc. Nothing
//! is executed; the script is tokenized and the one interesting expression
//! is parsed into a [`PhpValue`].

use super::serialized;
use super::value::{PhpKey, PhpValue, MAX_NESTING};
use crate::coverage::detect::ParseError;
use std::collections::HashMap;

/// What a coverage script hands back.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScriptPayload {
    /// Argument of `->setData(...)`: raw per-file, per-line data
    Snapshot(PhpValue),
    /// Operand of the first `return` statement
    Literal(PhpValue),
}

pub(crate) fn load_script(source: &str) -> Result<ScriptPayload, ParseError> {
    let tokens = tokenize(source)?;

    let set_data = tokens.windows(3).position(|w| {
        w[0] == Token::ObjectArrow && w[1].is_ident("setData") && w[2] == Token::LParen
    });
    if let Some(start) = set_data {
        let mut parser = Parser::at(&tokens, start + 3);
        return parser.value().map(ScriptPayload::Snapshot);
    }

    let start = tokens
        .iter()
        .position(|t| t.is_ident("return"))
        .ok_or_else(|| ParseError::malformed("script has no return statement"))?;
    let mut parser = Parser::at(&tokens, start + 1);
    parser.value().map(ScriptPayload::Literal)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Int(i64),
    Float(f64),
    Ident(String),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    DoubleArrow,
    ObjectArrow,
    Semicolon,
    Other(char),
}

impl Token {
    /// Case-insensitive keyword match; a leading namespace separator is ignored.
    fn is_ident(&self, name: &str) -> bool {
        matches!(self, Token::Ident(id) if id.trim_start_matches('\\').eq_ignore_ascii_case(name))
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            c if c.is_whitespace() => i += 1,
            '<' if starts_with(&chars, i, "<?php") => i += 5,
            '<' if starts_with(&chars, i, "<<<") => {
                let (body, end) = heredoc(&chars, i + 3)?;
                tokens.push(Token::Str(body));
                i = end;
            }
            '?' if next == Some('>') => i += 2,
            '#' => i = skip_line(&chars, i),
            '/' if next == Some('/') => i = skip_line(&chars, i),
            '/' if next == Some('*') => {
                i = find(&chars, i + 2, "*/")
                    .map(|end| end + 2)
                    .ok_or_else(|| ParseError::malformed("unterminated comment"))?;
            }
            '\'' => {
                let (s, end) = single_quoted(&chars, i + 1)?;
                tokens.push(Token::Str(s));
                i = end;
            }
            '"' => {
                let (s, end) = double_quoted(&chars, i + 1)?;
                tokens.push(Token::Str(s));
                i = end;
            }
            '=' if next == Some('>') => {
                tokens.push(Token::DoubleArrow);
                i += 2;
            }
            '-' if next == Some('>') => {
                tokens.push(Token::ObjectArrow);
                i += 2;
            }
            '-' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let (token, end) = number(&chars, i + 1, true)?;
                tokens.push(token);
                i = end;
            }
            c if c.is_ascii_digit() => {
                let (token, end) = number(&chars, i, false)?;
                tokens.push(token);
                i = end;
            }
            c if is_ident_start(c) => {
                let end = (i..chars.len())
                    .find(|&j| !is_ident_char(chars[j]))
                    .unwrap_or(chars.len());
                tokens.push(Token::Ident(chars[i..end].iter().collect()));
                i = end;
            }
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            ';' => {
                tokens.push(Token::Semicolon);
                i += 1;
            }
            other => {
                tokens.push(Token::Other(other));
                i += 1;
            }
        }
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '\\'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\\'
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut j = at;
    for p in pattern.chars() {
        match chars.get(j) {
            Some(c) if c.eq_ignore_ascii_case(&p) => j += 1,
            _ => return false,
        }
    }
    true
}

fn find(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&j| starts_with(chars, j, pattern))
}

fn skip_line(chars: &[char], from: usize) -> usize {
    (from..chars.len())
        .find(|&j| chars[j] == '\n')
        .unwrap_or(chars.len())
}

fn single_quoted(chars: &[char], mut i: usize) -> Result<(String, usize), ParseError> {
    let mut out = String::new();
    while let Some(&c) = chars.get(i) {
        match c {
            '\'' => return Ok((out, i + 1)),
            '\\' if matches!(chars.get(i + 1), Some('\'') | Some('\\')) => {
                out.push(chars[i + 1]);
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Err(ParseError::malformed("unterminated string literal"))
}

fn double_quoted(chars: &[char], mut i: usize) -> Result<(String, usize), ParseError> {
    let mut out = String::new();
    while let Some(&c) = chars.get(i) {
        match c {
            '"' => return Ok((out, i + 1)),
            '\\' => {
                let escaped = match chars.get(i + 1) {
                    Some('n') => Some('\n'),
                    Some('t') => Some('\t'),
                    Some('r') => Some('\r'),
                    Some('0') => Some('\0'),
                    Some(&(e @ ('\\' | '"' | '$'))) => Some(e),
                    _ => None,
                };
                match escaped {
                    Some(e) => {
                        out.push(e);
                        i += 2;
                    }
                    None => {
                        out.push('\\');
                        i += 1;
                    }
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Err(ParseError::malformed("unterminated string literal"))
}

/// `<<<TAG`, `<<<"TAG"` or `<<<'TAG'` followed by a newline; the body runs
/// until a line that starts (after indentation) with the tag.
fn heredoc(chars: &[char], mut i: usize) -> Result<(String, usize), ParseError> {
    while chars.get(i).is_some_and(|c| *c == ' ' || *c == '\t') {
        i += 1;
    }
    let quote = match chars.get(i) {
        Some(&(q @ ('\'' | '"'))) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };
    let tag_start = i;
    while chars.get(i).is_some_and(|c| c.is_alphanumeric() || *c == '_') {
        i += 1;
    }
    let tag: String = chars[tag_start..i].iter().collect();
    if tag.is_empty() {
        return Err(ParseError::malformed("heredoc without a label"));
    }
    if quote.is_some() {
        i += 1;
    }
    i = skip_line(chars, i) + 1;

    let mut lines: Vec<String> = Vec::new();
    while i < chars.len() {
        let end = skip_line(chars, i);
        let line: String = chars[i..end].iter().collect();
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(tag.as_str()) {
            if !after.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
                let consumed = line.len() - after.len();
                let close = i + line[..consumed].chars().count();
                return Ok((lines.join("\n"), close));
            }
        }
        lines.push(line);
        i = end + 1;
    }
    Err(ParseError::malformed(format!("unterminated heredoc {}", tag)))
}

fn number(chars: &[char], start: usize, negative: bool) -> Result<(Token, usize), ParseError> {
    let end = (start..chars.len())
        .find(|&j| !(chars[j].is_ascii_alphanumeric() || chars[j] == '.' || chars[j] == '_'))
        .unwrap_or(chars.len());
    let raw: String = chars[start..end].iter().filter(|c| **c != '_').collect();
    let sign: i64 = if negative { -1 } else { 1 };

    let lower = raw.to_ascii_lowercase();
    let radix = if let Some(hex) = lower.strip_prefix("0x") {
        Some((hex.to_string(), 16))
    } else if let Some(bin) = lower.strip_prefix("0b") {
        Some((bin.to_string(), 2))
    } else {
        None
    };

    let token = if let Some((digits, radix)) = radix {
        i64::from_str_radix(&digits, radix)
            .map(|n| Token::Int(sign * n))
            .map_err(|_| ParseError::malformed(format!("invalid number '{}'", raw)))?
    } else if let Ok(n) = raw.parse::<i64>() {
        Token::Int(sign * n)
    } else {
        raw.parse::<f64>()
            .map(|f| Token::Float(if negative { -f } else { f }))
            .map_err(|_| ParseError::malformed(format!("invalid number '{}'", raw)))?
    };
    Ok((token, end))
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn at(tokens: &'t [Token], pos: usize) -> Self {
        Self {
            tokens,
            pos,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Result<&'t Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| ParseError::malformed("unexpected end of script"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        let token = self.advance()?;
        if token == expected {
            Ok(())
        } else {
            Err(ParseError::malformed(format!(
                "expected {:?}, found {:?}",
                expected, token
            )))
        }
    }

    fn value(&mut self) -> Result<PhpValue, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::malformed(format!(
                "expression nested deeper than {}",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        let value = self.expression();
        self.depth -= 1;
        value
    }

    fn expression(&mut self) -> Result<PhpValue, ParseError> {
        match self.advance()? {
            Token::Str(s) => Ok(PhpValue::Str(s.clone())),
            Token::Int(n) => Ok(PhpValue::Int(*n)),
            Token::Float(f) => Ok(PhpValue::Float(*f)),
            Token::LBracket => self.entries(&Token::RBracket),
            // Casts such as `(array)` are transparent here.
            Token::LParen if matches!(self.peek(), Some(Token::Ident(_))) => {
                self.advance()?;
                self.expect(&Token::RParen)?;
                self.value()
            }
            token @ Token::Ident(_) => {
                if token.is_ident("null") {
                    Ok(PhpValue::Null)
                } else if token.is_ident("true") {
                    Ok(PhpValue::Bool(true))
                } else if token.is_ident("false") {
                    Ok(PhpValue::Bool(false))
                } else if token.is_ident("array") {
                    self.expect(&Token::LParen)?;
                    self.entries(&Token::RParen)
                } else if token.is_ident("unserialize") {
                    self.expect(&Token::LParen)?;
                    let Token::Str(payload) = self.advance()? else {
                        return Err(ParseError::malformed("unserialize() without a string"));
                    };
                    let value = serialized::decode(payload)?;
                    self.expect(&Token::RParen)?;
                    Ok(value)
                } else {
                    Err(ParseError::malformed(format!(
                        "unsupported expression {:?}",
                        token
                    )))
                }
            }
            other => Err(ParseError::malformed(format!(
                "unexpected token {:?}",
                other
            ))),
        }
    }

    fn entries(&mut self, close: &Token) -> Result<PhpValue, ParseError> {
        let mut entries: Vec<(PhpKey, PhpValue)> = Vec::new();
        let mut positions: HashMap<PhpKey, usize> = HashMap::new();
        let mut next_index: i64 = 0;

        loop {
            if self.peek() == Some(close) {
                self.advance()?;
                break;
            }

            let first = self.value()?;
            let (key, value) = if self.peek() == Some(&Token::DoubleArrow) {
                self.advance()?;
                (array_key(first)?, self.value()?)
            } else {
                (PhpKey::Int(next_index), first)
            };

            if let PhpKey::Int(n) = key {
                next_index = next_index.max(n.saturating_add(1));
            }
            // Later duplicates overwrite in place.
            match positions.get(&key) {
                Some(&at) => entries[at].1 = value,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }

            match self.advance()? {
                Token::Comma => {}
                token if token == close => break,
                other => {
                    return Err(ParseError::malformed(format!(
                        "expected ',' in array, found {:?}",
                        other
                    )))
                }
            }
        }

        Ok(PhpValue::Array(entries))
    }
}

/// PHP key coercion: decimal strings become integers.
fn array_key(value: PhpValue) -> Result<PhpKey, ParseError> {
    match value {
        PhpValue::Int(n) => Ok(PhpKey::Int(n)),
        PhpValue::Str(s) => match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Ok(PhpKey::Int(n)),
            _ => Ok(PhpKey::Str(s)),
        },
        PhpValue::Bool(b) => Ok(PhpKey::Int(i64::from(b))),
        PhpValue::Float(f) => Ok(PhpKey::Int(f.trunc() as i64)),
        PhpValue::Null => Ok(PhpKey::Str(String::new())),
        other => Err(ParseError::malformed(format!(
            "illegal array key {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn literal(source: &str) -> PhpValue {
        match load_script(source).unwrap() {
            ScriptPayload::Literal(value) => value,
            other => panic!("expected a literal, got {:?}", other),
        }
    }

    #[test]
    fn test_short_array_literal() {
        let value = literal("<?php return ['src/A.php' => [10 => 1, 11 => null, 12 => -1]];");
        let file = value.get("src/A.php").unwrap().as_array().unwrap();
        assert_eq!(file.len(), 3);
        assert_eq!(file[0], (PhpKey::Int(10), PhpValue::Int(1)));
        assert_eq!(file[1].1, PhpValue::Null);
        assert_eq!(file[2].1, PhpValue::Int(-1));
    }

    #[test]
    fn test_long_array_syntax_with_comments_and_trailing_commas() {
        let value = literal(indoc! {r#"
            <?php
            // generated
            # by a tool
            /* block
               comment */
            return ARRAY(
                "coverage" => array(
                    'src/B.php' => array(3 => TRUE, 4 => false,),
                ),
            );
        "#});
        let coverage = value.get("coverage").unwrap();
        let file = coverage.get("src/B.php").unwrap().as_array().unwrap();
        assert_eq!(file[0].1, PhpValue::Bool(true));
        assert_eq!(file[1].1, PhpValue::Bool(false));
    }

    #[test]
    fn test_implicit_keys_and_numeric_string_keys() {
        let value = literal("<?php return ['a', '5' => 'b', 'c', '05' => 'd'];");
        let entries = value.as_array().unwrap();
        assert_eq!(entries[0].0, PhpKey::Int(0));
        assert_eq!(entries[1].0, PhpKey::Int(5));
        assert_eq!(entries[2].0, PhpKey::Int(6));
        assert_eq!(entries[3].0, PhpKey::Str("05".into()));
    }

    #[test]
    fn test_escaped_strings() {
        let value = literal(r#"<?php return ['it\'s' => "tab\there", 'C:\\src' => 1];"#);
        let entries = value.as_array().unwrap();
        assert_eq!(entries[0].0, PhpKey::Str("it's".into()));
        assert_eq!(entries[0].1, PhpValue::Str("tab\there".into()));
        assert_eq!(entries[1].0, PhpKey::Str("C:\\src".into()));
    }

    #[test]
    fn test_set_data_snapshot() {
        let source = indoc! {r#"
            <?php
            $coverage = new SebastianBergmann\CodeCoverage\CodeCoverage;
            $coverage->setData(array (
              '/app/src/A.php' =>
              array (
                10 =>
                array (
                  0 => 'Tests\\ATest::testIt',
                ),
                11 => NULL,
              ),
            ));
            $coverage->setTests(array());
            return $coverage;
        "#};
        let ScriptPayload::Snapshot(data) = load_script(source).unwrap() else {
            panic!("expected snapshot");
        };
        let file = data.get("/app/src/A.php").unwrap().as_array().unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(
            file[0].1,
            PhpValue::Array(vec![(
                PhpKey::Int(0),
                PhpValue::Str("Tests\\ATest::testIt".into())
            )])
        );
    }

    #[test]
    fn test_unserialize_nowdoc() {
        let source = indoc! {r#"
            <?php
            return \unserialize(<<<'END_OF_COVERAGE_SERIALIZATION'
            a:1:{s:5:"a.php";a:1:{i:1;i:1;}}
            END_OF_COVERAGE_SERIALIZATION
            );
        "#};
        let value = literal(source);
        assert!(value.get("a.php").is_some());
    }

    #[test]
    fn test_missing_return_is_malformed() {
        assert!(load_script("<?php echo 'hi';").is_err());
        assert!(load_script("This is not PHP at all").is_err());
    }

    #[test]
    fn test_unterminated_array_is_malformed() {
        assert!(load_script("<?php return ['a' => [1 => 1];").is_err());
    }

    #[test]
    fn test_deep_nesting_is_malformed() {
        let brackets = format!("<?php return {}", "[".repeat(200_000));
        assert!(matches!(load_script(&brackets), Err(ParseError::Malformed(_))));

        let casts = format!("<?php return {}[];", "(array)".repeat(200_000));
        assert!(load_script(&casts).is_err());
    }
}
