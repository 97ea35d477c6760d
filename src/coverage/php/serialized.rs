//! Decoder for PHP's `serialize()` format.
//!
//! Supports the subset that coverage snapshots use: null, booleans,
//! integers, floats, strings, arrays, objects and enum cases. References are
//! decoded as null since coverage data never depends on them.

use super::value::{PhpKey, PhpValue, MAX_NESTING};
use crate::coverage::detect::ParseError;

/// Decode a complete serialized value. Trailing whitespace is allowed,
/// anything else after the value is an error.
pub(crate) fn decode(input: &str) -> Result<PhpValue, ParseError> {
    let mut decoder = Decoder::new(input.trim_start().as_bytes());
    let value = decoder.value()?;
    if !decoder.rest().iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::malformed(format!(
            "trailing data at offset {}",
            decoder.pos
        )));
    }
    Ok(value)
}

/// Decode the first serialized value of `input`, ignoring what follows.
pub(crate) fn decode_prefix(input: &str) -> Result<PhpValue, ParseError> {
    Decoder::new(input.trim_start().as_bytes()).value()
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }

    fn value(&mut self) -> Result<PhpValue, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::malformed(format!(
                "nesting deeper than {} at offset {}",
                MAX_NESTING, self.pos
            )));
        }
        self.depth += 1;
        let value = self.scalar_or_compound();
        self.depth -= 1;
        value
    }

    fn scalar_or_compound(&mut self) -> Result<PhpValue, ParseError> {
        let offset = self.pos;
        match self.next_byte()? {
            b'N' => {
                self.expect(b';')?;
                Ok(PhpValue::Null)
            }
            b'b' => {
                self.expect(b':')?;
                Ok(PhpValue::Bool(self.integer_until(b';')? != 0))
            }
            b'i' => {
                self.expect(b':')?;
                Ok(PhpValue::Int(self.integer_until(b';')?))
            }
            b'd' => {
                self.expect(b':')?;
                let raw = self.until(b';')?;
                Ok(PhpValue::Float(parse_float(raw)?))
            }
            b's' => {
                self.expect(b':')?;
                let s = self.string()?;
                self.expect(b';')?;
                Ok(PhpValue::Str(s))
            }
            b'E' => {
                self.expect(b':')?;
                let case = self.string()?;
                self.expect(b';')?;
                Ok(PhpValue::Str(case))
            }
            b'r' | b'R' => {
                self.expect(b':')?;
                self.integer_until(b';')?;
                Ok(PhpValue::Null)
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.length_until(b':')?;
                self.expect(b'{')?;
                let mut entries = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key = self.key()?;
                    let value = self.value()?;
                    entries.push((key, value));
                }
                self.expect(b'}')?;
                Ok(PhpValue::Array(entries))
            }
            b'O' => {
                self.expect(b':')?;
                let class = self.string()?;
                self.expect(b':')?;
                let count = self.length_until(b':')?;
                self.expect(b'{')?;
                let mut properties = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let name = self.key()?.to_key_string();
                    let value = self.value()?;
                    properties.push((name, value));
                }
                self.expect(b'}')?;
                Ok(PhpValue::Object { class, properties })
            }
            other => Err(ParseError::malformed(format!(
                "unexpected type tag '{}' at offset {}",
                other as char, offset
            ))),
        }
    }

    fn key(&mut self) -> Result<PhpKey, ParseError> {
        match self.value()? {
            PhpValue::Int(n) => Ok(PhpKey::Int(n)),
            PhpValue::Str(s) => Ok(PhpKey::Str(s)),
            other => Err(ParseError::malformed(format!(
                "invalid array key {:?} at offset {}",
                other, self.pos
            ))),
        }
    }

    /// `<len>:"<bytes>"`
    fn string(&mut self) -> Result<String, ParseError> {
        let len = self.length_until(b':')?;
        self.expect(b'"')?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| ParseError::malformed("string length exceeds input"))?;
        let s = String::from_utf8_lossy(&self.bytes[self.pos..end]).into_owned();
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    fn next_byte(&mut self) -> Result<u8, ParseError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| ParseError::malformed("unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        let offset = self.pos;
        let found = self.next_byte()?;
        if found == expected {
            Ok(())
        } else {
            Err(ParseError::malformed(format!(
                "expected '{}' at offset {}, found '{}'",
                expected as char, offset, found as char
            )))
        }
    }

    fn until(&mut self, terminator: u8) -> Result<&'a str, ParseError> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| ParseError::malformed("unterminated value"))?;
        self.pos += len + 1;
        std::str::from_utf8(&rest[..len]).map_err(|e| ParseError::malformed(e.to_string()))
    }

    fn integer_until(&mut self, terminator: u8) -> Result<i64, ParseError> {
        let raw = self.until(terminator)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| ParseError::malformed(format!("invalid integer '{}'", raw)))
    }

    fn length_until(&mut self, terminator: u8) -> Result<usize, ParseError> {
        let raw = self.until(terminator)?;
        raw.trim()
            .parse::<usize>()
            .map_err(|_| ParseError::malformed(format!("invalid length '{}'", raw)))
    }
}

fn parse_float(raw: &str) -> Result<f64, ParseError> {
    match raw.trim() {
        "INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NAN" => Ok(f64::NAN),
        other => other
            .parse::<f64>()
            .map_err(|_| ParseError::malformed(format!("invalid float '{}'", other))),
    }
}
