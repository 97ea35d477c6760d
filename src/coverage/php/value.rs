//! In-memory model of PHP data as it appears in coverage artifacts.
//!
//! Both the array-literal loader and the `serialize()` decoder produce
//! [`PhpValue`] trees. Arrays keep their entry order, like PHP arrays do.

/// Deepest value nesting either decoder accepts before reporting the input
/// as malformed.
pub(crate) const MAX_NESTING: usize = 512;

/// Array key: PHP arrays are keyed by integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

impl PhpKey {
    /// Interpret the key as a line number, if it is numeric.
    pub fn as_line_number(&self) -> Option<u32> {
        match self {
            PhpKey::Int(n) => u32::try_from(*n).ok(),
            PhpKey::Str(s) => s.trim().parse::<u32>().ok(),
        }
    }

    /// Key as it would be printed, used for file paths.
    pub fn to_key_string(&self) -> String {
        match self {
            PhpKey::Int(n) => n.to_string(),
            PhpKey::Str(s) => s.clone(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        matches!(self, PhpKey::Str(s) if s == name)
    }
}

/// A PHP value.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(PhpKey, PhpValue)>),
    Object {
        class: String,
        properties: Vec<(String, PhpValue)>,
    },
}

impl PhpValue {
    /// PHP truthiness for scalars; arrays are truthy when non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            PhpValue::Null => false,
            PhpValue::Bool(b) => *b,
            PhpValue::Int(n) => *n != 0,
            PhpValue::Float(f) => *f != 0.0,
            PhpValue::Str(s) => !s.is_empty() && s != "0",
            PhpValue::Array(entries) => !entries.is_empty(),
            PhpValue::Object { .. } => true,
        }
    }

    pub fn as_array(&self) -> Option<&[(PhpKey, PhpValue)]> {
        match self {
            PhpValue::Array(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a string key in an array.
    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        self.as_array()?
            .iter()
            .find(|(k, _)| k.matches(key))
            .map(|(_, v)| v)
    }

    /// Look up an object property by its declared name.
    ///
    /// Serialized private and protected properties carry a
    /// `\0Class\0` or `\0*\0` prefix, which is ignored here.
    pub fn property(&self, name: &str) -> Option<&PhpValue> {
        let PhpValue::Object { properties, .. } = self else {
            return None;
        };
        properties
            .iter()
            .find(|(prop, _)| unmangle_property(prop) == name)
            .map(|(_, v)| v)
    }
}

fn unmangle_property(name: &str) -> &str {
    match name.strip_prefix('\0') {
        Some(rest) => rest.split_once('\0').map_or(rest, |(_, prop)| prop),
        None => name,
    }
}
