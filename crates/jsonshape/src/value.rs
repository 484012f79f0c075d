//! JSON value tree.
//!
//! [`Value`] holds fields declared with the any-value shape and is the output
//! of [`decode_value`](crate::decode_value). Numbers keep the distinction the
//! decoder saw: integers that fit `i64`, larger non-negative integers that
//! fit `u64`, and everything else as `f64`. `-0` is kept as `-0.0`.
//!
//! The `Display` impl writes a value back as compact JSON text. It only
//! renders captured trees; typed records have no encoder.

use std::{collections::BTreeMap, fmt};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use jsonshape::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// map.insert("n".to_string(), Value::Integer(-3));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":-3}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(untagged))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::Unsigned(v), Self::Integer)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for any of the three number variants.
    ///
    /// ```
    /// use jsonshape::Value;
    ///
    /// assert!(Value::Integer(1).is_number());
    /// assert!(Value::Unsigned(u64::MAX).is_number());
    /// assert!(Value::Float(0.5).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Unsigned(..) | Self::Float(..))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(n) => Some(n),
            Self::Unsigned(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Returns the value as `f64`, converting integers (possibly with loss of
    /// precision).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Integer(n) => Some(n as f64),
            Self::Unsigned(n) => Some(n as f64),
            Self::Float(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

/// Writes `src` with the characters JSON requires escaped.
///
/// Quotes, backslashes and control characters are escaped, as are U+2028 and
/// U+2029 which pre-2019 parsers treat as line terminators.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Unsigned(n) => write!(f, "{n}"),
            // JSON has no spelling for NaN or the infinities.
            Value::Float(n) if !n.is_finite() => f.write_str("null"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_escapes_strings_and_keys() {
        let mut map = Map::new();
        map.insert("a\"b".into(), Value::String("line\nbreak\u{1}".into()));
        insta::assert_snapshot!(Value::Object(map), @r#"{"a\"b":"line\nbreak\u0001"}"#);
    }

    #[test]
    fn display_numbers() {
        let v = Value::Array(vec![
            Value::Integer(-7),
            Value::Unsigned(u64::MAX),
            Value::Float(1.0),
            Value::Float(2.5e-8),
            Value::Float(f64::INFINITY),
        ]);
        insta::assert_snapshot!(v, @"[-7,18446744073709551615,1.0,2.5e-8,null]");
    }

    #[test]
    fn display_is_valid_json() {
        let mut map = Map::new();
        map.insert("list".into(), vec![Value::Null, true.into(), "x".into()].into());
        map.insert("n".into(), Value::from(3u64));
        let text = Value::Object(map.clone()).to_string();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, Value::Object(map));
    }

    #[test]
    fn accessors() {
        let v = Value::from(Map::from([("k".to_string(), Value::from(5i64))]));
        assert_eq!(v.get("k").and_then(Value::as_i64), Some(5));
        assert_eq!(v.get("k").and_then(Value::as_f64), Some(5.0));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert!(Value::Null.as_array().is_none());
    }
}
