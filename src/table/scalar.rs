use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell value in a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    /// Numeric coercion with the same rules as an untyped `Number(value)` conversion:
    /// booleans become 0/1 and text is parsed, yielding `NaN` when it is not numeric.
    pub fn to_number(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Bool(b) => f64::from(u8::from(*b)),
            Scalar::Text(s) => coerce_number(s),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `false` for `""`, `0`, `NaN` and `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
            Scalar::Bool(b) => *b,
        }
    }
}

/// Parses text into a number the way a loosely-typed runtime would.
///
/// Surrounding whitespace is ignored, an empty string is `0`, `Infinity` is accepted with
/// an optional sign, and `0x`/`0o`/`0b` prefixes are read as integers. Anything else that
/// is not a plain decimal literal is `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // Rust accepts "inf"/"nan" spellings that a plain decimal literal does not.
    if text.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// The integer a finite whole `n` stands for, if it fits in the exactly representable range.
pub fn whole_number(n: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    (n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE).then_some(n as i64)
}

// Manual implementation to handle f64 by hashing its bits
impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Scalar::Text(s) => s.hash(state),
            Scalar::Number(n) => n.to_bits().hash(state),
            Scalar::Bool(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => {
                if n.is_nan() {
                    f.write_str("NaN")
                } else if n.is_infinite() {
                    f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
                } else if *n == 0.0 {
                    f.write_str("0")
                } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
                    let text = format!("{:e}", n);
                    match text.split_once('e') {
                        Some((mantissa, exp)) if !exp.starts_with('-') => {
                            write!(f, "{}e+{}", mantissa, exp)
                        }
                        _ => f.write_str(&text),
                    }
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Binary formats cannot self-describe an untagged value, so they get an explicit tag.
#[derive(Serialize, Deserialize)]
enum TaggedScalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            return match self {
                Scalar::Text(s) => serializer.serialize_str(s),
                Scalar::Number(n) => match whole_number(*n) {
                    Some(i) => serializer.serialize_i64(i),
                    None => serializer.serialize_f64(*n),
                },
                Scalar::Bool(b) => serializer.serialize_bool(*b),
            };
        }
        let tagged = match self {
            Scalar::Text(s) => TaggedScalar::Text(s.clone()),
            Scalar::Number(n) => TaggedScalar::Number(*n),
            Scalar::Bool(b) => TaggedScalar::Bool(*b),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            return deserializer.deserialize_any(ScalarVisitor);
        }
        Ok(match TaggedScalar::deserialize(deserializer)? {
            TaggedScalar::Text(s) => Scalar::Text(s),
            TaggedScalar::Number(n) => Scalar::Number(n),
            TaggedScalar::Bool(b) => Scalar::Bool(b),
        })
    }
}

struct ScalarVisitor;

impl Visitor<'_> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }
}
