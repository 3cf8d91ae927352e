use crate::error::TransformError;
use crate::table::{Record, Scalar, coerce_number};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of row predicates a filter node can apply.
///
/// Mode names arrive as free text from the canvas, so an unknown name is kept as
/// `Unsupported` and only rejected when the filter is run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterMode {
    /// Stringified cell equals the value exactly.
    #[default]
    Text,
    /// Cell is a number equal to the numeric value.
    Number,
    /// Stringified cell contains the value.
    Contains,
    /// `/pattern/` matched against the stringified cell.
    Regex,
    GreaterThan,
    LessThan,
    Unsupported(String),
}

impl FilterMode {
    pub fn as_str(&self) -> &str {
        match self {
            FilterMode::Text => "string",
            FilterMode::Number => "number",
            FilterMode::Contains => "contains",
            FilterMode::Regex => "regex",
            FilterMode::GreaterThan => "greater-than",
            FilterMode::LessThan => "less-than",
            FilterMode::Unsupported(name) => name,
        }
    }

    /// Whether the `invert` flag is applied for this mode. The comparison and regex
    /// modes ignore it.
    pub fn honors_invert(&self) -> bool {
        matches!(
            self,
            FilterMode::Text | FilterMode::Number | FilterMode::Contains
        )
    }
}

impl From<String> for FilterMode {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => FilterMode::Text,
            "number" => FilterMode::Number,
            "contains" => FilterMode::Contains,
            "regex" => FilterMode::Regex,
            "greater-than" => FilterMode::GreaterThan,
            "less-than" => FilterMode::LessThan,
            _ => FilterMode::Unsupported(name),
        }
    }
}

impl From<&str> for FilterMode {
    fn from(name: &str) -> Self {
        FilterMode::from(name.to_string())
    }
}

impl From<FilterMode> for String {
    fn from(mode: FilterMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter with its value already parsed for the chosen mode.
enum Predicate<'a> {
    Text(&'a str),
    Number(f64),
    Contains(&'a str),
    GreaterThan(f64),
    LessThan(f64),
    Regex(Regex),
}

impl<'a> Predicate<'a> {
    fn compile(mode: &FilterMode, value: &'a str) -> Result<Self, TransformError> {
        Ok(match mode {
            FilterMode::Text => Predicate::Text(value),
            FilterMode::Number => Predicate::Number(coerce_number(value)),
            FilterMode::Contains => Predicate::Contains(value),
            FilterMode::GreaterThan => Predicate::GreaterThan(coerce_number(value)),
            FilterMode::LessThan => Predicate::LessThan(coerce_number(value)),
            FilterMode::Regex => {
                let pattern = unwrap_regex_literal(value);
                let regex = Regex::new(&pattern).map_err(|e| TransformError::InvalidRegex {
                    pattern: value.to_string(),
                    message: e.to_string(),
                })?;
                Predicate::Regex(regex)
            }
            FilterMode::Unsupported(name) => {
                return Err(TransformError::UnsupportedFilterMode(name.clone()));
            }
        })
    }

    fn test(&self, cell: &Scalar, invert: bool) -> bool {
        match self {
            Predicate::Text(expected) => (cell.to_string() == *expected) != invert,
            Predicate::Number(expected) => {
                matches!(cell, Scalar::Number(n) if n == expected) != invert
            }
            Predicate::Contains(needle) => cell.to_string().contains(needle) != invert,
            Predicate::GreaterThan(bound) => cell.to_number() > *bound,
            Predicate::LessThan(bound) => cell.to_number() < *bound,
            Predicate::Regex(regex) => regex.is_match(&cell.to_string()),
        }
    }
}

/// Strips the surrounding `/.../` delimiters and collapses escaped backslashes.
fn unwrap_regex_literal(value: &str) -> String {
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str().replace("\\\\", "\\")
}

/// Returns the rows of `rows` that satisfy the filter.
///
/// Rows without a value in `column` are always excluded, before `invert` is considered.
/// The regex is compiled once per call, so a malformed pattern fails the whole run.
pub fn filter_rows(
    rows: &[Record],
    mode: &FilterMode,
    column: &str,
    value: &str,
    invert: bool,
) -> Result<Vec<Record>, TransformError> {
    let predicate = Predicate::compile(mode, value)?;
    Ok(rows
        .iter()
        .filter(|row| {
            row.get(column)
                .is_some_and(|cell| predicate.test(cell, invert))
        })
        .cloned()
        .collect())
}
