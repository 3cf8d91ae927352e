use crate::table::{Record, Scalar};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    #[serde(alias = "dsc")]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// How a cell takes part in ordering.
///
/// Numbers (and booleans, as 0/1) compare numerically, text compares lexicographically,
/// and numbers precede text. Undefined cells and `NaN` have no relation to anything and
/// always sort to the end, whichever direction is requested.
enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Unordered,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Scalar>) -> Self {
        match value {
            Some(Scalar::Number(n)) if !n.is_nan() => SortKey::Number(*n),
            Some(Scalar::Bool(b)) => SortKey::Number(f64::from(u8::from(*b))),
            Some(Scalar::Text(s)) => SortKey::Text(s),
            _ => SortKey::Unordered,
        }
    }
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>, order: SortOrder) -> Ordering {
    let related = match (a, b) {
        (SortKey::Unordered, SortKey::Unordered) => return Ordering::Equal,
        (SortKey::Unordered, _) => return Ordering::Greater,
        (_, SortKey::Unordered) => return Ordering::Less,
        // NaN was filtered out above, so the partial order is total here.
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    };
    match order {
        SortOrder::Asc => related,
        SortOrder::Desc => related.reverse(),
    }
}

/// Returns a copy of `rows` ordered by `column`.
///
/// The sort is stable: rows whose keys compare equal keep their relative order.
pub fn sort_rows(rows: &[Record], column: &str, order: SortOrder) -> Vec<Record> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        compare_keys(
            &SortKey::of(a.get(column)),
            &SortKey::of(b.get(column)),
            order,
        )
    });
    sorted
}
