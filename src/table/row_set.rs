use super::Scalar;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// A single row: column name to cell value, in column insertion order.
///
/// A column that is absent from the map is "undefined" for that row.
pub type Record = IndexMap<String, Scalar>;

/// An immutable, cheaply shareable sequence of rows.
///
/// Cloning `Rows` shares the underlying buffer; every transform builds a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rows(Arc<Vec<Record>>);

impl Rows {
    pub fn new(rows: Vec<Record>) -> Self {
        Self(Arc::new(rows))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if both handles point at the same buffer.
    pub fn ptr_eq(&self, other: &Rows) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Rows {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.0
    }
}

impl From<Vec<Record>> for Rows {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Record> for Rows {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A flat table: rows plus the ordered column list that describes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Rows,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Rows) -> Self {
        Self { columns, rows }
    }

    /// Builds a row set whose columns are inferred from the rows, in order of first appearance.
    pub fn from_rows(rows: Rows) -> Self {
        Self {
            columns: infer_columns(&rows),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Returns every column name used by `rows`, ordered by first appearance.
pub fn infer_columns(rows: &[Record]) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for row in rows {
        seen.extend(row.keys().map(String::as_str));
    }
    seen.into_iter().map(str::to_string).collect()
}

/// Rows partitioned into named buckets. Bucket order is the order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedRows(Arc<IndexMap<String, Vec<Record>>>);

impl GroupedRows {
    pub fn new(groups: IndexMap<String, Vec<Record>>) -> Self {
        Self(Arc::new(groups))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of rows across all buckets.
    pub fn row_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// The value that flows along edges and is shown to the user as a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularValue {
    Rows(RowSet),
    Grouped(GroupedRows),
}

impl TabularValue {
    pub fn as_rows(&self) -> Option<&RowSet> {
        match self {
            TabularValue::Rows(set) => Some(set),
            TabularValue::Grouped(_) => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&GroupedRows> {
        match self {
            TabularValue::Grouped(groups) => Some(groups),
            TabularValue::Rows(_) => None,
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, TabularValue::Grouped(_))
    }
}
