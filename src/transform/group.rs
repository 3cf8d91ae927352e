use crate::table::{GroupedRows, Record};
use indexmap::IndexMap;

/// Buckets rows by the stringified value of `column`.
///
/// Rows whose value in `column` is missing or falsy (`""`, `0`, `NaN`, `false`) are left
/// out of every bucket.
pub fn group_rows(rows: &[Record], column: &str) -> GroupedRows {
    let mut buckets: IndexMap<String, Vec<Record>> = IndexMap::new();
    for row in rows {
        let Some(key) = row.get(column).filter(|cell| cell.is_truthy()) else {
            continue;
        };
        buckets.entry(key.to_string()).or_default().push(row.clone());
    }
    GroupedRows::new(buckets)
}
