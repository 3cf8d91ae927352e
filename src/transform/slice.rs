use crate::table::{Record, coerce_number};

/// Returns `rows[start..end]`, clamping both bounds into `0..=rows.len()`.
///
/// Negative bounds clamp to the start of the table; `start >= end` yields an empty result.
pub fn slice_rows(rows: &[Record], start: i64, end: i64) -> Vec<Record> {
    let len = i64::try_from(rows.len()).unwrap_or(i64::MAX);
    let start = start.clamp(0, len);
    let end = end.clamp(0, len);
    if start >= end {
        return Vec::new();
    }
    rows[start as usize..end as usize].to_vec()
}

/// Reads a string-typed slice bound. Fractions truncate toward zero and infinities
/// saturate, so `"Infinity"` means "through the end". Returns `None` for non-numeric text.
pub fn parse_bound(raw: &str) -> Option<i64> {
    let n = coerce_number(raw);
    if n.is_nan() {
        return None;
    }
    // Float-to-int casts saturate at the i64 range.
    Some(n.trunc() as i64)
}
