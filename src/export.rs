use crate::codec::write_table;
use crate::error::ExportError;
use crate::table::{RowSet, TabularValue};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
        }
    }
}

/// Renders a preview for download.
///
/// JSON exports the rows (or the buckets of a grouped preview) as pretty-printed JSON.
/// CSV is only defined for flat row sets.
pub fn export_preview(
    preview: &TabularValue,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match (format, preview) {
        (ExportFormat::Json, TabularValue::Rows(set)) => {
            Ok(serde_json::to_string_pretty(&set.rows)?)
        }
        (ExportFormat::Json, TabularValue::Grouped(groups)) => {
            Ok(serde_json::to_string_pretty(groups)?)
        }
        (ExportFormat::Csv, TabularValue::Rows(set)) => write_csv(set),
        (ExportFormat::Csv, TabularValue::Grouped(_)) => Err(ExportError::GroupedCsv),
    }
}

/// Writes a row set as comma separated text with a header line and CRLF line endings.
/// Absent cells are written as empty fields.
pub fn write_csv(set: &RowSet) -> Result<String, ExportError> {
    Ok(write_table(&set.columns, &set.rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Record, Scalar};

    #[test]
    fn quotes_only_when_needed() {
        let mut row = Record::new();
        row.insert("plain".to_string(), Scalar::from("plain"));
        row.insert("comma".to_string(), Scalar::from("a,b"));
        row.insert("quote".to_string(), Scalar::from("say \"hi\""));
        row.insert("lines".to_string(), Scalar::from("one\ntwo"));
        let set = RowSet::from_rows(vec![row].into());

        let text = write_csv(&set).expect("csv written");
        assert_eq!(
            text,
            "plain,comma,quote,lines\r\nplain,\"a,b\",\"say \"\"hi\"\"\",\"one\ntwo\"\r\n"
        );
    }
}
