//! Decoding uploaded datasets into rows.
//!
//! The graph only ever sees [`SourceDataset`] values; turning a file into one is the job
//! of a [`TableCodec`]. JSON and CSV codecs are built in.

use crate::error::CodecError;
use crate::graph::SourceDataset;
use crate::table::{Record, Rows, Scalar, infer_columns, whole_number};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde_json::Value;

/// A decoded table, ready to be attached to a source node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub columns: Vec<String>,
    pub rows: Rows,
}

impl SourceTable {
    pub fn into_dataset(
        self,
        node_id: impl Into<String>,
        file_label: impl Into<String>,
    ) -> SourceDataset {
        SourceDataset {
            node_id: node_id.into(),
            file_label: file_label.into(),
            columns: self.columns,
            rows: self.rows,
        }
    }
}

pub trait TableCodec {
    fn parse(&self, input: &str) -> Result<SourceTable, CodecError>;
    fn unparse(&self, table: &SourceTable) -> Result<String, CodecError>;
}

/// Reads a JSON array of row objects, or an object with `columns` and `rows`.
///
/// `null` cells are treated as absent. Nested arrays and objects are kept as their JSON
/// text, since a cell can only hold a scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableCodec;

impl JsonTableCodec {
    fn record_from(index: usize, value: &Value) -> Result<Record, CodecError> {
        let Value::Object(map) = value else {
            return Err(CodecError::InvalidRow { index });
        };
        Ok(map
            .iter()
            .filter_map(|(column, cell)| cell_to_scalar(cell).map(|s| (column.clone(), s)))
            .collect())
    }
}

fn cell_to_scalar(cell: &Value) -> Option<Scalar> {
    match cell {
        Value::Null => None,
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Scalar::Number),
        Value::String(s) => Some(Scalar::Text(s.clone())),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(Scalar::Text(nested.to_string())),
    }
}

fn scalar_to_cell(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Text(s) => Value::String(s.clone()),
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => match whole_number(*n) {
            Some(i) => Value::from(i),
            None => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        },
    }
}

impl TableCodec for JsonTableCodec {
    fn parse(&self, input: &str) -> Result<SourceTable, CodecError> {
        let document: Value = serde_json::from_str(input)?;
        let (declared, raw_rows) = match &document {
            Value::Array(rows) => (None, rows),
            Value::Object(map) => match map.get("rows") {
                Some(Value::Array(rows)) => {
                    let columns = match map.get("columns") {
                        Some(Value::Array(cols)) => Some(
                            cols.iter()
                                .map(|c| c.as_str().map(str::to_string))
                                .collect::<Option<Vec<_>>>()
                                .ok_or(CodecError::InvalidShape)?,
                        ),
                        None => None,
                        Some(_) => return Err(CodecError::InvalidShape),
                    };
                    (columns, rows)
                }
                _ => return Err(CodecError::InvalidShape),
            },
            _ => return Err(CodecError::InvalidShape),
        };

        let records = raw_rows
            .iter()
            .enumerate()
            .map(|(index, row)| Self::record_from(index, row))
            .collect::<Result<Vec<_>, _>>()?;
        let columns = declared.unwrap_or_else(|| infer_columns(&records));
        Ok(SourceTable {
            columns,
            rows: records.into(),
        })
    }

    fn unparse(&self, table: &SourceTable) -> Result<String, CodecError> {
        let rows: Vec<Value> = table
            .rows
            .iter()
            .map(|row| {
                Value::Object(
                    row.iter()
                        .map(|(column, cell)| (column.clone(), scalar_to_cell(cell)))
                        .collect(),
                )
            })
            .collect();
        let document = serde_json::json!({
            "columns": table.columns,
            "rows": rows,
        });
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Reads comma separated text whose first line names the columns.
///
/// Empty fields are absent cells. `true`/`false` become booleans and plain decimal
/// literals become numbers; everything else stays text. Short lines are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableCodec;

impl CsvTableCodec {
    fn field_to_scalar(field: &str) -> Option<Scalar> {
        match field {
            "" => None,
            "true" => Some(Scalar::Bool(true)),
            "false" => Some(Scalar::Bool(false)),
            _ => Some(decimal_literal(field).map_or_else(|| field.into(), Scalar::Number)),
        }
    }
}

fn decimal_literal(field: &str) -> Option<f64> {
    if field.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    field.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl TableCodec for CsvTableCodec {
    fn parse(&self, input: &str) -> Result<SourceTable, CodecError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(input.as_bytes());
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for line in reader.records() {
            let line = line?;
            let record: Record = columns
                .iter()
                .zip(line.iter())
                .filter_map(|(column, field)| {
                    Self::field_to_scalar(field).map(|cell| (column.clone(), cell))
                })
                .collect();
            records.push(record);
        }
        Ok(SourceTable {
            columns,
            rows: records.into(),
        })
    }

    fn unparse(&self, table: &SourceTable) -> Result<String, CodecError> {
        Ok(write_table(&table.columns, &table.rows)?)
    }
}

/// Writes `rows` under a header of `columns`, with CRLF line endings.
/// Cells missing from a row are written as empty fields.
pub(crate) fn write_table(columns: &[String], rows: &[Record]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default()),
        )?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Picks the codec for a dataset file from its extension. Anything but `.csv` is JSON.
pub fn codec_for_path(path: impl AsRef<std::path::Path>) -> Box<dyn TableCodec> {
    let is_csv = path
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvTableCodec)
    } else {
        Box::new(JsonTableCodec)
    }
}
