use crate::table::{Record, TabularValue, infer_columns};
use itertools::Itertools;

/// Formats previews as plain text tables.
#[derive(Debug, Clone, Copy)]
pub struct PreviewFormatter {
    max_rows: usize,
}

impl Default for PreviewFormatter {
    fn default() -> Self {
        Self { max_rows: 20 }
    }
}

impl PreviewFormatter {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Renders a row set as one table, or a grouping as one titled table per bucket.
    pub fn format(&self, preview: &TabularValue) -> String {
        match preview {
            TabularValue::Rows(set) => self.format_table(&set.columns, &set.rows),
            TabularValue::Grouped(groups) if groups.is_empty() => "(no groups)\n".to_string(),
            TabularValue::Grouped(groups) => groups
                .iter()
                .map(|(key, rows)| {
                    let columns = infer_columns(rows);
                    format!(
                        "[{}] {} row(s)\n{}",
                        key,
                        rows.len(),
                        self.format_table(&columns, rows)
                    )
                })
                .join("\n"),
        }
    }

    fn format_table(&self, columns: &[String], rows: &[Record]) -> String {
        if columns.is_empty() {
            return format!("({} row(s), no columns)\n", rows.len());
        }

        let shown = &rows[..rows.len().min(self.max_rows)];
        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|line| line[i].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&render_line(columns.iter().map(String::as_str), &widths));
        out.push('\n');
        out.push_str(&widths.iter().map(|w| "-".repeat(*w)).join("-+-"));
        out.push('\n');
        for line in &cells {
            out.push_str(&render_line(line.iter().map(String::as_str), &widths));
            out.push('\n');
        }
        if rows.len() > shown.len() {
            out.push_str(&format!("... {} more row(s)\n", rows.len() - shown.len()));
        }
        out
    }
}

fn render_line<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    fields
        .zip(widths)
        .map(|(field, width)| format!("{:<width$}", field, width = *width))
        .join(" | ")
        .trim_end()
        .to_string()
}
