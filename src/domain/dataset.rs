use crate::domain::error::{AppError, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;

/// A single spreadsheet cell after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "NaN"),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }
            CellValue::DateTime(value) => {
                if value.num_seconds_from_midnight() == 0 {
                    write!(f, "{}", value.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// Read-only table loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Rows shorter than the header are padded with empty cells; extra
    /// trailing cells are dropped.
    pub fn new(source: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            source: source.into(),
            columns,
            rows,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| {
                AppError::DatasetError(format!(
                    "Column '{}' not found in {} (available: {})",
                    name,
                    self.source,
                    self.columns.join(", ")
                ))
            })
    }

    pub fn column(&self, name: &str) -> Result<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    /// Full fixed-width dump with a leading row index, the shape a dataframe
    /// prints. This is what gets embedded in every prompt.
    pub fn to_text(&self) -> String {
        let index_labels: Vec<String> = (0..self.rows.len()).map(|i| i.to_string()).collect();
        let index_width = index_labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0);

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                rendered
                    .iter()
                    .map(|row| row[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (header, width) in self.columns.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad_left(header, *width));
        }

        for (label, row) in index_labels.iter().zip(&rendered) {
            out.push('\n');
            out.push_str(&format!("{:<width$}", label, width = index_width));
            for (value, width) in row.iter().zip(&widths) {
                out.push_str("  ");
                out.push_str(&pad_left(value, *width));
            }
        }

        out
    }
}

fn pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            "memory",
            vec!["departamento".to_string(), "salario".to_string()],
            vec![
                vec![CellValue::Text("TI".to_string()), CellValue::Number(8500.0)],
                vec![CellValue::Text("Vendas".to_string()), CellValue::Number(4200.5)],
                vec![CellValue::Text("RH".to_string())],
            ],
        )
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dataset = sample();
        assert_eq!(dataset.rows()[2].len(), 2);
        assert_eq!(dataset.rows()[2][1], CellValue::Empty);
    }

    #[test]
    fn test_missing_column_is_dataset_error() {
        let dataset = sample();
        match dataset.column("avaliacoes") {
            Err(AppError::DatasetError(msg)) => assert!(msg.contains("avaliacoes")),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(dataset.require_columns(&["departamento", "salario"]).is_ok());
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "   departamento  salario");
        assert_eq!(lines[1], "0            TI     8500");
        assert_eq!(lines[2], "1        Vendas   4200.5");
        assert_eq!(lines[3], "2            RH      NaN");
    }

    #[test]
    fn test_datetime_display_drops_midnight() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(CellValue::DateTime(date).to_string(), "2024-03-05");
    }
}
