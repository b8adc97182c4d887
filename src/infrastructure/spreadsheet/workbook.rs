use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};

use crate::domain::dataset::{CellValue, Dataset};
use crate::domain::error::{AppError, Result};

/// Reads the first worksheet; the first row is the header.
pub fn load_workbook(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        AppError::DatasetError(format!(
            "Failed to open spreadsheet {}: {}",
            path.display(),
            e
        ))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::DatasetError("No worksheet found".to_string()))?
        .map_err(|e| {
            AppError::DatasetError(format!(
                "Failed to read worksheet in {}: {}",
                path.display(),
                e
            ))
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| {
        AppError::DatasetError(format!("Spreadsheet {} is empty", path.display()))
    })?;

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(cell, idx))
        .collect();

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(Dataset::new(path.display().to_string(), columns, data))
}

fn header_name(cell: &Data, idx: usize) -> String {
    let name = match cell {
        Data::String(value) => value.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    };
    if name.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        name
    }
}

pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        other => other
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(other.to_string())),
    }
}
