// ============================================================
// CSV DATASET SOURCE
// ============================================================
// Reads delimited text exports with encoding and delimiter detection

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::dataset::{CellValue, Dataset};
use crate::domain::error::{AppError, Result};

pub struct CsvSource {
    /// Forced delimiter; detected from the first lines when `None`
    delimiter: Option<u8>,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: None,
            trim: true,
        }
    }
}

impl CsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn load(&self, path: &Path) -> Result<Dataset> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let content = decode(&bytes);
        self.parse_content(&path.display().to_string(), &content)
    }

    pub fn parse_content(&self, source: &str, content: &str) -> Result<Dataset> {
        let content = content.trim_start_matches('\u{feff}');
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if name.is_empty() {
                    format!("Unnamed: {}", idx)
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            let row: Vec<CellValue> = record.iter().map(parse_cell).collect();
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            rows.push(row);
        }

        Ok(Dataset::new(source, columns, rows))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Favour delimiters that appear often and evenly across lines
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// UTF-8 first, Windows-1252 otherwise (spreadsheet exports on Windows).
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

fn parse_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match raw {
        "True" | "true" | "TRUE" => return CellValue::Bool(true),
        "False" | "false" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => CellValue::Number(value),
        _ => CellValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "departamento,salario,avaliacoes\nTI,8500,\"[4, 5]\"\nRH,5200.5,\"[3]\"";
        let dataset = CsvSource::new().parse_content("mem", content).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns(), &["departamento", "salario", "avaliacoes"]);
        assert_eq!(dataset.rows()[0][0], CellValue::Text("TI".to_string()));
        assert_eq!(dataset.rows()[1][1], CellValue::Number(5200.5));
        assert_eq!(dataset.rows()[0][2], CellValue::Text("[4, 5]".to_string()));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvSource::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvSource::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvSource::detect_delimiter("a\tb\nc\td"), b'\t');
    }

    #[test]
    fn test_semicolon_export_keeps_decimal_commas_as_text() {
        let content = "regional;margem_percentual\nSul;12,5\nNorte;8";
        let dataset = CsvSource::new().parse_content("mem", content).unwrap();
        assert_eq!(dataset.rows()[0][1], CellValue::Text("12,5".to_string()));
        assert_eq!(dataset.rows()[1][1], CellValue::Number(8.0));
    }

    #[test]
    fn test_blank_rows_are_skipped_and_headers_named() {
        let content = "regional,\nSul,1\n,\nNorte,2";
        let dataset = CsvSource::new().parse_content("mem", content).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns()[1], "Unnamed: 1");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        let bytes = b"gest\xe3o";
        assert_eq!(decode(bytes), "gestão");
    }
}
