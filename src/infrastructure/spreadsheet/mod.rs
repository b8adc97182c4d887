// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Loads the analysed dataset from xlsx/xls/ods workbooks or CSV exports

mod csv_source;
mod workbook;

pub use csv_source::CsvSource;
pub use workbook::load_workbook;

use std::path::Path;

use tracing::info;

use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};

/// Picks the reader by file extension. Any failure here is fatal for the
/// process: nothing works without the dataset.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Dataset file {} does not exist",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let dataset = match extension.as_deref() {
        Some("tsv") => CsvSource::new().with_delimiter(b'\t').load(path)?,
        Some("csv") | Some("txt") => CsvSource::new().load(path)?,
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            load_workbook(path)?
        }
        other => {
            return Err(AppError::DatasetError(format!(
                "Unsupported dataset format: {}",
                other.unwrap_or("<none>")
            )))
        }
    };

    info!(
        source = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Dataset loaded"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::CellValue;
    use std::fs;

    fn temp_file(ext: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}.{}", uuid::Uuid::new_v4(), ext));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_csv_by_extension() {
        let path = temp_file("csv", "departamento,salario\nTI,9000\n");
        let dataset = load_dataset(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.require_columns(&["departamento", "salario"]).is_ok());
    }

    #[test]
    fn test_tsv_is_split_on_tabs_only() {
        let path = temp_file(
            "tsv",
            "departamento\tavaliacoes\nTI\t[4, 5, 3]\nRH\t[3, 4]\n",
        );
        let dataset = load_dataset(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(dataset.columns(), &["departamento", "avaliacoes"]);
        assert_eq!(
            dataset.rows()[0][1],
            CellValue::Text("[4, 5, 3]".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("definitely-missing-dados_rh.xlsx");
        assert!(matches!(load_dataset(&path), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let path = temp_file("json", "{}");
        let result = load_dataset(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AppError::DatasetError(_))));
    }
}
