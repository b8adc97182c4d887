use crate::application::use_cases::coercion::coerce_number;
use crate::domain::dataset::Dataset;
use crate::domain::variant::DatasetVariant;
use serde::Serialize;

/// Sidebar summary shown next to the chat.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetOverview {
    pub title: &'static str,
    pub variant: DatasetVariant,
    pub source: String,
    pub total_records: usize,
    pub categories: Vec<String>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub suggested_questions: Vec<&'static str>,
    pub placeholder: &'static str,
}

impl DatasetOverview {
    /// Cells that cannot be read as numbers are left out of the range.
    pub fn build(variant: DatasetVariant, dataset: &Dataset) -> Self {
        let mut categories: Vec<String> = Vec::new();
        if let Ok(cells) = dataset.column(variant.category_column()) {
            for cell in cells.into_iter().filter(|c| !c.is_empty()) {
                let label = cell.to_string();
                if !categories.contains(&label) {
                    categories.push(label);
                }
            }
        }

        let values: Vec<f64> = dataset
            .column(variant.value_column())
            .map(|cells| {
                cells
                    .into_iter()
                    .filter_map(|cell| coerce_number(cell).ok().flatten())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: variant.title(),
            variant,
            source: dataset.source().to_string(),
            total_records: dataset.len(),
            categories,
            value_min: values.iter().copied().reduce(f64::min),
            value_max: values.iter().copied().reduce(f64::max),
            suggested_questions: variant.suggested_questions().to_vec(),
            placeholder: variant.input_placeholder(),
        }
    }
}
