//! Derives the canned dashboard charts straight from the dataset.
//!
//! Each chart is computed independently; a failure in one becomes a single
//! warning on the dashboard and the remaining charts are still produced.

use crate::application::use_cases::coercion::{coerce_date, coerce_number, coerce_number_list};
use crate::domain::chart::{
    BarPoint, BoxSummary, Chart, ChartData, Dashboard, LinePoint, PieSlice,
};
use crate::domain::dataset::{CellValue, Dataset};
use crate::domain::error::{AppError, Result};
use crate::domain::variant::DatasetVariant;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

pub const DISTRIBUTION_CHART: &str = "distribution";
pub const SPREAD_CHART: &str = "spread";
pub const DERIVED_METRIC_CHART: &str = "derived_metric";
pub const TIME_SERIES_CHART: &str = "time_series";

const HR_RATINGS_COLUMN: &str = "avaliacoes";
const SALES_MARGIN_COLUMN: &str = "margem_percentual";
const SALES_DATE_COLUMN: &str = "data_venda";

pub struct VisualizationBuilder {
    variant: DatasetVariant,
}

impl VisualizationBuilder {
    pub fn new(variant: DatasetVariant) -> Self {
        Self { variant }
    }

    pub fn build(&self, dataset: &Dataset) -> Dashboard {
        let mut dashboard = Dashboard::default();

        self.collect(&mut dashboard, self.distribution_chart(dataset), "distribuição");
        self.collect(&mut dashboard, self.spread_chart(dataset), "dispersão");

        match self.variant {
            DatasetVariant::Hr => {
                self.collect(&mut dashboard, self.ratings_chart(dataset), "avaliações");
            }
            DatasetVariant::Sales => {
                self.collect(&mut dashboard, self.margin_chart(dataset), "margens");
                self.collect(&mut dashboard, self.time_series_chart(dataset), "faturamento");
            }
        }

        dashboard
    }

    fn collect(&self, dashboard: &mut Dashboard, chart: Result<Chart>, label: &str) {
        match chart {
            Ok(chart) => dashboard.charts.push(chart),
            Err(err) => {
                warn!(variant = self.variant.as_str(), chart = label, error = %err, "Chart skipped");
                dashboard.warnings.push(format!(
                    "Não foi possível gerar o gráfico de {}. Erro: {}",
                    label,
                    error_detail(&err)
                ));
            }
        }
    }

    fn titles(&self) -> ChartTitles {
        match self.variant {
            DatasetVariant::Hr => ChartTitles {
                category: "Departamento",
                distribution: "Distribuição por Departamento",
                spread: "Distribuição Salarial por Departamento",
                spread_axis: "Salário",
                derived: "Média de Avaliações por Departamento",
                derived_axis: "Média de Avaliações",
            },
            DatasetVariant::Sales => ChartTitles {
                category: "Regional",
                distribution: "Distribuição por Regional",
                spread: "Distribuição do Valor de Venda por Regional",
                spread_axis: "Valor de Venda",
                derived: "Margem Média por Regional",
                derived_axis: "Margem Média (%)",
            },
        }
    }

    /// Record count per category, largest first; ties keep first appearance.
    fn distribution_chart(&self, dataset: &Dataset) -> Result<Chart> {
        let categories = dataset.column(self.variant.category_column())?;

        let mut counts: Vec<(String, usize)> = Vec::new();
        for cell in categories.into_iter().filter(|c| !c.is_empty()) {
            let label = cell.to_string();
            match counts.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total: usize = counts.iter().map(|(_, count)| count).sum();
        let slices = counts
            .into_iter()
            .map(|(label, count)| PieSlice {
                label,
                count,
                proportion: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect();

        let titles = self.titles();
        Ok(Chart {
            id: DISTRIBUTION_CHART,
            title: titles.distribution.to_string(),
            x_label: None,
            y_label: None,
            data: ChartData::Pie(slices),
        })
    }

    fn spread_chart(&self, dataset: &Dataset) -> Result<Chart> {
        let groups = group_by_category(
            dataset,
            self.variant.category_column(),
            self.variant.value_column(),
            |cell| coerce_number(cell),
        )?;

        let summaries = groups
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, values)| five_number_summary(category, values))
            .collect();

        let titles = self.titles();
        Ok(Chart {
            id: SPREAD_CHART,
            title: titles.spread.to_string(),
            x_label: Some(titles.category.to_string()),
            y_label: Some(titles.spread_axis.to_string()),
            data: ChartData::Box(summaries),
        })
    }

    /// Mean of each employee's mean rating, per department.
    fn ratings_chart(&self, dataset: &Dataset) -> Result<Chart> {
        let groups = group_by_category(
            dataset,
            self.variant.category_column(),
            HR_RATINGS_COLUMN,
            |cell| {
                let ratings = coerce_number_list(cell)?;
                Ok(Some(mean(&ratings)))
            },
        )?;

        self.bar_chart(groups)
    }

    fn margin_chart(&self, dataset: &Dataset) -> Result<Chart> {
        let groups = group_by_category(
            dataset,
            self.variant.category_column(),
            SALES_MARGIN_COLUMN,
            |cell| coerce_number(cell),
        )?;

        self.bar_chart(groups)
    }

    fn bar_chart(&self, groups: BTreeMap<String, Vec<f64>>) -> Result<Chart> {
        let bars = groups
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, values)| BarPoint {
                category,
                value: mean(&values),
            })
            .collect();

        let titles = self.titles();
        Ok(Chart {
            id: DERIVED_METRIC_CHART,
            title: titles.derived.to_string(),
            x_label: Some(titles.category.to_string()),
            y_label: Some(titles.derived_axis.to_string()),
            data: ChartData::Bar(bars),
        })
    }

    /// Sum of sale values per calendar day, oldest first.
    fn time_series_chart(&self, dataset: &Dataset) -> Result<Chart> {
        let date_idx = dataset.column_index(SALES_DATE_COLUMN)?;
        let value_idx = dataset.column_index(self.variant.value_column())?;

        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (row_number, row) in dataset.rows().iter().enumerate() {
            let date = coerce_date(&row[date_idx]).map_err(|e| at_row(e, row_number))?;
            let value = coerce_number(&row[value_idx]).map_err(|e| at_row(e, row_number))?;
            if let (Some(date), Some(value)) = (date, value) {
                *totals.entry(date).or_insert(0.0) += value;
            }
        }

        let points = totals
            .into_iter()
            .map(|(date, value)| LinePoint { date, value })
            .collect();

        Ok(Chart {
            id: TIME_SERIES_CHART,
            title: "Faturamento por Data".to_string(),
            x_label: Some("Data".to_string()),
            y_label: Some("Valor de Venda".to_string()),
            data: ChartData::Line(points),
        })
    }
}

struct ChartTitles {
    category: &'static str,
    distribution: &'static str,
    spread: &'static str,
    spread_axis: &'static str,
    derived: &'static str,
    derived_axis: &'static str,
}

/// Groups `value_column` by `category_column`, sorted by category. Rows with
/// an empty category are ignored, as are values the extractor maps to `None`.
fn group_by_category<F>(
    dataset: &Dataset,
    category_column: &str,
    value_column: &str,
    extract: F,
) -> Result<BTreeMap<String, Vec<f64>>>
where
    F: Fn(&CellValue) -> Result<Option<f64>>,
{
    let category_idx = dataset.column_index(category_column)?;
    let value_idx = dataset.column_index(value_column)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (row_number, row) in dataset.rows().iter().enumerate() {
        let category = &row[category_idx];
        if category.is_empty() {
            continue;
        }
        if let Some(value) = extract(&row[value_idx]).map_err(|e| at_row(e, row_number))? {
            groups.entry(category.to_string()).or_default().push(value);
        }
    }

    Ok(groups)
}

fn at_row(err: AppError, row_number: usize) -> AppError {
    AppError::ParseError(format!("linha {}: {}", row_number, error_detail(&err)))
}

fn error_detail(err: &AppError) -> String {
    match err {
        AppError::ParseError(msg) | AppError::DatasetError(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn five_number_summary(category: String, mut values: Vec<f64>) -> BoxSummary {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    BoxSummary {
        category,
        count: values.len(),
        min: values[0],
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max: values[values.len() - 1],
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
