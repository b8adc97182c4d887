use chrono::NaiveDate;
use serde::Serialize;

/// Chart description handed to the rendering layer. Carries data, not pixels.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Chart {
    pub id: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(flatten)]
    pub data: ChartData,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ChartData {
    Pie(Vec<PieSlice>),
    Box(Vec<BoxSummary>),
    Bar(Vec<BarPoint>),
    Line(Vec<LinePoint>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub proportion: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoxSummary {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarPoint {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub charts: Vec<Chart>,
    pub warnings: Vec<String>,
}

impl Dashboard {
    #[cfg(test)]
    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.id == id)
    }
}
