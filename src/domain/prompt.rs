use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    HrMaster,
    HrSpecialist,
    DataSpecialist,
    CareerSpecialist,
    SalesMaster,
    SalespersonVariance,
    MarginRanking,
    TaxImpact,
    RevenueProjection,
    ChurnAnalysis,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::HrMaster => "hr_master",
            TemplateId::HrSpecialist => "hr_specialist",
            TemplateId::DataSpecialist => "data_specialist",
            TemplateId::CareerSpecialist => "career_specialist",
            TemplateId::SalesMaster => "sales_master",
            TemplateId::SalespersonVariance => "salesperson_variance",
            TemplateId::MarginRanking => "margin_ranking",
            TemplateId::TaxImpact => "tax_impact",
            TemplateId::RevenueProjection => "revenue_projection",
            TemplateId::ChurnAnalysis => "churn_analysis",
        }
    }
}

pub const AVAILABLE_DATA_PLACEHOLDER: &str = "{available_data}";
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Static prompt body bound to one analytical persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub body: &'static str,
}

impl PromptTemplate {
    pub const fn new(id: TemplateId, body: &'static str) -> Self {
        Self { id, body }
    }

    /// Fills both placeholders in a single pass, so a question that happens to
    /// contain `{available_data}` is never expanded.
    pub fn render(&self, available_data: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.body.len() + available_data.len() + question.len());
        let mut rest = self.body;

        loop {
            let data_pos = rest.find(AVAILABLE_DATA_PLACEHOLDER);
            let question_pos = rest.find(QUESTION_PLACEHOLDER);

            let (pos, placeholder, value) = match (data_pos, question_pos) {
                (Some(d), Some(q)) if d < q => (d, AVAILABLE_DATA_PLACEHOLDER, available_data),
                (Some(_), Some(q)) => (q, QUESTION_PLACEHOLDER, question),
                (Some(d), None) => (d, AVAILABLE_DATA_PLACEHOLDER, available_data),
                (None, Some(q)) => (q, QUESTION_PLACEHOLDER, question),
                (None, None) => break,
            };

            out.push_str(&rest[..pos]);
            out.push_str(value);
            rest = &rest[pos + placeholder.len()..];
        }

        out.push_str(rest);
        out
    }
}
