//! Keyword router selecting the prompt template for a query.
//!
//! Rules are evaluated in order over the lower-cased query and the first
//! match wins. Matching is plain substring search: no stemming or
//! tokenization, so "climatização" still triggers the "clima" rule.

use crate::domain::prompt::TemplateId;
use crate::domain::variant::DatasetVariant;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "keywords", rename_all = "snake_case")]
pub enum KeywordMatch {
    /// At least one keyword occurs in the query.
    Any(&'static [&'static str]),
    /// Every keyword occurs in the query.
    All(&'static [&'static str]),
}

impl KeywordMatch {
    pub fn matches(&self, query_lower: &str) -> bool {
        match self {
            KeywordMatch::Any(keywords) => keywords.iter().any(|k| query_lower.contains(k)),
            KeywordMatch::All(keywords) => keywords.iter().all(|k| query_lower.contains(k)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutingRule {
    pub trigger: KeywordMatch,
    pub template: TemplateId,
}

const HR_RULES: &[RoutingRule] = &[
    RoutingRule {
        trigger: KeywordMatch::Any(&["cultura", "equipe", "gestão", "clima"]),
        template: TemplateId::HrSpecialist,
    },
    RoutingRule {
        trigger: KeywordMatch::Any(&["média", "número", "percentual", "quantidade"]),
        template: TemplateId::DataSpecialist,
    },
    RoutingRule {
        trigger: KeywordMatch::Any(&["salário", "carreira", "desenvolvimento", "habilidades"]),
        template: TemplateId::CareerSpecialist,
    },
];

const SALES_RULES: &[RoutingRule] = &[
    RoutingRule {
        trigger: KeywordMatch::All(&["variação", "vendedor"]),
        template: TemplateId::SalespersonVariance,
    },
    RoutingRule {
        trigger: KeywordMatch::All(&["melhor margem", "regional"]),
        template: TemplateId::MarginRanking,
    },
    RoutingRule {
        trigger: KeywordMatch::All(&["impacto", "imposto"]),
        template: TemplateId::TaxImpact,
    },
    RoutingRule {
        trigger: KeywordMatch::All(&["projete", "faturamento"]),
        template: TemplateId::RevenueProjection,
    },
    RoutingRule {
        trigger: KeywordMatch::All(&["clientes", "2023", "2024"]),
        template: TemplateId::ChurnAnalysis,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum RouteMatch {
    Rule(usize),
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub template: TemplateId,
    pub matched: RouteMatch,
}

#[derive(Debug, Clone)]
pub struct PromptRouter {
    rules: &'static [RoutingRule],
    default: TemplateId,
    master: TemplateId,
}

impl PromptRouter {
    pub fn for_variant(variant: DatasetVariant) -> Self {
        match variant {
            DatasetVariant::Hr => Self {
                rules: HR_RULES,
                default: TemplateId::HrSpecialist,
                master: TemplateId::HrMaster,
            },
            DatasetVariant::Sales => Self {
                rules: SALES_RULES,
                default: TemplateId::SalesMaster,
                master: TemplateId::SalesMaster,
            },
        }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        self.rules
    }

    pub fn default_template(&self) -> TemplateId {
        self.default
    }

    pub fn master_template(&self) -> TemplateId {
        self.master
    }

    pub fn route(&self, query: &str) -> RouteDecision {
        let query_lower = query.to_lowercase();

        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.trigger.matches(&query_lower))
            .map(|(idx, rule)| RouteDecision {
                template: rule.template,
                matched: RouteMatch::Rule(idx),
            })
            .unwrap_or(RouteDecision {
                template: self.default,
                matched: RouteMatch::Default,
            })
    }
}
