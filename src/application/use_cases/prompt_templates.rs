//! Static prompt bodies, one per analytical persona.
//!
//! Every body carries `{available_data}` and `{question}`; the whole rendered
//! text is sent as a single user message.

use crate::domain::prompt::{PromptTemplate, TemplateId};

pub const HR_MASTER: PromptTemplate = PromptTemplate::new(
    TemplateId::HrMaster,
    r#"Você é o agente mestre do sistema de RH, especializado em análise de dados.
IMPORTANTE: RESPONDA SEMPRE EM PORTUGUÊS DO BRASIL.

Analise os dados e coordene a resposta mais adequada:
{available_data}

Pergunta: {question}

Forneça uma análise completa e profissional, sempre em português."#,
);

pub const HR_SPECIALIST: PromptTemplate = PromptTemplate::new(
    TemplateId::HrSpecialist,
    r#"Como especialista em RH, analise os dados focando em gestão de pessoas.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const DATA_SPECIALIST: PromptTemplate = PromptTemplate::new(
    TemplateId::DataSpecialist,
    r#"Como analista de dados de RH, forneça insights quantitativos.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const CAREER_SPECIALIST: PromptTemplate = PromptTemplate::new(
    TemplateId::CareerSpecialist,
    r#"Como especialista em carreira e remuneração, analise os dados.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const SALES_MASTER: PromptTemplate = PromptTemplate::new(
    TemplateId::SalesMaster,
    r#"Você é o agente mestre de análise comercial de uma distribuidora de autopeças.
IMPORTANTE: RESPONDA SEMPRE EM PORTUGUÊS DO BRASIL.

Analise os dados de vendas abaixo e responda com base neles:
{available_data}

Pergunta: {question}

Forneça uma análise completa e profissional, citando valores em R$ quando fizer sentido."#,
);

pub const SALESPERSON_VARIANCE: PromptTemplate = PromptTemplate::new(
    TemplateId::SalespersonVariance,
    r#"Como analista de desempenho comercial, calcule a variação das vendas por vendedor
(valor total, ticket médio e variação percentual entre períodos) e destaque os extremos.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const MARGIN_RANKING: PromptTemplate = PromptTemplate::new(
    TemplateId::MarginRanking,
    r#"Como analista de rentabilidade, monte um ranking das regionais pela margem percentual
média, indicando a regional com a melhor margem e a diferença para as demais.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const TAX_IMPACT: PromptTemplate = PromptTemplate::new(
    TemplateId::TaxImpact,
    r#"Como especialista tributário, avalie o impacto dos impostos sobre o faturamento e a
margem, separando valores brutos e líquidos sempre que os dados permitirem.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const REVENUE_PROJECTION: PromptTemplate = PromptTemplate::new(
    TemplateId::RevenueProjection,
    r#"Como analista de planejamento financeiro, projete o faturamento futuro a partir da série
histórica de vendas. Explique a premissa usada (tendência, sazonalidade) e apresente a
projeção mês a mês.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub const CHURN_ANALYSIS: PromptTemplate = PromptTemplate::new(
    TemplateId::ChurnAnalysis,
    r#"Como analista de relacionamento com clientes, compare os clientes ativos em 2023 e em
2024, identifique quem deixou de comprar e estime o faturamento perdido.
RESPONDA EM PORTUGUÊS DO BRASIL.

Dados: {available_data}
Pergunta: {question}"#,
);

pub fn template(id: TemplateId) -> &'static PromptTemplate {
    match id {
        TemplateId::HrMaster => &HR_MASTER,
        TemplateId::HrSpecialist => &HR_SPECIALIST,
        TemplateId::DataSpecialist => &DATA_SPECIALIST,
        TemplateId::CareerSpecialist => &CAREER_SPECIALIST,
        TemplateId::SalesMaster => &SALES_MASTER,
        TemplateId::SalespersonVariance => &SALESPERSON_VARIANCE,
        TemplateId::MarginRanking => &MARGIN_RANKING,
        TemplateId::TaxImpact => &TAX_IMPACT,
        TemplateId::RevenueProjection => &REVENUE_PROJECTION,
        TemplateId::ChurnAnalysis => &CHURN_ANALYSIS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prompt::{AVAILABLE_DATA_PLACEHOLDER, QUESTION_PLACEHOLDER};

    #[test]
    fn test_every_template_has_both_placeholders() {
        let all = [
            HR_MASTER,
            HR_SPECIALIST,
            DATA_SPECIALIST,
            CAREER_SPECIALIST,
            SALES_MASTER,
            SALESPERSON_VARIANCE,
            MARGIN_RANKING,
            TAX_IMPACT,
            REVENUE_PROJECTION,
            CHURN_ANALYSIS,
        ];
        for t in all {
            assert!(t.body.contains(AVAILABLE_DATA_PLACEHOLDER), "{:?}", t.id);
            assert!(t.body.contains(QUESTION_PLACEHOLDER), "{:?}", t.id);
            assert_eq!(template(t.id).id, t.id);
        }
    }
}
