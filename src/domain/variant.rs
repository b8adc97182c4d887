use serde::{Deserialize, Serialize};

/// Which dataset flavour this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    #[serde(alias = "rh")]
    Hr,
    #[serde(alias = "vendas")]
    Sales,
}

impl DatasetVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "hr",
            DatasetVariant::Sales => "sales",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "Assistente de RH Analytics",
            DatasetVariant::Sales => "Assistente de Vendas Analytics",
        }
    }

    pub fn default_dataset_path(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "dados_rh.xlsx",
            DatasetVariant::Sales => "dados_vendas.xlsx",
        }
    }

    /// Column used to group every chart.
    pub fn category_column(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "departamento",
            DatasetVariant::Sales => "regional",
        }
    }

    /// Main monetary column.
    pub fn value_column(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "salario",
            DatasetVariant::Sales => "valor_venda",
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Hr => &["departamento", "salario", "avaliacoes"],
            DatasetVariant::Sales => &["regional", "valor_venda", "data_venda", "margem_percentual"],
        }
    }

    pub fn suggested_questions(&self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Hr => &[
                "Qual departamento tem maior média salarial?",
                "Quais são as habilidades mais comuns na TI?",
                "Como está o clima organizacional por departamento?",
                "Quais são as tendências de desenvolvimento de carreira?",
            ],
            DatasetVariant::Sales => &[
                "Qual a variação de vendas por vendedor?",
                "Qual regional tem a melhor margem?",
                "Qual o impacto do imposto sobre o faturamento?",
                "Projete o faturamento para os próximos 6 meses.",
                "Quais clientes compraram em 2023 e não voltaram em 2024?",
            ],
        }
    }

    pub fn input_placeholder(&self) -> &'static str {
        match self {
            DatasetVariant::Hr => "Digite sua pergunta sobre os dados de RH...",
            DatasetVariant::Sales => "Digite sua pergunta sobre os dados de vendas...",
        }
    }
}
