//! Canonical precatório record and its fixed column order.

use crate::coerce::FieldValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output column order shared by every sink. The header is always this list.
pub const CSV_COLUMNS: [&str; 10] = [
    "ordem",
    "processo",
    "comarca",
    "ano_orcamento",
    "natureza",
    "data_cadastro",
    "tipo_classificacao",
    "valor_original",
    "valor_atual",
    "situacao",
];

/// Record fields that are populated from the wire. `ordem` is not one of
/// them: it is assigned by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Processo,
    Comarca,
    AnoOrcamento,
    Natureza,
    DataCadastro,
    TipoClassificacao,
    ValorOriginal,
    ValorAtual,
    Situacao,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::Processo,
        CanonicalField::Comarca,
        CanonicalField::AnoOrcamento,
        CanonicalField::Natureza,
        CanonicalField::DataCadastro,
        CanonicalField::TipoClassificacao,
        CanonicalField::ValorOriginal,
        CanonicalField::ValorAtual,
        CanonicalField::Situacao,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Processo => "processo",
            CanonicalField::Comarca => "comarca",
            CanonicalField::AnoOrcamento => "ano_orcamento",
            CanonicalField::Natureza => "natureza",
            CanonicalField::DataCadastro => "data_cadastro",
            CanonicalField::TipoClassificacao => "tipo_classificacao",
            CanonicalField::ValorOriginal => "valor_original",
            CanonicalField::ValorAtual => "valor_atual",
            CanonicalField::Situacao => "situacao",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One precatório as exported downstream. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Crawl-wide sequence number, 1-based.
    pub ordem: u64,
    pub processo: String,
    pub comarca: String,
    pub ano_orcamento: i64,
    pub natureza: String,
    pub data_cadastro: Option<DateTime<Utc>>,
    pub tipo_classificacao: String,
    pub valor_original: Decimal,
    pub valor_atual: Decimal,
    pub situacao: String,
}

impl CanonicalRecord {
    /// Record with every field at its default and the given sequence number.
    pub fn empty(ordem: u64) -> Self {
        Self {
            ordem,
            processo: crate::TEXT_SENTINEL.to_string(),
            comarca: crate::TEXT_SENTINEL.to_string(),
            ano_orcamento: 0,
            natureza: crate::TEXT_SENTINEL.to_string(),
            data_cadastro: None,
            tipo_classificacao: crate::TEXT_SENTINEL.to_string(),
            valor_original: Decimal::new(0, 2),
            valor_atual: Decimal::new(0, 2),
            situacao: crate::TEXT_SENTINEL.to_string(),
        }
    }

    /// Store a coerced value into the slot for `field`.
    ///
    /// A value whose variant does not match the field's type leaves the
    /// slot untouched and returns `false`.
    pub fn set(&mut self, field: CanonicalField, value: FieldValue) -> bool {
        match (field, value) {
            (CanonicalField::Processo, FieldValue::Identifier(v)) => self.processo = v,
            (CanonicalField::Comarca, FieldValue::Text(v)) => self.comarca = v,
            (CanonicalField::AnoOrcamento, FieldValue::Integer(v)) => self.ano_orcamento = v,
            (CanonicalField::Natureza, FieldValue::Text(v)) => self.natureza = v,
            (CanonicalField::DataCadastro, FieldValue::Date(v)) => self.data_cadastro = v,
            (CanonicalField::TipoClassificacao, FieldValue::Text(v)) => {
                self.tipo_classificacao = v
            }
            (CanonicalField::ValorOriginal, FieldValue::Decimal(v)) => self.valor_original = v,
            (CanonicalField::ValorAtual, FieldValue::Decimal(v)) => self.valor_atual = v,
            (CanonicalField::Situacao, FieldValue::Text(v)) => self.situacao = v,
            _ => return false,
        }
        true
    }

    /// Render the record in `CSV_COLUMNS` order.
    pub fn to_row(&self) -> [String; 10] {
        [
            self.ordem.to_string(),
            self.processo.clone(),
            self.comarca.clone(),
            self.ano_orcamento.to_string(),
            self.natureza.clone(),
            self.data_cadastro
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_default(),
            self.tipo_classificacao.clone(),
            self.valor_original.to_string(),
            self.valor_atual.to_string(),
            self.situacao.clone(),
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================
