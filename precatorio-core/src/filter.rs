//! Post-crawl record filtering and ordering.

use crate::record::CanonicalRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Conjunction of optional bounds over crawled records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Minimum `ano_orcamento`, inclusive
    pub ano_min: Option<i64>,
    /// Maximum `ano_orcamento`, inclusive
    pub ano_max: Option<i64>,
    /// Minimum `valor_atual`, inclusive
    pub valor_min: Option<Decimal>,
    /// Maximum `valor_atual`, inclusive
    pub valor_max: Option<Decimal>,
    /// Exact `natureza`, compared case-insensitively
    pub natureza: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        if self.ano_min.is_some_and(|min| record.ano_orcamento < min) {
            return false;
        }
        if self.ano_max.is_some_and(|max| record.ano_orcamento > max) {
            return false;
        }
        if self.valor_min.is_some_and(|min| record.valor_atual < min) {
            return false;
        }
        if self.valor_max.is_some_and(|max| record.valor_atual > max) {
            return false;
        }
        match &self.natureza {
            Some(natureza) => record.natureza.to_lowercase() == natureza.trim().to_lowercase(),
            None => true,
        }
    }

    /// Keep only matching records, preserving their order.
    pub fn apply(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Column records can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Ordem,
    Processo,
    Comarca,
    AnoOrcamento,
    Natureza,
    DataCadastro,
    ValorOriginal,
    ValorAtual,
    Situacao,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort specification applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOrder {
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl RecordOrder {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &CanonicalRecord, b: &CanonicalRecord) -> Ordering {
        let ordering = match self.key {
            SortKey::Ordem => a.ordem.cmp(&b.ordem),
            SortKey::Processo => a.processo.cmp(&b.processo),
            SortKey::Comarca => a.comarca.cmp(&b.comarca),
            SortKey::AnoOrcamento => a.ano_orcamento.cmp(&b.ano_orcamento),
            SortKey::Natureza => a.natureza.cmp(&b.natureza),
            SortKey::DataCadastro => a.data_cadastro.cmp(&b.data_cadastro),
            SortKey::ValorOriginal => a.valor_original.cmp(&b.valor_original),
            SortKey::ValorAtual => a.valor_atual.cmp(&b.valor_atual),
            SortKey::Situacao => a.situacao.cmp(&b.situacao),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Stable sort, ties keep crawl order.
    pub fn sort(&self, records: &mut [CanonicalRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

// ============================================================================
// TESTS
// ============================================================================
