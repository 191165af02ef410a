//! Decoded rows -> canonical records.

use crate::decoder::{Cell, DecodedPage, DecodedRow};
use precatorio_core::{CanonicalField, CanonicalRecord, FieldMapper, ValueCoercer};

/// Crawl-wide `ordem` counter. Starts at 1, never repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdemSequence {
    next: u64,
}

impl Default for OrdemSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl OrdemSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next value.
    pub fn advance(&mut self) -> u64 {
        let current = self.next;
        self.next += 1;
        current
    }

    /// How many values have been handed out.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

/// A field that kept its default because the wire value was unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFallback {
    /// Row index within the page.
    pub row: usize,
    pub field: CanonicalField,
    pub reason: String,
}

/// Records built from one page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssembledPage {
    pub records: Vec<CanonicalRecord>,
    pub fallbacks: Vec<FieldFallback>,
}

/// Binds a page's columns to canonical fields and coerces every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAssembler {
    coercer: ValueCoercer,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one record per decoded row.
    ///
    /// # Arguments
    /// * `page` - Decoded page
    /// * `ordem` - Crawl-wide sequence, advanced once per row
    pub fn assemble(&self, page: &DecodedPage, ordem: &mut OrdemSequence) -> AssembledPage {
        let wire_names = page.wire_names();
        let mapper = FieldMapper::bind(&wire_names);
        if !page.rows.is_empty() && !mapper.unmapped_fields().is_empty() {
            tracing::debug!(
                unmapped = ?mapper.unmapped_fields(),
                "Fields without a source column keep their defaults"
            );
        }

        let mut assembled = AssembledPage {
            records: Vec::with_capacity(page.rows.len()),
            fallbacks: Vec::new(),
        };
        for (row_idx, row) in page.rows.iter().enumerate() {
            let record = self.assemble_row(row_idx, row, &mapper, ordem.advance(), &mut assembled.fallbacks);
            assembled.records.push(record);
        }
        assembled
    }

    fn assemble_row(
        &self,
        row_idx: usize,
        row: &DecodedRow,
        mapper: &FieldMapper,
        ordem: u64,
        fallbacks: &mut Vec<FieldFallback>,
    ) -> CanonicalRecord {
        let mut record = CanonicalRecord::empty(ordem);
        for (column, spec) in mapper.bound_columns() {
            let value = match row.cells.get(column) {
                Some(Cell::Value(raw)) => {
                    let coerced = self.coercer.coerce(spec.field_type, raw);
                    if let Some(reason) = coerced.fallback {
                        tracing::warn!(row = row_idx, field = %spec.field, %reason, "Coercion fell back to default");
                        fallbacks.push(FieldFallback {
                            row: row_idx,
                            field: spec.field,
                            reason,
                        });
                    }
                    coerced.value
                }
                Some(Cell::Default) | None => spec.default_value(),
            };
            record.set(spec.field, value);
        }
        record
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::PageDecoder;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;

    const T: &str = "dfslcp_SAPRE_LISTA_CRONO_PRECATORIO";

    fn page(rows: Value, dicts: Value) -> DecodedPage {
        let select = json!([
            {"Value": "G0", "Name": format!("{T}.dfslcp_dsc_proc_precatorio")},
            {"Value": "G1", "Name": format!("Sum({T}.dfslcp_num_ano_orcamento)")},
            {"Value": "G2", "Name": format!("{T}.dfslcp_dsc_comarca")},
            {"Value": "G3", "Name": format!("{T}.dfslcp_dat_cadastro")},
            {"Value": "G4", "Name": format!("Sum({T}.dfslcp_vlr_original)")},
            {"Value": "G5", "Name": format!("{T}.ValorAtualFormatado")},
            {"Value": "G6", "Name": format!("{T}.unrelated")}
        ]);
        let body = json!({"results": [{"result": {"data": {
            "descriptor": {"Select": select},
            "dsr": {"DS": [{"PH": [{"DM0": rows}], "ValueDicts": dicts}]}
        }}}]});
        PageDecoder.decode_json(&body).unwrap()
    }

    fn schema() -> Value {
        json!([
            {"N": "G0"}, {"N": "G1"}, {"N": "G2", "DN": "D0"}, {"N": "G3"},
            {"N": "G4"}, {"N": "G5"}, {"N": "G6"}
        ])
    }

    #[test]
    fn test_assembles_typed_record() {
        let decoded = page(
            json!([{"S": schema(), "C": [
                "0001234-56.2020.8.06.0001", 2024, 0, "datetime(2022,1,15,0,0,0)",
                "1.234,56", "R$ 2.000,00", "ignored"
            ]}]),
            json!({"D0": ["FORTALEZA"]}),
        );
        let mut ordem = OrdemSequence::new();
        let assembled = RecordAssembler::new().assemble(&decoded, &mut ordem);
        assert!(assembled.fallbacks.is_empty());
        let record = &assembled.records[0];
        assert_eq!(record.ordem, 1);
        assert_eq!(record.processo, "0001234-56.2020.8.06.0001");
        assert_eq!(record.ano_orcamento, 2024);
        assert_eq!(record.comarca, "FORTALEZA");
        assert_eq!(
            record.data_cadastro,
            Some(Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(record.valor_original, Decimal::from_str("1234.56").unwrap());
        assert_eq!(record.valor_atual, Decimal::from_str("2000").unwrap());
        assert_eq!(record.natureza, "-");
        assert_eq!(ordem.issued(), 1);
    }

    #[test]
    fn test_ordem_continues_across_pages() {
        let rows = json!([
            {"S": schema(), "C": [1, 2024, 0, null, "1", "1", "x"]},
            {"C": [2], "R": 0b1111110},
            {"C": [3], "R": 0b1111110}
        ]);
        let decoded = page(rows, json!({"D0": ["A"]}));
        let mut ordem = OrdemSequence::new();
        let assembler = RecordAssembler::new();
        let first = assembler.assemble(&decoded, &mut ordem);
        let second = assembler.assemble(&decoded, &mut ordem);
        let ordens: Vec<u64> = first
            .records
            .iter()
            .chain(second.records.iter())
            .map(|r| r.ordem)
            .collect();
        assert_eq!(ordens, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(first.records[2].processo, "00000000000000000003");
    }

    #[test]
    fn test_unreadable_values_fall_back() {
        let decoded = page(
            json!([{"S": schema(), "C": ["P", "abc", 7, "nunca", "x", "", "y"]}]),
            json!({"D0": ["A"]}),
        );
        let assembled = RecordAssembler::new().assemble(&decoded, &mut OrdemSequence::new());
        let record = &assembled.records[0];
        assert_eq!(record.ano_orcamento, 0);
        assert_eq!(record.comarca, "-");
        assert_eq!(record.data_cadastro, None);
        assert_eq!(record.valor_original, Decimal::ZERO);
        assert_eq!(record.valor_atual, Decimal::ZERO);
        let fields: Vec<CanonicalField> = assembled.fallbacks.iter().map(|f| f.field).collect();
        assert_eq!(
            fields,
            vec![
                CanonicalField::AnoOrcamento,
                CanonicalField::DataCadastro,
                CanonicalField::ValorOriginal
            ]
        );
    }
}
