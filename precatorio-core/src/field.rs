//! Wire column name -> canonical field mapping.

use crate::coerce::{FieldType, FieldValue};
use crate::record::CanonicalField;
use once_cell::sync::Lazy;
use regex::Regex;

static AGGREGATION_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*\((.+)\)$").expect("Invalid aggregation regex")
});

/// Static description of one canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: CanonicalField,
    /// Base names the source has used for this column, preferred first.
    pub wire_base_names: &'static [&'static str],
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn default_value(&self) -> FieldValue {
        self.field_type.default_value()
    }
}

/// Canonical fields and the source columns feeding them.
pub const FIELD_TABLE: [FieldSpec; 9] = [
    FieldSpec {
        field: CanonicalField::Processo,
        wire_base_names: &["dfslcp_dsc_proc_precatorio"],
        field_type: FieldType::Identifier,
    },
    FieldSpec {
        field: CanonicalField::Comarca,
        wire_base_names: &["dfslcp_dsc_comarca"],
        field_type: FieldType::Text,
    },
    FieldSpec {
        field: CanonicalField::AnoOrcamento,
        wire_base_names: &["dfslcp_num_ano_orcamento"],
        field_type: FieldType::Integer,
    },
    FieldSpec {
        field: CanonicalField::Natureza,
        wire_base_names: &["dfslcp_dsc_natureza"],
        field_type: FieldType::Text,
    },
    FieldSpec {
        field: CanonicalField::DataCadastro,
        wire_base_names: &["dfslcp_dat_cadastro"],
        field_type: FieldType::Date,
    },
    FieldSpec {
        field: CanonicalField::TipoClassificacao,
        wire_base_names: &["dfslcp_dsc_tipo_classificao"],
        field_type: FieldType::Text,
    },
    FieldSpec {
        field: CanonicalField::ValorOriginal,
        wire_base_names: &["dfslcp_vlr_original"],
        field_type: FieldType::Decimal,
    },
    FieldSpec {
        field: CanonicalField::ValorAtual,
        wire_base_names: &["ValorAtualFormatado", "dfslcp_vlr_atual"],
        field_type: FieldType::Decimal,
    },
    FieldSpec {
        field: CanonicalField::Situacao,
        wire_base_names: &["dfslcp_dsc_sit_precatorio"],
        field_type: FieldType::Text,
    },
];

/// Resolve a wire column name to its base name.
///
/// Strips an outer aggregation wrapper (`Sum(Table.Column)`) and then any
/// `Table.` prefix.
pub fn base_name(wire_name: &str) -> &str {
    let trimmed = wire_name.trim();
    let inner = AGGREGATION_WRAPPER
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());
    match inner.rfind('.') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    }
}

/// Look up the canonical field fed by a base name.
pub fn spec_for_base_name(base: &str) -> Option<&'static FieldSpec> {
    FIELD_TABLE
        .iter()
        .find(|spec| spec.wire_base_names.iter().any(|name| *name == base))
}

/// Column index -> field binding for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapper {
    by_column: Vec<Option<&'static FieldSpec>>,
    unmapped: Vec<CanonicalField>,
}

impl FieldMapper {
    /// Bind a page's described columns to canonical fields.
    ///
    /// Columns with no canonical counterpart are ignored. When two columns
    /// feed the same field the first one wins.
    ///
    /// # Arguments
    /// * `wire_names` - Column wire names in descriptor order
    pub fn bind<S: AsRef<str>>(wire_names: &[S]) -> Self {
        let mut by_column = Vec::with_capacity(wire_names.len());
        let mut seen: Vec<CanonicalField> = Vec::new();
        for name in wire_names {
            let spec = spec_for_base_name(base_name(name.as_ref()))
                .filter(|spec| !seen.contains(&spec.field));
            if let Some(spec) = spec {
                seen.push(spec.field);
            }
            by_column.push(spec);
        }
        let unmapped = CanonicalField::ALL
            .iter()
            .copied()
            .filter(|field| !seen.contains(field))
            .collect();
        Self {
            by_column,
            unmapped,
        }
    }

    /// Field bound to `column`, if any.
    pub fn field_for(&self, column: usize) -> Option<&'static FieldSpec> {
        self.by_column.get(column).copied().flatten()
    }

    /// `(column index, field)` pairs for every bound column.
    pub fn bound_columns(&self) -> impl Iterator<Item = (usize, &'static FieldSpec)> + '_ {
        self.by_column
            .iter()
            .enumerate()
            .filter_map(|(idx, spec)| spec.map(|s| (idx, s)))
    }

    /// Canonical fields no column feeds on this page. They keep their default.
    pub fn unmapped_fields(&self) -> &[CanonicalField] {
        &self.unmapped
    }

    pub fn column_count(&self) -> usize {
        self.by_column.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
