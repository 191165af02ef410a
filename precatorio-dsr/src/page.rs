//! Typed intermediate form of one response page.
//!
//! `ParsedPage::from_json` is the only place that walks the raw envelope and
//! decides whether a page is structurally usable. Everything downstream
//! works on `ColumnDescriptor`, `ValueDictionary`, `RowSchema` and `RawRow`.

use crate::wire::{QueryResponse, SchemaEntry, WireRow};
use precatorio_core::{base_name, DecodeError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// TYPES
// ============================================================================

/// One queried column, in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub index: usize,
    pub wire_name: String,
    /// Row-level group identifier (`G0`...), when the descriptor names one.
    pub group_id: Option<String>,
}

impl ColumnDescriptor {
    /// Wire name with aggregation wrapper and table prefix removed.
    pub fn base_name(&self) -> &str {
        base_name(&self.wire_name)
    }
}

/// Lookup failure against a `ValueDictionary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryLookup {
    MissingDictionary,
    NonIntegerIndex,
    OutOfRange { len: usize },
}

/// Page-scoped interned values, referenced by integer index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueDictionary {
    dictionaries: BTreeMap<String, Vec<Value>>,
}

impl ValueDictionary {
    pub fn new(dictionaries: BTreeMap<String, Vec<Value>>) -> Self {
        Self { dictionaries }
    }

    /// Resolve `index` (a wire value) against dictionary `name`.
    pub fn resolve(&self, name: &str, index: &Value) -> Result<&Value, DictionaryLookup> {
        let entries = self
            .dictionaries
            .get(name)
            .ok_or(DictionaryLookup::MissingDictionary)?;
        let idx = dictionary_index(index).ok_or(DictionaryLookup::NonIntegerIndex)?;
        entries
            .get(idx)
            .ok_or(DictionaryLookup::OutOfRange { len: entries.len() })
    }

    pub fn len(&self, name: &str) -> Option<usize> {
        self.dictionaries.get(name).map(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

/// Indices arrive as JSON integers, occasionally as digit strings.
fn dictionary_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One schema slot per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSlot {
    pub group_id: Option<String>,
    pub dict_ref: Option<String>,
}

/// Column schema established by the first row of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSchema {
    pub slots: Vec<SchemaSlot>,
}

impl RowSchema {
    fn from_wire(entries: &[SchemaEntry]) -> Self {
        Self {
            slots: entries
                .iter()
                .map(|e| SchemaSlot {
                    group_id: e.name.clone(),
                    dict_ref: e.dict_name.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn dict_ref(&self, column: usize) -> Option<&str> {
        self.slots.get(column).and_then(|s| s.dict_ref.as_deref())
    }
}

/// A row before delta expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub sparse_values: Vec<Value>,
    /// Bit i set: column i repeats the previous row. Absent on base rows.
    pub inherit_mask: Option<u64>,
}

impl RawRow {
    fn from_wire(row: WireRow) -> Self {
        Self {
            sparse_values: row.values,
            inherit_mask: row.repeat_mask,
        }
    }

    pub fn inherits(&self, column: usize) -> bool {
        match self.inherit_mask {
            Some(mask) if column < 64 => mask & (1u64 << column) != 0,
            _ => false,
        }
    }
}

/// Opaque restart token echoed back to fetch the next window.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(pub Value);

impl ContinuationToken {
    /// `None` for null and empty tokens, which mean "no more data".
    pub fn from_wire(value: Value) -> Option<Self> {
        let empty = match &value {
            Value::Null => true,
            Value::Array(items) => items.iter().all(|item| match item {
                Value::Array(inner) => inner.is_empty(),
                Value::Null => true,
                _ => false,
            }),
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if empty {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A structurally valid page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub columns: Vec<ColumnDescriptor>,
    pub dictionaries: ValueDictionary,
    /// Absent when the page has no rows.
    pub schema: Option<RowSchema>,
    pub rows: Vec<RawRow>,
    pub continuation: Option<ContinuationToken>,
}

// ============================================================================
// PARSING
// ============================================================================

impl ParsedPage {
    /// Validate and convert a raw response body.
    ///
    /// # Errors
    /// - `NoData` when `results[0].result.data.dsr.DS[0]` is absent
    /// - `MissingDescriptor` when there is no column list
    /// - `MissingSchema` / `SchemaMismatch` when the first row's schema is
    ///   absent or does not cover exactly the described columns
    /// - `Malformed` when a level has the wrong JSON shape
    pub fn from_json(body: &Value) -> Result<Self, DecodeError> {
        let response = QueryResponse::deserialize(body).map_err(|e| DecodeError::Malformed {
            reason: e.to_string(),
        })?;
        Self::from_wire(response)
    }

    pub fn from_wire(response: QueryResponse) -> Result<Self, DecodeError> {
        let data = response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.result)
            .and_then(|r| r.data)
            .ok_or(DecodeError::NoData {
                missing: "results[0].result.data",
            })?;
        let dsr = data.dsr.ok_or(DecodeError::NoData { missing: "dsr" })?;
        let data_set = dsr
            .data_sets
            .into_iter()
            .next()
            .ok_or(DecodeError::NoData { missing: "dsr.DS[0]" })?;

        let columns: Vec<ColumnDescriptor> = data
            .descriptor
            .map(|d| d.select)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, select)| ColumnDescriptor {
                index,
                wire_name: select
                    .name
                    .or_else(|| select.value.clone())
                    .unwrap_or_default(),
                group_id: select.value,
            })
            .collect();
        if columns.is_empty() {
            return Err(DecodeError::MissingDescriptor);
        }

        let continuation = data_set
            .restart_tokens
            .and_then(ContinuationToken::from_wire);
        let dictionaries = ValueDictionary::new(data_set.value_dicts);
        let wire_rows = data_set
            .primary
            .into_iter()
            .next()
            .map(|ph| ph.rows)
            .unwrap_or_default();

        let schema = match wire_rows.first() {
            None => None,
            Some(base) => {
                let entries = base.schema.as_deref().ok_or(DecodeError::MissingSchema)?;
                if entries.len() != columns.len() {
                    return Err(DecodeError::SchemaMismatch {
                        columns: columns.len(),
                        schema: entries.len(),
                    });
                }
                Some(RowSchema::from_wire(entries))
            }
        };

        Ok(Self {
            columns,
            dictionaries,
            schema,
            rows: wire_rows.into_iter().map(RawRow::from_wire).collect(),
            continuation,
        })
    }
}

/// Pull the restart token out of a raw body without validating the rest.
///
/// Used when a page fails structural validation but may still point at the
/// next window.
pub fn extract_continuation(body: &Value) -> Option<ContinuationToken> {
    body.pointer("/results/0/result/data/dsr/DS/0/RT")
        .cloned()
        .and_then(ContinuationToken::from_wire)
}

// ============================================================================
// TESTS
// ============================================================================
