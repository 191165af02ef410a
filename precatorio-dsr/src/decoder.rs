//! Delta/dictionary row decoding.
//!
//! The base row carries one value per column. Every later row starts from
//! the previous row's decoded values and only carries values for columns
//! whose repeat bit is clear, in column order. Dictionary-backed columns
//! carry an index into the page's value dictionary instead of the value.

use crate::page::{ColumnDescriptor, ContinuationToken, DictionaryLookup, ParsedPage, RawRow};
use precatorio_core::DecodeError;
use serde_json::Value;
use thiserror::Error;

/// A decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Literal or dictionary-resolved wire value.
    Value(Value),
    /// Unresolvable on the wire; the field's default applies.
    Default,
}

impl Cell {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Default => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Value(value)
    }
}

/// A fully expanded row, one cell per described column.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub cells: Vec<Cell>,
}

/// Row-level problems that were recovered from.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowIssue {
    #[error("value dictionary '{dict}' is not present on the page")]
    MissingDictionary { dict: String },

    #[error("index {index} is out of range for dictionary '{dict}' of length {len}")]
    IndexOutOfRange { dict: String, index: String, len: usize },

    #[error("value {value} is not a valid index into dictionary '{dict}'")]
    NonIntegerIndex { dict: String, value: String },

    #[error("row needed {expected} value(s) but carried {supplied}; remaining columns inherited")]
    SparseExhausted { expected: usize, supplied: usize },

    #[error("row carried {surplus} value(s) beyond its clear bits; ignored")]
    SurplusValues { surplus: usize },

    #[error("base row carried {supplied} value(s) for {columns} column(s)")]
    ShortBaseRow { columns: usize, supplied: usize },
}

impl RowIssue {
    /// Whether some cell ended up with an inherited or default value instead
    /// of the one the row meant to carry. Surplus values lose nothing.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RowIssue::SurplusValues { .. })
    }
}

/// A recovered problem and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeIssue {
    /// Row index within the page.
    pub row: usize,
    pub column: Option<usize>,
    pub issue: RowIssue,
}

/// Output of decoding one page.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPage {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<DecodedRow>,
    pub issues: Vec<DecodeIssue>,
    pub continuation: Option<ContinuationToken>,
}

impl DecodedPage {
    pub fn wire_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.wire_name.as_str()).collect()
    }
}

/// Decodes pages. Stateless; all per-page state lives in `decode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageDecoder;

impl PageDecoder {
    /// Validate and decode a raw response body.
    ///
    /// # Errors
    /// Page-structural problems only (see `ParsedPage::from_json`). Row
    /// problems are recovered and reported in `DecodedPage::issues`.
    pub fn decode_json(&self, body: &Value) -> Result<DecodedPage, DecodeError> {
        let page = ParsedPage::from_json(body)?;
        Ok(self.decode(page))
    }

    /// Expand every row of a parsed page.
    pub fn decode(&self, page: ParsedPage) -> DecodedPage {
        let ParsedPage {
            columns,
            dictionaries,
            schema,
            rows,
            continuation,
        } = page;
        let schema = schema.unwrap_or_default();
        let width = columns.len();

        let mut issues = Vec::new();
        let mut decoded: Vec<DecodedRow> = Vec::with_capacity(rows.len());

        let resolve = |row: usize, column: usize, raw: &Value, issues: &mut Vec<DecodeIssue>| {
            let Some(dict) = schema.dict_ref(column) else {
                return Cell::Value(raw.clone());
            };
            match dictionaries.resolve(dict, raw) {
                Ok(value) => Cell::Value(value.clone()),
                Err(lookup) => {
                    let issue = match lookup {
                        DictionaryLookup::MissingDictionary => RowIssue::MissingDictionary {
                            dict: dict.to_string(),
                        },
                        DictionaryLookup::NonIntegerIndex => RowIssue::NonIntegerIndex {
                            dict: dict.to_string(),
                            value: raw.to_string(),
                        },
                        DictionaryLookup::OutOfRange { len } => RowIssue::IndexOutOfRange {
                            dict: dict.to_string(),
                            index: raw.to_string(),
                            len,
                        },
                    };
                    tracing::warn!(row, column, issue = %issue, "Dictionary lookup failed, using field default");
                    issues.push(DecodeIssue {
                        row,
                        column: Some(column),
                        issue,
                    });
                    Cell::Default
                }
            }
        };

        for (row_idx, raw) in rows.iter().enumerate() {
            let cells = match decoded.last() {
                None => decode_base_row(row_idx, raw, width, &resolve, &mut issues),
                Some(previous) => decode_delta_row(
                    row_idx,
                    raw,
                    &previous.cells,
                    &resolve,
                    &mut issues,
                ),
            };
            decoded.push(DecodedRow { cells });
        }

        DecodedPage {
            columns,
            rows: decoded,
            issues,
            continuation,
        }
    }
}

fn decode_base_row<F>(
    row_idx: usize,
    raw: &RawRow,
    width: usize,
    resolve: &F,
    issues: &mut Vec<DecodeIssue>,
) -> Vec<Cell>
where
    F: Fn(usize, usize, &Value, &mut Vec<DecodeIssue>) -> Cell,
{
    if raw.sparse_values.len() < width {
        let issue = RowIssue::ShortBaseRow {
            columns: width,
            supplied: raw.sparse_values.len(),
        };
        tracing::warn!(row = row_idx, issue = %issue, "Base row is short, missing columns use defaults");
        issues.push(DecodeIssue {
            row: row_idx,
            column: None,
            issue,
        });
    }
    (0..width)
        .map(|column| match raw.sparse_values.get(column) {
            Some(value) => resolve(row_idx, column, value, issues),
            None => Cell::Default,
        })
        .collect()
}

fn decode_delta_row<F>(
    row_idx: usize,
    raw: &RawRow,
    previous: &[Cell],
    resolve: &F,
    issues: &mut Vec<DecodeIssue>,
) -> Vec<Cell>
where
    F: Fn(usize, usize, &Value, &mut Vec<DecodeIssue>) -> Cell,
{
    let mut cells = previous.to_vec();
    let mut sparse = raw.sparse_values.iter();
    let mut expected = 0usize;

    for (column, cell) in cells.iter_mut().enumerate() {
        if raw.inherits(column) {
            continue;
        }
        expected += 1;
        if let Some(value) = sparse.next() {
            *cell = resolve(row_idx, column, value, issues);
        }
    }

    let supplied = raw.sparse_values.len();
    if supplied < expected {
        let issue = RowIssue::SparseExhausted { expected, supplied };
        tracing::warn!(row = row_idx, issue = %issue, "Sparse values exhausted");
        issues.push(DecodeIssue {
            row: row_idx,
            column: None,
            issue,
        });
    } else if supplied > expected {
        let issue = RowIssue::SurplusValues {
            surplus: supplied - expected,
        };
        tracing::debug!(row = row_idx, issue = %issue, "Surplus sparse values");
        issues.push(DecodeIssue {
            row: row_idx,
            column: None,
            issue,
        });
    }
    cells
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
