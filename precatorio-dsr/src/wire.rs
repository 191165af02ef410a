//! Serde model of the DSR query response envelope.
//!
//! Field names follow the wire (`DS`, `PH`, `DM0`, `S`, `C`, `R`...). Every
//! level is optional here; `page::ParsedPage` is the single place that
//! decides which absences are structural errors.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub result: Option<ResultBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBody {
    #[serde(default)]
    pub data: Option<ResultData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub descriptor: Option<Descriptor>,
    #[serde(default)]
    pub dsr: Option<Dsr>,
}

/// Global column descriptors for the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "Select", default)]
    pub select: Vec<SelectDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectDescriptor {
    #[serde(rename = "Kind", default)]
    pub kind: Option<i64>,
    /// Group identifier rows use to refer to the column (`G0`, `M1`...).
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
    /// Column wire name, e.g. `Sum(Table.Column)`.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dsr {
    #[serde(rename = "DS", default)]
    pub data_sets: Vec<DataSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSet {
    #[serde(rename = "PH", default)]
    pub primary: Vec<PrimaryHierarchy>,
    #[serde(rename = "ValueDicts", default)]
    pub value_dicts: BTreeMap<String, Vec<Value>>,
    /// Restart tokens to echo back for the next window.
    #[serde(rename = "RT", default)]
    pub restart_tokens: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryHierarchy {
    #[serde(rename = "DM0", default)]
    pub rows: Vec<WireRow>,
}

/// One row of `DM0`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireRow {
    /// Row schema, present on the first row of a page.
    #[serde(rename = "S", default)]
    pub schema: Option<Vec<SchemaEntry>>,
    /// Values for the columns this row does not inherit.
    #[serde(rename = "C", default)]
    pub values: Vec<Value>,
    /// Repeat bitmask: bit i set means column i repeats the previous row.
    #[serde(rename = "R", default)]
    pub repeat_mask: Option<u64>,
    /// Anything else, e.g. `G0` on single-column groupings.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaEntry {
    #[serde(rename = "N", default)]
    pub name: Option<String>,
    #[serde(rename = "T", default)]
    pub value_type: Option<i64>,
    /// Value dictionary the column's values index into.
    #[serde(rename = "DN", default)]
    pub dict_name: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
