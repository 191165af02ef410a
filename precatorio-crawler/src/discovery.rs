//! Entity discovery from the report's own entity list.

use crate::query::QueryBuilder;
use crate::transport::PageTransport;
use precatorio_core::{DecodeError, EntityResolver, PrecatorioResult};
use precatorio_dsr::wire::{DataSet, QueryResponse};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Placeholder the report shows before an entity is picked.
pub const ENTITY_PLACEHOLDER: &str = "--- Selecione a Entidade";

/// Lists the entity names the report currently filters on.
pub struct EntityDiscovery {
    builder: QueryBuilder,
    transport: Arc<dyn PageTransport>,
}

impl EntityDiscovery {
    pub fn new(builder: QueryBuilder, transport: Arc<dyn PageTransport>) -> Self {
        Self { builder, transport }
    }

    /// Fetch every official entity name, deduplicated and sorted.
    pub async fn fetch(&self) -> PrecatorioResult<Vec<String>> {
        let request = self.builder.build_entity_listing();
        let body = self.transport.fetch(&request, 1).await?;
        let names = entity_names(&body)?;
        tracing::info!(count = names.len(), "Entities discovered");
        Ok(names)
    }

    /// Fetch the entity list and register unknown names with `resolver`.
    ///
    /// # Returns
    /// How many new entities were added.
    pub async fn refresh(&self, resolver: &mut EntityResolver) -> PrecatorioResult<usize> {
        let names = self.fetch().await?;
        Ok(resolver.extend(&names))
    }
}

/// Pull entity names out of a listing response.
///
/// Values sit under `G0` or in `C[0]`, either literally or as an index into
/// the column's value dictionary.
pub fn entity_names(body: &Value) -> Result<Vec<String>, DecodeError> {
    let response = QueryResponse::deserialize(body).map_err(|e| DecodeError::Malformed {
        reason: e.to_string(),
    })?;
    let dsr = response
        .results
        .into_iter()
        .next()
        .and_then(|r| r.result)
        .and_then(|r| r.data)
        .and_then(|d| d.dsr)
        .ok_or(DecodeError::NoData {
            missing: "results[0].result.data.dsr",
        })?;

    let mut names = BTreeSet::new();
    for data_set in &dsr.data_sets {
        collect_names(data_set, &mut names);
    }
    Ok(names.into_iter().collect())
}

fn collect_names(data_set: &DataSet, names: &mut BTreeSet<String>) {
    for hierarchy in &data_set.primary {
        let dict = hierarchy
            .rows
            .first()
            .and_then(|row| row.schema.as_ref())
            .and_then(|schema| schema.first())
            .and_then(|entry| entry.dict_name.as_deref());

        for row in &hierarchy.rows {
            let Some(raw) = row.extra.get("G0").or_else(|| row.values.first()) else {
                continue;
            };
            let value = match (dict, raw.as_u64()) {
                (Some(dict), Some(index)) => data_set
                    .value_dicts
                    .get(dict)
                    .and_then(|values| values.get(index as usize)),
                _ => Some(raw),
            };
            let Some(name) = value.and_then(Value::as_str) else {
                tracing::debug!(value = %raw, "Skipping non-text entity value");
                continue;
            };
            let name = name.trim().trim_matches('\'').trim();
            if !name.is_empty() && name != ENTITY_PLACEHOLDER {
                names.insert(name.to_string());
            }
        }
    }
}

impl std::fmt::Debug for EntityDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDiscovery").finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
