//! Slug <-> official entity name resolution.

use crate::entity_table::ENTITY_TABLE;
use crate::error::EntityError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A slug and the exact name the source API filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub slug: String,
    pub official_name: String,
}

/// Normalize free text to a URL-safe slug.
///
/// Lowercases, strips diacritics, drops anything that is not `[a-z0-9]`,
/// whitespace or `-`, then collapses whitespace/hyphen runs to a single
/// hyphen. `"JUAZEIRO NORTE/CE-PREVIJUNO"` becomes `"juazeiro-nortece-previjuno"`.
pub fn slugify(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_separator = false;
    for c in folded.chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }
    slug
}

/// Bidirectional slug/official-name table. Loaded once, read many times.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    by_slug: BTreeMap<String, String>,
    by_name: HashMap<String, String>,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityResolver {
    /// Resolver over the built-in entity table.
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        for (slug, name) in ENTITY_TABLE {
            resolver.insert(slug, name);
        }
        resolver
    }

    /// Resolver with no entries.
    pub fn empty() -> Self {
        Self {
            by_slug: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a mapping, replacing any previous name for the slug.
    ///
    /// # Returns
    /// The official name previously stored under `slug`, if any.
    pub fn insert(&mut self, slug: &str, official_name: &str) -> Option<String> {
        let previous = self
            .by_slug
            .insert(slug.to_string(), official_name.to_string());
        if let Some(old) = &previous {
            self.by_name.remove(old);
        }
        self.by_name
            .insert(official_name.to_string(), slug.to_string());
        previous
    }

    /// Register official names discovered from the source under their
    /// normalized slug. Names whose slug is already known are skipped.
    ///
    /// # Returns
    /// How many new mappings were added.
    pub fn extend<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for name in names {
            let name = name.as_ref().trim();
            let slug = slugify(name);
            if slug.is_empty() || self.by_slug.contains_key(&slug) {
                continue;
            }
            self.insert(&slug, name);
            added += 1;
        }
        if added > 0 {
            tracing::info!(added, total = self.by_slug.len(), "Registered discovered entities");
        }
        added
    }

    /// Resolve a slug, or an official name in any casing/accenting, to its mapping.
    ///
    /// # Errors
    /// `EntityError::UnknownEntity` when the normalized input is not in the table.
    pub fn resolve(&self, input: &str) -> Result<EntityMapping, EntityError> {
        if let Some(slug) = self.by_name.get(input) {
            return Ok(EntityMapping {
                slug: slug.clone(),
                official_name: input.to_string(),
            });
        }
        let slug = slugify(input);
        match self.by_slug.get(&slug) {
            Some(name) => Ok(EntityMapping {
                slug,
                official_name: name.clone(),
            }),
            None => {
                tracing::debug!(input, slug = %slug, "Entity not found");
                Err(EntityError::UnknownEntity {
                    input: input.to_string(),
                    slug,
                })
            }
        }
    }

    pub fn official_name(&self, slug: &str) -> Option<&str> {
        self.by_slug.get(slug).map(String::as_str)
    }

    pub fn slug_for(&self, official_name: &str) -> Option<&str> {
        self.by_name.get(official_name).map(String::as_str)
    }

    /// All mappings, sorted by slug.
    pub fn entries(&self) -> Vec<EntityMapping> {
        self.by_slug
            .iter()
            .map(|(slug, name)| EntityMapping {
                slug: slug.clone(),
                official_name: name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_diacritics_and_punctuation() {
        assert_eq!(slugify("MUNICÍPIO DE FORTALEZA"), "municipio-de-fortaleza");
        assert_eq!(slugify("ESTADO DO CEARÁ"), "estado-do-ceara");
        assert_eq!(
            slugify("COMPANHIA BRASILEIRA DE TRENS URBANOS - CBTU"),
            "companhia-brasileira-de-trens-urbanos-cbtu"
        );
        assert_eq!(slugify("  JUAZEIRO NORTE/CE-PREVIJUNO "), "juazeiro-nortece-previjuno");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_round_trip_for_every_entry() {
        let resolver = EntityResolver::new();
        assert_eq!(resolver.len(), ENTITY_TABLE.len());
        for (slug, name) in ENTITY_TABLE {
            let mapping = resolver.resolve(slug).unwrap();
            assert_eq!(mapping.official_name, *name);
            assert_eq!(slugify(&mapping.official_name), *slug);
            assert_eq!(resolver.slug_for(name), Some(*slug));
        }
    }

    #[test]
    fn test_resolve_accepts_official_name() {
        let resolver = EntityResolver::new();
        let mapping = resolver.resolve("Município de Fortaleza").unwrap();
        assert_eq!(mapping.slug, "municipio-de-fortaleza");
        assert_eq!(mapping.official_name, "MUNICÍPIO DE FORTALEZA");
    }

    #[test]
    fn test_unknown_slug_is_rejected() {
        let resolver = EntityResolver::new();
        let err = resolver.resolve("municipio-de-atlantida").unwrap_err();
        assert_eq!(
            err,
            EntityError::UnknownEntity {
                input: "municipio-de-atlantida".to_string(),
                slug: "municipio-de-atlantida".to_string(),
            }
        );
    }

    #[test]
    fn test_extend_registers_new_names_only() {
        let mut resolver = EntityResolver::new();
        let before = resolver.len();
        let added = resolver.extend(["MUNICÍPIO DE FORTALEZA", "MUNICÍPIO DE ATLÂNTIDA", "  "]);
        assert_eq!(added, 1);
        assert_eq!(resolver.len(), before + 1);
        assert_eq!(
            resolver.official_name("municipio-de-atlantida"),
            Some("MUNICÍPIO DE ATLÂNTIDA")
        );
    }

    #[test]
    fn test_insert_replaces_reverse_entry() {
        let mut resolver = EntityResolver::empty();
        assert!(resolver.insert("x", "OLD").is_none());
        assert_eq!(resolver.insert("x", "NEW"), Some("OLD".to_string()));
        assert_eq!(resolver.slug_for("OLD"), None);
        assert_eq!(resolver.slug_for("NEW"), Some("x"));
    }

    #[test]
    fn test_entries_sorted_by_slug() {
        let entries = EntityResolver::new().entries();
        assert!(entries.windows(2).all(|w| w[0].slug < w[1].slug));
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Slugs are idempotent and only contain [a-z0-9-] without edge hyphens.
        #[test]
        fn prop_slugify_is_idempotent(input in "\\PC{0,60}") {
            let slug = slugify(&input);
            prop_assert_eq!(slugify(&slug), slug.clone());
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
