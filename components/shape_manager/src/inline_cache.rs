//! Inline caching for property lookups
//!
//! Provides mono/poly/megamorphic caching states keyed by schema identity.
//! One cache belongs to one access site, so it always refers to the same
//! property name.

use arrayvec::ArrayVec;

use crate::hidden_class::SchemaId;
use crate::schema_property::SchemaProperty;

/// Number of schemas a polymorphic cache tracks before going megamorphic.
pub const POLYMORPHIC_LIMIT: usize = 4;

/// Inline cache for property access
///
/// Caches the schema and resolved property for fast access.
/// Transitions through states as more schemas are encountered.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineCache {
    /// No schema cached yet
    Uninitialized,
    /// Single schema cached (most common case)
    Monomorphic {
        /// The cached schema
        shape: SchemaId,
        /// The property as resolved by that schema
        property: SchemaProperty,
    },
    /// Multiple schemas cached
    Polymorphic {
        /// List of (schema, property) pairs
        entries: ArrayVec<(SchemaId, SchemaProperty), POLYMORPHIC_LIMIT>,
    },
    /// Too many schemas, every lookup goes to the schema
    Megamorphic,
}

impl InlineCache {
    /// Create a new uninitialized cache
    pub fn new() -> Self {
        InlineCache::Uninitialized
    }

    /// Look up the cached property for `shape`
    pub fn lookup(&self, shape: SchemaId) -> Option<SchemaProperty> {
        match self {
            InlineCache::Uninitialized | InlineCache::Megamorphic => None,
            InlineCache::Monomorphic {
                shape: cached,
                property,
            } => (*cached == shape).then_some(*property),
            InlineCache::Polymorphic { entries } => entries
                .iter()
                .find(|(s, _)| *s == shape)
                .map(|(_, property)| *property),
        }
    }

    /// Record `property` as the resolution for `shape`
    ///
    /// Transitions cache state as needed:
    /// - Uninitialized → Monomorphic
    /// - Monomorphic → Polymorphic (if different schema)
    /// - Polymorphic → Megamorphic (past the limit)
    pub fn update(&mut self, shape: SchemaId, property: SchemaProperty) {
        match self {
            InlineCache::Uninitialized => {
                *self = InlineCache::Monomorphic { shape, property };
            }
            InlineCache::Monomorphic {
                shape: cached_shape,
                property: cached_property,
            } => {
                if *cached_shape == shape {
                    *cached_property = property;
                } else {
                    let mut entries = ArrayVec::new();
                    entries.push((*cached_shape, *cached_property));
                    entries.push((shape, property));
                    *self = InlineCache::Polymorphic { entries };
                }
            }
            InlineCache::Polymorphic { entries } => {
                if let Some(entry) = entries.iter_mut().find(|(s, _)| *s == shape) {
                    entry.1 = property;
                } else if entries.try_push((shape, property)).is_err() {
                    tracing::trace!(%shape, "inline cache went megamorphic");
                    *self = InlineCache::Megamorphic;
                }
            }
            InlineCache::Megamorphic => {}
        }
    }
}

impl Default for InlineCache {
    fn default() -> Self {
        Self::new()
    }
}
