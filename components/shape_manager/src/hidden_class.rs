//! Hidden class schemas for dynamically shaped objects.
//!
//! A schema describes which named properties an object has, the slot each
//! property's value lives in and the property's attributes. Objects that
//! went through the same sequence of structural edits share one schema, so
//! no object carries its own name-to-slot map.
//!
//! Schemas created by an add keep a strong reference to their parent plus
//! the single edit separating them from it. Their full property map is only
//! built on demand by replaying pending edits on top of the nearest ancestor
//! that still has one. A schema extended for the first time may hand its
//! freshly built map straight to the new child and fall back to rebuilding
//! later, so a chain of sequential adds never copies the map per step.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use core_types::PropertyAttributes;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::error::{SchemaError, SchemaResult};
use crate::model::{ModelShared, ObjectModel};
use crate::schema_property::{PropertyDescriptor, PropertyNameAndValue, SchemaProperty};
use crate::transitions::TransitionTable;

pub(crate) type PropertyMap = IndexMap<Arc<str>, SchemaProperty, FxBuildHasher>;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a schema. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

impl SchemaId {
    fn fresh() -> Self {
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single add-edit separating a schema from its parent.
struct AddOrigin {
    parent: Arc<HiddenClassSchema>,
    name: Arc<str>,
    property: SchemaProperty,
}

/// Lazily built state, guarded by the schema's lock.
struct SchemaState {
    /// `None` until rebuilt, or after the map was handed to a child.
    properties: Option<Arc<PropertyMap>>,
    /// Set once the map has been enumerated; it then stays put.
    pinned: bool,
    transitions: TransitionTable,
}

/// Shared description of the properties an object currently has.
///
/// Schemas are handed out as `Arc<HiddenClassSchema>` and are safe to share
/// across threads. Every structural edit returns another schema; the
/// receiver is never changed in a way callers can observe.
///
/// # Example
///
/// ```
/// use core_types::PropertyAttributes;
/// use shape_manager::HiddenClassSchema;
///
/// let empty = HiddenClassSchema::empty();
/// let with_x = empty.add_property("x", PropertyAttributes::FULL_ACCESS).unwrap();
/// let with_xy = with_x.add_property("y", PropertyAttributes::FULL_ACCESS).unwrap();
///
/// assert_eq!(with_xy.get_property("x").map(|p| p.index), Some(0));
/// assert_eq!(with_xy.get_property("y").map(|p| p.index), Some(1));
/// assert_eq!(with_xy.next_value_index(), 2);
/// ```
pub struct HiddenClassSchema {
    id: SchemaId,
    next_value_index: u32,
    origin: Option<AddOrigin>,
    /// Schema whose delete or modify cache leads here. Keeps that cache
    /// entry alive for as long as this schema is in use.
    source: Option<Arc<HiddenClassSchema>>,
    model: Arc<ModelShared>,
    state: Mutex<SchemaState>,
}

impl HiddenClassSchema {
    /// Creates the root schema of a fresh object model with default
    /// configuration.
    ///
    /// Use [`ObjectModel`] to share configuration and statistics between
    /// roots.
    pub fn empty() -> Arc<Self> {
        ObjectModel::new().empty_schema()
    }

    pub(crate) fn root(model: Arc<ModelShared>) -> Arc<Self> {
        Self::build(model, 0, None, None, PropertyMap::default())
    }

    fn build(
        model: Arc<ModelShared>,
        next_value_index: u32,
        origin: Option<AddOrigin>,
        source: Option<Arc<Self>>,
        properties: PropertyMap,
    ) -> Arc<Self> {
        model.counters.schema_created();
        let transitions = TransitionTable::new(model.config.transition_retention);
        Arc::new(HiddenClassSchema {
            id: SchemaId::fresh(),
            next_value_index,
            origin,
            source,
            model,
            state: Mutex::new(SchemaState {
                properties: Some(Arc::new(properties)),
                pinned: false,
                transitions,
            }),
        })
    }

    /// Identity of this schema, suitable as an inline cache key.
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// The slot index the next added property will receive.
    ///
    /// Deletes leave holes, so this can exceed [`property_count`].
    ///
    /// [`property_count`]: HiddenClassSchema::property_count
    pub fn next_value_index(&self) -> u32 {
        self.next_value_index
    }

    /// Looks up `name`, returning `None` if the schema lacks it.
    pub fn get_property(&self, name: &str) -> Option<SchemaProperty> {
        let mut state = self.state.lock();
        self.materialize(&mut state).get(name).copied()
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Number of live (non-deleted) properties.
    pub fn property_count(&self) -> usize {
        let mut state = self.state.lock();
        self.materialize(&mut state).len()
    }

    /// Property names in enumeration order.
    pub fn property_names(&self) -> Vec<Arc<str>> {
        let mut state = self.state.lock();
        self.materialize(&mut state).keys().cloned().collect()
    }

    /// Returns true if the full property map is currently built.
    pub fn is_materialized(&self) -> bool {
        self.state.lock().properties.is_some()
    }

    /// Number of live transitions recorded from this schema.
    pub fn transition_count(&self) -> usize {
        self.state.lock().transitions.live_len()
    }

    #[cfg(test)]
    pub(crate) fn transition_bucket_count(&self) -> usize {
        self.state.lock().transitions.bucket_count()
    }

    /// Returns the schema reached by adding `name` with `attributes`.
    ///
    /// The new property takes slot [`next_value_index`]. Repeated calls with
    /// the same arguments return the same schema object.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateProperty`] if `name` already exists.
    ///
    /// [`next_value_index`]: HiddenClassSchema::next_value_index
    pub fn add_property(
        self: &Arc<Self>,
        name: &str,
        attributes: PropertyAttributes,
    ) -> SchemaResult<Arc<Self>> {
        let mut state = self.state.lock();
        if let Some(existing) = state.transitions.lookup_add(name, attributes) {
            self.model.counters.transition_hit();
            tracing::trace!(schema = %self.id, property = name, target = %existing.id, "add transition reused");
            return Ok(existing);
        }
        if self.materialize(&mut state).contains_key(name) {
            return Err(SchemaError::duplicate(name));
        }

        let name: Arc<str> = Arc::from(name);
        let property = SchemaProperty::new(self.next_value_index, attributes);
        let transfer = self.can_transfer(&state);
        let mut properties = self.take_or_copy_properties(&mut state, transfer);
        properties.insert(Arc::clone(&name), property);

        let origin = AddOrigin {
            parent: Arc::clone(self),
            name: Arc::clone(&name),
            property,
        };
        let child = Self::build(
            Arc::clone(&self.model),
            self.next_value_index + 1,
            Some(origin),
            None,
            properties,
        );
        tracing::trace!(schema = %self.id, property = &*name, target = %child.id, "add transition created");
        state.transitions.record_add(name, attributes, &child);
        Ok(child)
    }

    /// Returns the schema reached by removing `name`.
    ///
    /// Remaining slot indices are left untouched and
    /// [`next_value_index`](HiddenClassSchema::next_value_index) does not
    /// shrink; the deleted slot becomes a hole.
    ///
    /// # Errors
    ///
    /// [`SchemaError::PropertyNotFound`] if `name` is absent.
    pub fn delete_property(self: &Arc<Self>, name: &str) -> SchemaResult<Arc<Self>> {
        let mut state = self.state.lock();
        if let Some(existing) = state.transitions.lookup_delete(name) {
            self.model.counters.transition_hit();
            tracing::trace!(schema = %self.id, property = name, target = %existing.id, "delete transition reused");
            return Ok(existing);
        }

        let (key, remaining) = {
            let properties = self.materialize(&mut state);
            let Some((key, _)) = properties.get_key_value(name) else {
                return Err(SchemaError::not_found(name));
            };
            let key = Arc::clone(key);
            let mut remaining = PropertyMap::clone(properties);
            remaining.shift_remove(name);
            (key, remaining)
        };

        let child = Self::build(
            Arc::clone(&self.model),
            self.next_value_index,
            None,
            Some(Arc::clone(self)),
            remaining,
        );
        tracing::trace!(schema = %self.id, property = name, target = %child.id, "delete transition created");
        state.transitions.record_delete(key, &child);
        Ok(child)
    }

    /// Returns the schema reached by changing the attributes of `name`.
    ///
    /// Returns `self` when the attributes already match. The property keeps
    /// its slot index.
    ///
    /// # Errors
    ///
    /// [`SchemaError::PropertyNotFound`] if `name` is absent.
    pub fn set_property_attributes(
        self: &Arc<Self>,
        name: &str,
        attributes: PropertyAttributes,
    ) -> SchemaResult<Arc<Self>> {
        let mut state = self.state.lock();
        let (key, current) = {
            let properties = self.materialize(&mut state);
            let Some((key, current)) = properties.get_key_value(name) else {
                return Err(SchemaError::not_found(name));
            };
            (Arc::clone(key), *current)
        };
        if current.attributes == attributes {
            return Ok(Arc::clone(self));
        }
        if let Some(existing) = state.transitions.lookup_modify(name, attributes) {
            self.model.counters.transition_hit();
            tracing::trace!(schema = %self.id, property = name, target = %existing.id, "modify transition reused");
            return Ok(existing);
        }

        let mut modified = PropertyMap::clone(self.materialize(&mut state));
        modified.insert(
            Arc::clone(&key),
            SchemaProperty::new(current.index, attributes),
        );
        let child = Self::build(
            Arc::clone(&self.model),
            self.next_value_index,
            None,
            Some(Arc::clone(self)),
            modified,
        );
        tracing::trace!(schema = %self.id, property = name, target = %child.id, "modify transition created");
        state.transitions.record_modify(key, attributes, &child);
        Ok(child)
    }

    /// Enumerates every live property together with its value from `values`.
    ///
    /// `values` is the owning object's slot array. The sequence is a
    /// snapshot: later edits through this schema do not affect it. Once
    /// enumerated, this schema keeps its map for good.
    pub fn enumerate_property_names_and_values<'v, V>(
        &self,
        values: &'v [V],
    ) -> PropertyEntries<'v, V> {
        let properties = {
            let mut state = self.state.lock();
            state.pinned = true;
            Arc::clone(self.materialize(&mut state))
        };
        PropertyEntries {
            properties,
            position: 0,
            values,
        }
    }

    fn materialize<'s>(&self, state: &'s mut SchemaState) -> &'s Arc<PropertyMap> {
        state
            .properties
            .get_or_insert_with(|| Arc::new(self.rebuild()))
    }

    /// Replays pending add-edits on top of the nearest ancestor that still
    /// has a map. Only locks ancestors, one at a time.
    fn rebuild(&self) -> PropertyMap {
        let mut pending: Vec<&AddOrigin> = Vec::new();
        let mut origin = self.origin.as_ref();
        let mut properties = loop {
            let Some(edit) = origin else {
                // Schemas without an add-origin never give their map away.
                debug_assert!(pending.is_empty(), "add chain ended without a property map");
                break PropertyMap::default();
            };
            pending.push(edit);
            if let Some(base) = edit.parent.state.lock().properties.as_ref() {
                break PropertyMap::clone(base);
            }
            origin = edit.parent.origin.as_ref();
        };

        let replayed = pending.len();
        properties.reserve(replayed);
        for edit in pending.into_iter().rev() {
            properties.insert(Arc::clone(&edit.name), edit.property);
        }
        self.model.counters.materialized();
        tracing::debug!(schema = %self.id, replayed, "rebuilt property map");
        properties
    }

    /// Detaches the strong link to the schema this one was derived from.
    fn take_parent(&mut self) -> Option<Arc<Self>> {
        let parent = self.origin.take().map(|origin| origin.parent);
        parent.or_else(|| self.source.take())
    }

    fn can_transfer(&self, state: &SchemaState) -> bool {
        self.model.config.fast_path_transfer
            && self.origin.is_some()
            && !state.pinned
            && !state.transitions.has_live_add()
    }

    /// Produces the map for a new add-child: either this schema's own map,
    /// when it is provably unshared, or a copy of it.
    fn take_or_copy_properties(&self, state: &mut SchemaState, transfer: bool) -> PropertyMap {
        if transfer {
            if let Some(shared) = state.properties.take() {
                match Arc::try_unwrap(shared) {
                    Ok(owned) => {
                        self.model.counters.transferred();
                        tracing::trace!(schema = %self.id, "property map handed to child");
                        return owned;
                    }
                    Err(shared) => state.properties = Some(shared),
                }
            }
        }
        PropertyMap::clone(self.materialize(state))
    }
}

impl fmt::Debug for HiddenClassSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("HiddenClassSchema");
        out.field("id", &self.id)
            .field("next_value_index", &self.next_value_index)
            .field("parent", &self.origin.as_ref().map(|o| o.parent.id))
            .field("source", &self.source.as_ref().map(|s| s.id));
        // try_lock: formatting must not block on a schema being edited.
        match self.state.try_lock() {
            Some(state) => out.field(
                "properties",
                &state.properties.as_ref().map(|p| p.keys().collect::<Vec<_>>()),
            ),
            None => out.field("properties", &"<locked>"),
        };
        out.finish()
    }
}

impl Drop for HiddenClassSchema {
    fn drop(&mut self) {
        // Unwind long parent chains iteratively instead of recursing per parent.
        let mut next = self.take_parent();
        while let Some(parent) = next {
            next = match Arc::try_unwrap(parent) {
                Ok(mut schema) => schema.take_parent(),
                Err(_) => None,
            };
        }
    }
}

/// Forward-only snapshot of a schema's properties paired with their values.
///
/// Produced by
/// [`HiddenClassSchema::enumerate_property_names_and_values`].
pub struct PropertyEntries<'v, V> {
    properties: Arc<PropertyMap>,
    position: usize,
    values: &'v [V],
}

impl<'v, V> Iterator for PropertyEntries<'v, V> {
    type Item = PropertyNameAndValue<'v, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.values;
        while let Some((name, property)) = self.properties.get_index(self.position) {
            self.position += 1;
            debug_assert!(
                property.slot() < values.len(),
                "value array shorter than schema slot space"
            );
            if let Some(value) = values.get(property.slot()) {
                return Some(PropertyNameAndValue {
                    name: Arc::clone(name),
                    descriptor: PropertyDescriptor {
                        value,
                        attributes: property.attributes,
                    },
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.properties.len() - self.position))
    }
}
