//! Transition caches used to canonicalize structural edits.
//!
//! Each schema owns three independent caches (add, delete and modify). Two
//! objects applying the same edit to the same schema get the same resulting
//! schema back as long as that schema is still alive.

use std::sync::{Arc, Weak};

use core_types::PropertyAttributes;
use rustc_hash::FxHashMap;

use crate::config::TransitionRetention;
use crate::hidden_class::HiddenClassSchema;

/// Reference from a transition cache to the schema it leads to.
#[derive(Debug)]
enum TransitionTarget {
    Strong(Arc<HiddenClassSchema>),
    Weak(Weak<HiddenClassSchema>),
}

impl TransitionTarget {
    fn new(schema: &Arc<HiddenClassSchema>, retention: TransitionRetention) -> Self {
        match retention {
            TransitionRetention::Strong => TransitionTarget::Strong(Arc::clone(schema)),
            TransitionRetention::Weak => TransitionTarget::Weak(Arc::downgrade(schema)),
        }
    }

    fn upgrade(&self) -> Option<Arc<HiddenClassSchema>> {
        match self {
            TransitionTarget::Strong(schema) => Some(Arc::clone(schema)),
            TransitionTarget::Weak(weak) => weak.upgrade(),
        }
    }

    fn is_live(&self) -> bool {
        match self {
            TransitionTarget::Strong(_) => true,
            TransitionTarget::Weak(weak) => weak.strong_count() > 0,
        }
    }
}

/// Entry count below which a cache is never swept.
const MIN_SWEEP_THRESHOLD: usize = 32;

/// One keyed cache. Entries are grouped by name so lookups can borrow a
/// `&str`; the attribute part of the key is `None` for deletes.
#[derive(Debug)]
struct EditCache {
    entries: FxHashMap<Arc<str>, Vec<(Option<PropertyAttributes>, TransitionTarget)>>,
    /// Entries stored across all buckets, dead ones included.
    stored: usize,
    /// `stored` value that triggers the next sweep of dead entries.
    sweep_at: usize,
}

impl Default for EditCache {
    fn default() -> Self {
        EditCache {
            entries: FxHashMap::default(),
            stored: 0,
            sweep_at: MIN_SWEEP_THRESHOLD,
        }
    }
}

impl EditCache {
    fn get(
        &self,
        name: &str,
        attributes: Option<PropertyAttributes>,
    ) -> Option<Arc<HiddenClassSchema>> {
        self.entries
            .get(name)?
            .iter()
            .find(|(attrs, _)| *attrs == attributes)
            .and_then(|(_, target)| target.upgrade())
    }

    fn insert(
        &mut self,
        name: Arc<str>,
        attributes: Option<PropertyAttributes>,
        target: TransitionTarget,
    ) {
        let bucket = self.entries.entry(name).or_default();
        let before = bucket.len();
        bucket.retain(|(attrs, existing)| *attrs != attributes && existing.is_live());
        self.stored = self.stored + bucket.len() + 1 - before;
        bucket.push((attributes, target));

        if self.stored >= self.sweep_at {
            self.sweep();
        }
    }

    /// Drops dead targets and empty buckets from every name. The next sweep
    /// waits until the cache has doubled, so the cost stays amortized.
    fn sweep(&mut self) {
        self.entries.retain(|_, bucket| {
            bucket.retain(|(_, target)| target.is_live());
            !bucket.is_empty()
        });
        self.stored = self.entries.values().map(Vec::len).sum();
        self.sweep_at = (self.stored * 2).max(MIN_SWEEP_THRESHOLD);
    }

    fn bucket_count(&self) -> usize {
        self.entries.len()
    }

    fn has_live_entries(&self) -> bool {
        self.entries
            .values()
            .flatten()
            .any(|(_, target)| target.is_live())
    }

    fn live_len(&self) -> usize {
        self.entries
            .values()
            .flatten()
            .filter(|(_, target)| target.is_live())
            .count()
    }
}

/// The add, delete and modify caches of a single schema.
#[derive(Debug)]
pub(crate) struct TransitionTable {
    retention: TransitionRetention,
    add: EditCache,
    delete: EditCache,
    modify: EditCache,
}

impl TransitionTable {
    pub(crate) fn new(retention: TransitionRetention) -> Self {
        TransitionTable {
            retention,
            add: EditCache::default(),
            delete: EditCache::default(),
            modify: EditCache::default(),
        }
    }

    pub(crate) fn lookup_add(
        &self,
        name: &str,
        attributes: PropertyAttributes,
    ) -> Option<Arc<HiddenClassSchema>> {
        self.add.get(name, Some(attributes))
    }

    pub(crate) fn record_add(
        &mut self,
        name: Arc<str>,
        attributes: PropertyAttributes,
        target: &Arc<HiddenClassSchema>,
    ) {
        let target = TransitionTarget::new(target, self.retention);
        self.add.insert(name, Some(attributes), target);
    }

    pub(crate) fn lookup_delete(&self, name: &str) -> Option<Arc<HiddenClassSchema>> {
        self.delete.get(name, None)
    }

    pub(crate) fn record_delete(&mut self, name: Arc<str>, target: &Arc<HiddenClassSchema>) {
        let target = TransitionTarget::new(target, self.retention);
        self.delete.insert(name, None, target);
    }

    pub(crate) fn lookup_modify(
        &self,
        name: &str,
        attributes: PropertyAttributes,
    ) -> Option<Arc<HiddenClassSchema>> {
        self.modify.get(name, Some(attributes))
    }

    pub(crate) fn record_modify(
        &mut self,
        name: Arc<str>,
        attributes: PropertyAttributes,
        target: &Arc<HiddenClassSchema>,
    ) {
        let target = TransitionTarget::new(target, self.retention);
        self.modify.insert(name, Some(attributes), target);
    }

    /// True if some add-child of this schema is still alive.
    pub(crate) fn has_live_add(&self) -> bool {
        self.add.has_live_entries()
    }

    /// Number of names with at least one stored entry, dead or alive.
    pub(crate) fn bucket_count(&self) -> usize {
        self.add.bucket_count() + self.delete.bucket_count() + self.modify.bucket_count()
    }

    /// Number of live targets across all three caches.
    pub(crate) fn live_len(&self) -> usize {
        self.add.live_len() + self.delete.live_len() + self.modify.live_len()
    }
}
