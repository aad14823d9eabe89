//! Object models: one root schema plus the configuration and counters
//! shared by every schema derived from it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use core_types::PropertyAttributes;

use crate::config::ShapeConfig;
use crate::error::SchemaResult;
use crate::hidden_class::HiddenClassSchema;
use crate::object::ShapedObject;

/// Statistics for one object model.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModelStats {
    /// Number of schemas created, including the root
    pub schemas_created: u64,
    /// Number of property maps rebuilt by replaying add-edits
    pub materializations: u64,
    /// Number of property maps handed from a schema to its add-child
    pub transfers: u64,
    /// Number of edits answered from a transition cache
    pub transition_hits: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    schemas_created: AtomicU64,
    materializations: AtomicU64,
    transfers: AtomicU64,
    transition_hits: AtomicU64,
}

impl Counters {
    pub(crate) fn schema_created(&self) {
        self.schemas_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn materialized(&self) {
        self.materializations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn transferred(&self) {
        self.transfers.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn transition_hit(&self) {
        self.transition_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ModelStats {
        ModelStats {
            schemas_created: self.schemas_created.load(Ordering::Relaxed),
            materializations: self.materializations.load(Ordering::Relaxed),
            transfers: self.transfers.load(Ordering::Relaxed),
            transition_hits: self.transition_hits.load(Ordering::Relaxed),
        }
    }
}

/// State every schema of a model points at.
#[derive(Debug)]
pub(crate) struct ModelShared {
    pub(crate) config: ShapeConfig,
    pub(crate) counters: Counters,
}

/// An independent object model with its own root (empty) schema.
///
/// Schemas from different models never share transitions.
///
/// # Example
///
/// ```
/// use core_types::{PropertyAttributes, Value};
/// use shape_manager::ObjectModel;
///
/// let model = ObjectModel::new();
/// let mut point = model.create_object();
/// point.set("x", Value::Smi(1)).unwrap();
/// point.set("y", Value::Smi(2)).unwrap();
///
/// let mut other = model.create_object();
/// other.set("x", Value::Smi(3)).unwrap();
/// other.set("y", Value::Smi(4)).unwrap();
///
/// assert!(std::sync::Arc::ptr_eq(point.shape(), other.shape()));
/// ```
#[derive(Debug, Clone)]
pub struct ObjectModel {
    shared: Arc<ModelShared>,
    root: Arc<HiddenClassSchema>,
}

impl ObjectModel {
    /// Creates a model with default configuration.
    pub fn new() -> Self {
        Self::with_config(ShapeConfig::default())
    }

    /// Creates a model with the given configuration.
    pub fn with_config(config: ShapeConfig) -> Self {
        let shared = Arc::new(ModelShared {
            config,
            counters: Counters::default(),
        });
        let root = HiddenClassSchema::root(Arc::clone(&shared));
        tracing::debug!(root = %root.id(), "object model created");
        ObjectModel { shared, root }
    }

    /// The root schema with no properties.
    pub fn empty_schema(&self) -> Arc<HiddenClassSchema> {
        Arc::clone(&self.root)
    }

    /// The model's configuration.
    pub fn config(&self) -> &ShapeConfig {
        &self.shared.config
    }

    /// Returns the schema reached from the root by adding `properties` in
    /// order, reusing existing transitions.
    ///
    /// # Errors
    ///
    /// Fails if a name repeats.
    pub fn schema_for<'a, I>(&self, properties: I) -> SchemaResult<Arc<HiddenClassSchema>>
    where
        I: IntoIterator<Item = (&'a str, PropertyAttributes)>,
    {
        properties
            .into_iter()
            .try_fold(self.empty_schema(), |schema, (name, attributes)| {
                schema.add_property(name, attributes)
            })
    }

    /// Creates an object with no properties.
    pub fn create_object(&self) -> ShapedObject {
        ShapedObject::new(self.empty_schema(), self.shared.config.default_attributes)
    }

    /// Snapshot of the model's counters.
    pub fn stats(&self) -> ModelStats {
        self.shared.counters.snapshot()
    }
}

impl Default for ObjectModel {
    fn default() -> Self {
        Self::new()
    }
}
