//! Shape Manager - hidden class schemas for dynamically shaped objects
//!
//! This component provides:
//! - Hidden class schemas resolving property names to slot indices
//! - Add / delete / modify transition caches for structural sharing
//! - Lazy property map materialization along add chains
//! - Shaped objects and inline caches built on top of schemas
//!
//! # Example
//!
//! ```
//! use core_types::PropertyAttributes;
//! use shape_manager::ObjectModel;
//! use std::sync::Arc;
//!
//! let model = ObjectModel::new();
//! let attrs = PropertyAttributes::FULL_ACCESS;
//! let a = model.empty_schema().add_property("x", attrs).unwrap();
//! let b = model.empty_schema().add_property("x", attrs).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod hidden_class;
pub mod inline_cache;
pub mod model;
pub mod object;
pub mod schema_property;
mod transitions;

// Re-export main types
pub use config::{ShapeConfig, TransitionRetention};
pub use error::{ObjectError, ObjectResult, SchemaError, SchemaResult};
pub use hidden_class::{HiddenClassSchema, PropertyEntries, SchemaId};
pub use inline_cache::InlineCache;
pub use model::{ModelStats, ObjectModel};
pub use object::ShapedObject;
pub use schema_property::{PropertyDescriptor, PropertyNameAndValue, SchemaProperty};
