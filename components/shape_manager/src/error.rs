//! Error types for schema transitions and object property updates.

use thiserror::Error;

/// Errors raised by structural edits on a hidden class schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Delete or attribute change requested for a name the schema lacks.
    #[error("property '{name}' does not exist in this schema")]
    PropertyNotFound {
        /// Property name
        name: String,
    },

    /// Add requested for a name the schema already has.
    ///
    /// The object layer must check for existence before choosing between
    /// an update and an add, so this always indicates a caller bug.
    #[error("property '{name}' already exists in this schema")]
    DuplicateProperty {
        /// Property name
        name: String,
    },
}

impl SchemaError {
    pub(crate) fn not_found(name: &str) -> Self {
        SchemaError::PropertyNotFound {
            name: name.to_owned(),
        }
    }

    pub(crate) fn duplicate(name: &str) -> Self {
        SchemaError::DuplicateProperty {
            name: name.to_owned(),
        }
    }
}

/// Errors raised by [`ShapedObject`](crate::ShapedObject) property operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The underlying schema rejected the edit
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Assignment to a read-only property
    #[error("cannot assign to read-only property '{name}'")]
    NotWritable {
        /// Property name
        name: String,
    },

    /// Delete or redefinition of a non-configurable property
    #[error("cannot delete or redefine non-configurable property '{name}'")]
    NotConfigurable {
        /// Property name
        name: String,
    },
}

/// Result type for schema transitions
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for object property operations
pub type ObjectResult<T> = Result<T, ObjectError>;
