//! Slot descriptors and enumeration views.

use std::sync::Arc;

use core_types::PropertyAttributes;

/// Where a named property's value lives and how it may be used.
///
/// Immutable once created. Absence is expressed as `None` by
/// [`HiddenClassSchema::get_property`](crate::HiddenClassSchema::get_property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaProperty {
    /// Index into the owning object's value array
    pub index: u32,
    /// Attribute flags of the property
    pub attributes: PropertyAttributes,
}

impl SchemaProperty {
    /// Creates a property descriptor for `index`.
    pub const fn new(index: u32, attributes: PropertyAttributes) -> Self {
        SchemaProperty { index, attributes }
    }

    /// Slot index as a `usize`, for indexing value arrays.
    pub fn slot(&self) -> usize {
        self.index as usize
    }

    /// Returns true if the value can be reassigned.
    pub fn is_writable(&self) -> bool {
        self.attributes.is_writable()
    }

    /// Returns true if the property appears in enumeration.
    pub fn is_enumerable(&self) -> bool {
        self.attributes.is_enumerable()
    }

    /// Returns true if the property can be deleted or redefined.
    pub fn is_configurable(&self) -> bool {
        self.attributes.is_configurable()
    }
}

/// A resolved value together with its attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor<'v, V> {
    /// The value read from the object's slot
    pub value: &'v V,
    /// Attribute flags of the property
    pub attributes: PropertyAttributes,
}

/// One entry yielded while enumerating an object's properties.
///
/// Only produced by enumeration, never stored in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNameAndValue<'v, V> {
    /// Property name
    pub name: Arc<str>,
    /// Value and attributes
    pub descriptor: PropertyDescriptor<'v, V>,
}

impl<'v, V> PropertyNameAndValue<'v, V> {
    /// The resolved value.
    pub fn value(&self) -> &'v V {
        self.descriptor.value
    }

    /// The property's attributes.
    pub fn attributes(&self) -> PropertyAttributes {
        self.descriptor.attributes
    }
}
