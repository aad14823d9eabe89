//! Object instances backed by a shared hidden class schema.
//!
//! A `ShapedObject` holds exactly one current schema and a flat value array
//! whose length always equals the schema's `next_value_index`.

use std::sync::Arc;

use core_types::{PropertyAttributes, Value};

use crate::error::{ObjectError, ObjectResult};
use crate::hidden_class::{HiddenClassSchema, PropertyEntries};
use crate::inline_cache::InlineCache;

/// Object with schema-based property storage.
#[derive(Debug, Clone)]
pub struct ShapedObject {
    /// Schema describing this object's layout
    shape: Arc<HiddenClassSchema>,
    /// Property values, indexed by schema slot
    values: Vec<Value>,
    /// Attributes given to properties created by plain assignment
    default_attributes: PropertyAttributes,
}

impl ShapedObject {
    /// Creates an object whose layout is `shape`, with every slot undefined.
    pub fn new(shape: Arc<HiddenClassSchema>, default_attributes: PropertyAttributes) -> Self {
        let values = vec![Value::Undefined; shape.next_value_index() as usize];
        ShapedObject {
            shape,
            values,
            default_attributes,
        }
    }

    /// The current schema.
    pub fn shape(&self) -> &Arc<HiddenClassSchema> {
        &self.shape
    }

    /// Number of live properties.
    pub fn property_count(&self) -> usize {
        self.shape.property_count()
    }

    /// Length of the value array, holes included.
    pub fn slot_count(&self) -> usize {
        self.values.len()
    }

    /// Raw slot array.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get a property value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        let property = self.shape.get_property(name)?;
        self.values.get(property.slot())
    }

    /// Get a property value, consulting `cache` before the schema.
    pub fn get_cached(&self, name: &str, cache: &mut InlineCache) -> Option<&Value> {
        let property = match cache.lookup(self.shape.id()) {
            Some(property) => property,
            None => {
                let property = self.shape.get_property(name)?;
                cache.update(self.shape.id(), property);
                property
            }
        };
        self.values.get(property.slot())
    }

    /// Assign a property.
    ///
    /// Existing properties are overwritten in place; new ones are added
    /// with the model's default attributes, which may move the object to a
    /// new schema.
    ///
    /// # Errors
    ///
    /// [`ObjectError::NotWritable`] if the property is read-only.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ObjectResult<()> {
        match self.shape.get_property(name) {
            Some(property) if !property.is_writable() => Err(ObjectError::NotWritable {
                name: name.to_owned(),
            }),
            Some(property) => {
                self.values[property.slot()] = value.into();
                Ok(())
            }
            None => self.add(name, value.into(), self.default_attributes),
        }
    }

    /// Define a property with explicit attributes.
    ///
    /// Adds the property if absent, otherwise replaces its value and
    /// attributes. The writable flag is not consulted, as with a property
    /// definition rather than an assignment.
    ///
    /// # Errors
    ///
    /// [`ObjectError::NotConfigurable`] when redefining a non-configurable
    /// property with different attributes.
    pub fn define(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        attributes: PropertyAttributes,
    ) -> ObjectResult<()> {
        let Some(property) = self.shape.get_property(name) else {
            return self.add(name, value.into(), attributes);
        };
        if !property.is_configurable() && property.attributes != attributes {
            return Err(ObjectError::NotConfigurable {
                name: name.to_owned(),
            });
        }
        self.shape = self.shape.set_property_attributes(name, attributes)?;
        self.values[property.slot()] = value.into();
        Ok(())
    }

    /// Change the attributes of an existing property.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Schema`] if the property is absent;
    /// [`ObjectError::NotConfigurable`] if it cannot be redefined.
    pub fn set_attributes(&mut self, name: &str, attributes: PropertyAttributes) -> ObjectResult<()> {
        if let Some(property) = self.shape.get_property(name) {
            if !property.is_configurable() && property.attributes != attributes {
                return Err(ObjectError::NotConfigurable {
                    name: name.to_owned(),
                });
            }
        }
        self.shape = self.shape.set_property_attributes(name, attributes)?;
        Ok(())
    }

    /// Delete a property, returning whether it existed.
    ///
    /// The freed slot is reset to undefined but never reused.
    ///
    /// # Errors
    ///
    /// [`ObjectError::NotConfigurable`] if the property cannot be deleted.
    pub fn delete(&mut self, name: &str) -> ObjectResult<bool> {
        let Some(property) = self.shape.get_property(name) else {
            return Ok(false);
        };
        if !property.is_configurable() {
            return Err(ObjectError::NotConfigurable {
                name: name.to_owned(),
            });
        }
        self.shape = self.shape.delete_property(name)?;
        self.values[property.slot()] = Value::Undefined;
        Ok(true)
    }

    /// Enumerate every live property with its value and attributes.
    pub fn entries(&self) -> PropertyEntries<'_, Value> {
        self.shape.enumerate_property_names_and_values(&self.values)
    }

    /// Names of enumerable properties, in enumeration order.
    pub fn enumerable_keys(&self) -> Vec<Arc<str>> {
        self.entries()
            .filter(|entry| entry.attributes().is_enumerable())
            .map(|entry| entry.name)
            .collect()
    }

    fn add(&mut self, name: &str, value: Value, attributes: PropertyAttributes) -> ObjectResult<()> {
        let shape = self.shape.add_property(name, attributes)?;
        debug_assert_eq!(self.values.len(), self.shape.next_value_index() as usize);
        self.values.push(value);
        self.shape = shape;
        Ok(())
    }
}
