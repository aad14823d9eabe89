//! Script value representation stored in object slots.
//!
//! Objects keep their property values in a flat slot array indexed by the
//! hidden class. This module provides the `Value` enum held in those slots.

/// Represents any script value an object slot can hold.
///
/// Primitive values are stored inline, while objects are referenced by ID.
/// `Value::default()` is `Undefined`, which is also the value a slot is reset
/// to when its property is deleted.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let mut slots = vec![Value::from(42), Value::from("name")];
/// slots[0] = Value::default();
///
/// assert!(slots[0].is_undefined());
/// assert_eq!(slots[1], Value::String("name".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// The undefined value
    #[default]
    Undefined,
    /// The null value
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer (fits in 32 bits)
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(String),
    /// Heap-allocated object (referenced by ID)
    HeapObject(usize),
}

impl Value {
    /// Returns true for `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
