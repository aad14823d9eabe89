//! Unit tests for the slot Value enum

use core_types::Value;

#[cfg(test)]
mod value_conversion_tests {
    use super::*;

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(Value::from(-1), Value::Smi(-1));
        assert_eq!(Value::from(0.5), Value::Double(0.5));
        assert_eq!(Value::from(i32::MAX), Value::Smi(i32::MAX));
    }

    #[test]
    fn test_string_conversions() {
        assert_eq!(Value::from("s"), Value::String("s".to_string()));
        assert_eq!(Value::from(String::from("owned")), Value::from("owned"));
    }

    #[test]
    fn test_only_undefined_is_undefined() {
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());
        assert!(!Value::Boolean(false).is_undefined());
        assert!(!Value::HeapObject(12).is_undefined());
    }
}

#[cfg(test)]
mod value_slot_tests {
    use super::*;

    #[test]
    fn test_cleared_slot_value() {
        let mut slots = vec![Value::Smi(1), Value::Smi(2)];
        slots[0] = Value::default();
        assert!(slots[0].is_undefined());
        assert_eq!(slots[1], Value::Smi(2));
    }

    #[test]
    fn test_value_partial_eq() {
        assert_eq!(Value::Smi(42), Value::Smi(42));
        assert_ne!(Value::Smi(42), Value::Double(42.0));
        assert_ne!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    }
}
