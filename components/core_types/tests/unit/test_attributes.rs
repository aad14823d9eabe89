//! Unit tests for PropertyAttributes

use core_types::PropertyAttributes;
use std::collections::HashSet;

#[test]
fn test_flags_are_independent() {
    let w = PropertyAttributes::WRITABLE;
    assert!(w.is_writable());
    assert!(!w.is_enumerable());
    assert!(!w.is_configurable());

    let e = PropertyAttributes::ENUMERABLE;
    assert!(e.is_enumerable());
    assert!(!e.is_writable());
}

#[test]
fn test_bitwise_combination() {
    let combined = PropertyAttributes::WRITABLE
        | PropertyAttributes::ENUMERABLE
        | PropertyAttributes::CONFIGURABLE;
    assert_eq!(combined, PropertyAttributes::FULL_ACCESS);
    assert_eq!(
        combined - PropertyAttributes::ENUMERABLE,
        PropertyAttributes::NON_ENUMERABLE
    );
}

#[test]
fn test_usable_as_hash_key() {
    let mut keys = HashSet::new();
    keys.insert(("x", PropertyAttributes::FULL_ACCESS));
    keys.insert(("x", PropertyAttributes::SEALED));
    keys.insert(("x", PropertyAttributes::all()));
    assert_eq!(keys.len(), 2);
}
