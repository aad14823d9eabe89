//! Scenario tests for HiddenClassSchema transitions

use core_types::PropertyAttributes;
use shape_manager::{HiddenClassSchema, ObjectModel, SchemaError};
use std::collections::HashSet;
use std::sync::Arc;

const ALL: PropertyAttributes = PropertyAttributes::FULL_ACCESS;

fn index_of(schema: &HiddenClassSchema, name: &str) -> Option<u32> {
    schema.get_property(name).map(|p| p.index)
}

// ============================================================================
// Add chains
// ============================================================================

#[test]
fn test_two_property_scenario() {
    let empty = HiddenClassSchema::empty();
    let s1 = empty.add_property("a", ALL).unwrap();
    let s2 = s1.add_property("b", ALL).unwrap();

    assert_eq!(index_of(&s1, "a"), Some(0));
    assert_eq!(index_of(&s2, "b"), Some(1));
    assert_eq!(index_of(&s2, "a"), Some(0));
    assert_eq!(s2.property_count(), 2);
}

#[test]
fn test_delete_scenario_leaves_hole() {
    let s2 = HiddenClassSchema::empty()
        .add_property("a", ALL)
        .unwrap()
        .add_property("b", ALL)
        .unwrap();
    let s3 = s2.delete_property("a").unwrap();

    assert_eq!(index_of(&s3, "a"), None);
    assert_eq!(index_of(&s3, "b"), Some(1));
    assert_eq!(s3.property_count(), 1);
    assert_eq!(s3.next_value_index(), 2);
}

#[test]
fn test_independent_chains_share_final_schema() {
    let model = ObjectModel::new();
    let first = model
        .empty_schema()
        .add_property("x", ALL)
        .unwrap()
        .add_property("y", ALL)
        .unwrap();
    let second = model
        .empty_schema()
        .add_property("x", ALL)
        .unwrap()
        .add_property("y", ALL)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_different_attributes_are_different_transitions() {
    let empty = HiddenClassSchema::empty();
    let open = empty.add_property("x", ALL).unwrap();
    let sealed = empty.add_property("x", PropertyAttributes::SEALED).unwrap();
    assert!(!Arc::ptr_eq(&open, &sealed));
    assert_eq!(index_of(&open, "x"), index_of(&sealed, "x"));
}

#[test]
fn test_slots_unique_along_add_path() {
    let mut schema = HiddenClassSchema::empty();
    let names: Vec<String> = (0..32).map(|i| format!("prop{i}")).collect();
    for name in &names {
        schema = schema.add_property(name, ALL).unwrap();
    }
    assert_eq!(schema.next_value_index(), 32);
    let slots: HashSet<u32> = names
        .iter()
        .map(|n| index_of(&schema, n).unwrap())
        .collect();
    assert_eq!(slots.len(), 32);
    assert!(slots.iter().all(|&s| s < 32));
}

// ============================================================================
// Canonicalization
// ============================================================================

#[test]
fn test_add_is_canonical() {
    let empty = HiddenClassSchema::empty();
    let a = empty.add_property("x", ALL).unwrap();
    let b = empty.add_property("x", ALL).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_delete_is_canonical() {
    let s = HiddenClassSchema::empty().add_property("x", ALL).unwrap();
    let a = s.delete_property("x").unwrap();
    let b = s.delete_property("x").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.property_count(), 0);
}

#[test]
fn test_modify_is_canonical() {
    let s = HiddenClassSchema::empty().add_property("x", ALL).unwrap();
    let a = s
        .set_property_attributes("x", PropertyAttributes::WRITABLE)
        .unwrap();
    let b = s
        .set_property_attributes("x", PropertyAttributes::WRITABLE)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &s));
}

#[test]
fn test_objects_share_shape_after_same_delete() {
    let model = ObjectModel::new();
    let mut first = model.create_object();
    first.set("x", 1).unwrap();
    first.set("y", 2).unwrap();
    first.delete("y").unwrap();

    // Nothing but `first` refers to the "x, y" shape now.
    let mut second = model.create_object();
    second.set("x", 3).unwrap();
    second.set("y", 4).unwrap();
    second.delete("y").unwrap();

    assert!(Arc::ptr_eq(first.shape(), second.shape()));
}

#[test]
fn test_objects_share_shape_after_same_attribute_change() {
    let model = ObjectModel::new();
    let mut first = model.create_object();
    first.set("x", 1).unwrap();
    first.set_attributes("x", PropertyAttributes::SEALED).unwrap();

    let mut second = model.create_object();
    second.set("x", 2).unwrap();
    second.set_attributes("x", PropertyAttributes::SEALED).unwrap();

    assert!(Arc::ptr_eq(first.shape(), second.shape()));
    assert_eq!(model.stats().schemas_created, 3);
}

#[test]
fn test_unchanged_attributes_return_same_schema() {
    let s = HiddenClassSchema::empty().add_property("x", ALL).unwrap();
    let same = s.set_property_attributes("x", ALL).unwrap();
    assert!(Arc::ptr_eq(&s, &same));
    assert_eq!(s.transition_count(), 0);
}

// ============================================================================
// Delete then re-add
// ============================================================================

#[test]
fn test_readd_after_delete_gets_fresh_slot() {
    let s = HiddenClassSchema::empty()
        .add_property("a", ALL)
        .unwrap()
        .add_property("b", ALL)
        .unwrap();
    let deleted = s.delete_property("a").unwrap();
    let readded = deleted.add_property("a", ALL).unwrap();

    assert_eq!(index_of(&readded, "a"), Some(2));
    assert_eq!(readded.next_value_index(), 3);
    assert_eq!(readded.property_count(), 2);
}

#[test]
fn test_chain_after_delete_builds_on_derived_schema() {
    let s = HiddenClassSchema::empty()
        .add_property("a", ALL)
        .unwrap()
        .add_property("b", ALL)
        .unwrap();
    let deleted = s.delete_property("b").unwrap();
    let c = deleted.add_property("c", ALL).unwrap();
    let d = c.add_property("d", ALL).unwrap();

    // `c` handed its map to `d` and must rebuild from `deleted`.
    assert_eq!(c.property_names(), vec![Arc::from("a"), Arc::from("c")]);
    assert_eq!(index_of(&d, "d"), Some(3));
    assert_eq!(index_of(&d, "b"), None);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_errors_leave_schema_untouched() {
    let s = HiddenClassSchema::empty().add_property("a", ALL).unwrap();
    assert!(matches!(
        s.delete_property("b"),
        Err(SchemaError::PropertyNotFound { .. })
    ));
    assert!(matches!(
        s.add_property("a", ALL),
        Err(SchemaError::DuplicateProperty { .. })
    ));
    assert_eq!(s.property_count(), 1);
    assert_eq!(s.next_value_index(), 1);
    assert_eq!(s.transition_count(), 0);
}

// ============================================================================
// Enumeration
// ============================================================================

#[test]
fn test_enumeration_order_survives_delete() {
    let s = ObjectModel::new()
        .schema_for([("a", ALL), ("b", ALL), ("c", ALL), ("d", ALL)])
        .unwrap();
    let deleted = s.delete_property("b").unwrap();
    let values = ["va", "vb", "vc", "vd"];
    let names: Vec<String> = deleted
        .enumerate_property_names_and_values(&values)
        .map(|entry| entry.name.to_string())
        .collect();
    assert_eq!(names, ["a", "c", "d"]);

    let pairs: Vec<&str> = deleted
        .enumerate_property_names_and_values(&values)
        .map(|entry| *entry.value())
        .collect();
    assert_eq!(pairs, ["va", "vc", "vd"]);
}

#[test]
fn test_enumeration_reports_attributes() {
    let s = ObjectModel::new()
        .schema_for([
            ("open", ALL),
            ("hidden", PropertyAttributes::NON_ENUMERABLE),
        ])
        .unwrap();
    let values = [1, 2];
    let hidden = s
        .enumerate_property_names_and_values(&values)
        .find(|entry| &*entry.name == "hidden")
        .unwrap();
    assert_eq!(hidden.attributes(), PropertyAttributes::NON_ENUMERABLE);
    assert_eq!(*hidden.value(), 2);
}

#[test]
fn test_enumeration_snapshot_unaffected_by_later_edits() {
    let s = ObjectModel::new()
        .schema_for([("a", ALL), ("b", ALL)])
        .unwrap();
    let values = [10, 20, 30];
    let entries = s.enumerate_property_names_and_values(&values);
    let _grown = s.add_property("c", ALL).unwrap();
    let _shrunk = s.delete_property("a").unwrap();
    assert_eq!(entries.count(), 2);
    assert_eq!(s.property_count(), 2);
}
