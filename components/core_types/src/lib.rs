//! Core value and attribute types for the object model.
//!
//! This crate provides the leaf types shared between the hidden class engine
//! and the object instances that use it.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of script values stored in slots
//! - [`PropertyAttributes`] - Writable / enumerable / configurable flags
//!
//! # Examples
//!
//! ```
//! use core_types::{PropertyAttributes, Value};
//!
//! assert_eq!(Value::from(42), Value::Smi(42));
//! assert!(Value::default().is_undefined());
//!
//! let attrs = PropertyAttributes::FULL_ACCESS;
//! assert!(attrs.is_enumerable());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod attributes;
mod value;

pub use attributes::PropertyAttributes;
pub use value::Value;
