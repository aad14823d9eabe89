//! Contract tests for shape_manager API
//!
//! These tests verify the public API the object-model layer relies on.
