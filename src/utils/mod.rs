//! Shared utilities: plan validation.

pub mod validation;

pub use validation::{validate_non_overlapping, validate_plan};
