//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! quote wizard test suite.
//!
//! # Modules
//!
//! - `fixtures`: The reference quote, plans and ready-made wizards
//! - `builders`: Builder patterns for drafts and plans
//! - `assertions`: Custom assertion helpers for wizard state and API bodies
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
