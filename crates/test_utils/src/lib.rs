//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! receivable engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `ports`: Recording collaborator doubles and tracing setup
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod ports;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use ports::*;
pub use assertions::*;
pub use generators::*;
