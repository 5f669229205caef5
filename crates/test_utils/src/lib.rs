//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! brokerage test suite.
//!
//! # Modules
//!
//! - `fixtures`: The reference forms and drafts most tests start from
//! - `builders`: Builders for submitted forms with sensible defaults
//! - `database`: PostgreSQL test containers
//! - `assertions`: Assertion helpers for validation errors and reports
//! - `generators`: Property-based and fake data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
