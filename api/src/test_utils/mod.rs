//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! `TestServices` wires the mocks into services, the GraphQL schema and the
//! application state for schema-level and HTTP-level tests.

pub mod app;
pub mod fixtures;
pub mod mocks;

pub use app::*;
pub use fixtures::*;
pub use mocks::*;
