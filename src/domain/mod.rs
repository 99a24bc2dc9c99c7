//! Shared domain types.
//!
//! Kept lightweight and serializable so results can be consumed in-memory
//! or exported to JSON by downstream reporting collaborators.

pub mod types;

pub use types::*;
