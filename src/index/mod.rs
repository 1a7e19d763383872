//! Property indexing module
//!
//! Exact-match indexes over (label, property) pairs, kept in lockstep with
//! the graph store.

pub mod property_index;
pub mod manager;

pub use property_index::{PropertyIndex, TypeMismatch};
pub use manager::{IndexManager, PropertyIndexKey};
