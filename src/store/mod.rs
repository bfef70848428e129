//! Data store implementations of the collaborator traits.

pub mod memory;

pub use memory::{Dataset, MemoryStore};
