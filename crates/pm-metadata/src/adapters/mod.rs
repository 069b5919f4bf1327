//! # Adapters
//!
//! In-memory collaborators for tests and embedding.

pub mod memory;

pub use memory::{MemoryAccountInspector, MemoryAuthorizationProvider, MemoryMetadataStore};
