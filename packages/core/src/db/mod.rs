//! Storage abstraction layer
//!
//! Durable storage is an external collaborator reached through the
//! [`MapStore`] trait; [`MemoryStore`] is the bundled reference backend.

pub mod error;
pub mod map_store;
pub mod memory_store;

pub use error::DatabaseError;
pub use map_store::MapStore;
pub use memory_store::MemoryStore;
