//! Memory backends and history storage for Parley.

pub mod chroma;
pub mod in_memory;
pub mod kv_store;
pub mod noop;

pub use chroma::ChromaMemoryStore;
pub use in_memory::InMemoryStore;
pub use kv_store::{FileKvStore, InMemoryKvStore};
pub use noop::NoopMemory;
