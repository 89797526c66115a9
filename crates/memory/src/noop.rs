//! No-op memory backend — disables conversation memory entirely.

use async_trait::async_trait;
use parley_core::memory::{MemoryDocument, MemoryStore};

/// A memory backend that is never available and stores nothing.
pub struct NoopMemory;

#[async_trait]
impl MemoryStore for NoopMemory {
    fn name(&self) -> &str {
        "none"
    }

    async fn check_availability(&self) -> bool {
        false
    }

    async fn ensure_collection(&self) -> bool {
        false
    }

    async fn store(&self, _document: MemoryDocument) -> bool {
        false
    }

    async fn query(&self, _text: &str, _top_n: usize) -> Vec<String> {
        Vec::new()
    }
}
