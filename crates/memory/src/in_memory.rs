//! In-memory backend — useful for testing and offline sessions.

use async_trait::async_trait;
use parley_core::memory::{MemoryDocument, MemoryStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Stores documents in a Vec and ranks them by keyword overlap.
pub struct InMemoryStore {
    documents: Arc<RwLock<Vec<MemoryDocument>>>,
    available: bool,
    queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            available: true,
            queries: AtomicUsize::new(0),
        }
    }

    /// A store that reports itself unreachable: every operation degrades.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Seed with raw document texts.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| MemoryDocument {
                id: format!("seed_{i}"),
                text: text.into(),
                metadata: serde_json::Map::new(),
                timestamp: chrono::Utc::now(),
            })
            .collect();
        Self {
            documents: Arc::new(RwLock::new(documents)),
            ..Self::new()
        }
    }

    pub async fn documents(&self) -> Vec<MemoryDocument> {
        self.documents.read().await.clone()
    }

    /// How many queries reached this store.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn score(document: &str, words: &[String]) -> usize {
        let lower = document.to_lowercase();
        words.iter().filter(|w| lower.contains(w.as_str())).count()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn ensure_collection(&self) -> bool {
        self.available
    }

    async fn store(&self, document: MemoryDocument) -> bool {
        if !self.available {
            return false;
        }
        self.documents.write().await.push(document);
        true
    }

    async fn query(&self, text: &str, top_n: usize) -> Vec<String> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Vec::new();
        }

        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        let documents = self.documents.read().await;
        let mut scored: Vec<(usize, &MemoryDocument)> = documents
            .iter()
            .map(|d| (Self::score(&d.text, &words), d))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(top_n)
            .map(|(_, d)| d.text.clone())
            .collect()
    }
}
