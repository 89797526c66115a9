//! Memory trait — optional semantic context from past conversation turns.
//!
//! Every operation is best-effort. An unreachable backend is a normal steady
//! state: checks answer `false`, writes answer `false`, reads answer an empty
//! list. Nothing here returns an error to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    /// Unique ID for this document
    pub id: String,

    /// The embeddable text
    pub text: String,

    /// Free-form metadata stored alongside the text
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// When this document was written
    pub timestamp: DateTime<Utc>,
}

impl MemoryDocument {
    /// Build the document for a completed turn: `"User: ...\nAssistant: ..."`,
    /// keyed by the current time.
    pub fn conversation_turn(user_text: &str, reply: &str) -> Self {
        let timestamp = Utc::now();
        let mut metadata = serde_json::Map::new();
        metadata.insert("type".into(), "conversation".into());
        metadata.insert("timestamp".into(), timestamp.to_rfc3339().into());

        Self {
            id: format!("conv_{}", timestamp.timestamp_millis()),
            text: format!("User: {user_text}\nAssistant: {reply}"),
            metadata,
            timestamp,
        }
    }
}

/// The core MemoryStore trait.
///
/// Implementations: HTTP vector store, in-memory (tests/offline), none.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// The backend name (e.g., "chroma", "in_memory", "none").
    fn name(&self) -> &str;

    /// Whether the backend is reachable. Implementations may cache the answer.
    async fn check_availability(&self) -> bool;

    /// Create the storage namespace if it does not exist yet.
    async fn ensure_collection(&self) -> bool;

    /// Store a document. Failures are logged, never raised.
    async fn store(&self, document: MemoryDocument) -> bool;

    /// The texts of the `top_n` most relevant documents, best first.
    /// Empty means "no memory", never an error.
    async fn query(&self, text: &str, top_n: usize) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_turn_body() {
        let doc = MemoryDocument::conversation_turn("hi", "Hello!");
        assert_eq!(doc.text, "User: hi\nAssistant: Hello!");
        assert!(doc.id.starts_with("conv_"));
        assert_eq!(doc.metadata["type"], "conversation");
    }

    #[test]
    fn document_serialization() {
        let doc = MemoryDocument::conversation_turn("What is serendipity?", "A happy accident.");
        let json = serde_json::to_string(&doc).unwrap();
        let back: MemoryDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
