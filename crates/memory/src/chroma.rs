//! HTTP vector-store backend speaking the Chroma REST API.
//!
//! Endpoints used:
//! - `GET  /api/v1/heartbeat`
//! - `POST /api/v1/collections` `{name, get_or_create}` -> `{id}`
//! - `POST /api/v1/collections/{id}/add` `{ids, documents, metadatas}`
//! - `POST /api/v1/collections/{id}/query` `{query_texts, n_results}` -> `{documents: [[...]]}`
//!
//! Availability is checked once per process and never re-checked. A backend
//! that comes up after a failed check stays unused until restart.

use async_trait::async_trait;
use parley_config::MemoryConfig;
use parley_core::error::MemoryError;
use parley_core::memory::{MemoryDocument, MemoryStore};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub struct ChromaMemoryStore {
    base_url: String,
    collection: String,
    client: reqwest::Client,
    available: OnceCell<bool>,
    collection_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
}

impl ChromaMemoryStore {
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, MemoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MemoryError::Storage(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            client,
            available: OnceCell::new(),
            collection_id: OnceCell::new(),
        })
    }

    pub fn from_config(config: &MemoryConfig) -> Result<Self, MemoryError> {
        Self::new(&config.url, &config.collection)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn heartbeat(&self) -> Result<(), MemoryError> {
        let url = format!("{}/api/v1/heartbeat", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MemoryError::Unavailable(format!("{}: {e}", self.base_url)))?;

        if !resp.status().is_success() {
            return Err(MemoryError::Unavailable(format!(
                "{} (status {})",
                self.base_url,
                resp.status().as_u16()
            )));
        }
        Ok(())
    }

    async fn create_collection(&self) -> Result<String, MemoryError> {
        let url = format!("{}/api/v1/collections", self.base_url);
        let body = serde_json::json!({
            "name": self.collection,
            "get_or_create": true,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MemoryError::Storage(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MemoryError::Storage(format!(
                "collection create returned {}",
                resp.status()
            )));
        }

        let created: CollectionResponse = resp
            .json()
            .await
            .map_err(|e| MemoryError::Protocol(e.to_string()))?;

        debug!(collection = %self.collection, id = %created.id, "Memory collection ready");
        Ok(created.id)
    }

    /// The collection ID, creating the collection on first use.
    /// A failed attempt is not cached; the next call tries again.
    async fn collection_id(&self) -> Result<&str, MemoryError> {
        self.collection_id
            .get_or_try_init(|| self.create_collection())
            .await
            .map(|id| id.as_str())
    }

    async fn add(&self, document: &MemoryDocument) -> Result<(), MemoryError> {
        let id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{id}/add", self.base_url);
        let body = serde_json::json!({
            "ids": [document.id],
            "documents": [document.text],
            "metadatas": [document.metadata],
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MemoryError::Storage(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MemoryError::Storage(format!("add returned {}", resp.status())));
        }
        Ok(())
    }

    async fn search(&self, text: &str, top_n: usize) -> Result<Vec<String>, MemoryError> {
        let id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{id}/query", self.base_url);
        let body = serde_json::json!({
            "query_texts": [text],
            "n_results": top_n,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MemoryError::QueryFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MemoryError::QueryFailed(format!("query returned {}", resp.status())));
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| MemoryError::Protocol(e.to_string()))?;

        Ok(parsed
            .documents
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect())
    }
}

#[async_trait]
impl MemoryStore for ChromaMemoryStore {
    fn name(&self) -> &str {
        "chroma"
    }

    async fn check_availability(&self) -> bool {
        *self
            .available
            .get_or_init(|| async {
                match self.heartbeat().await {
                    Ok(()) => {
                        info!(url = %self.base_url, "Memory backend available");
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Continuing without memory");
                        false
                    }
                }
            })
            .await
    }

    async fn ensure_collection(&self) -> bool {
        if !self.check_availability().await {
            return false;
        }
        match self.collection_id().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Failed to ensure memory collection");
                false
            }
        }
    }

    async fn store(&self, document: MemoryDocument) -> bool {
        if !self.check_availability().await {
            debug!("Memory unavailable, skipping store");
            return false;
        }
        match self.add(&document).await {
            Ok(()) => {
                debug!(id = %document.id, "Stored conversation turn");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to store memory document");
                false
            }
        }
    }

    async fn query(&self, text: &str, top_n: usize) -> Vec<String> {
        if !self.check_availability().await {
            debug!("Memory unavailable, skipping query");
            return Vec::new();
        }
        match self.search(text, top_n).await {
            Ok(documents) => {
                debug!(count = documents.len(), "Memory query answered");
                documents
            }
            Err(e) => {
                warn!(error = %e, "Memory query failed");
                Vec::new()
            }
        }
    }
}
