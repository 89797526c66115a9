//! Key-value store trait — where the chat session keeps its history.

use async_trait::async_trait;
use crate::error::Error;

/// A simple string key-value store (a browser-style local storage).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: String) -> std::result::Result<(), Error>;

    async fn remove(&self, key: &str) -> std::result::Result<(), Error>;
}
