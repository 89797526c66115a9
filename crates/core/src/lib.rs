//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley English tutor
//! assistant. This crate has **no transport dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion endpoint, memory backend, tool
//! catalog, local key-value store) is a trait here. Implementations live in
//! their respective crates and are injected into the orchestrator, which
//! makes it possible to:
//! - Swap implementations via configuration
//! - Test the pipeline with scripted fakes
//! - Keep a clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;
pub mod memory;
pub mod outcome;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ChatEntry, Message, Role, Sender, ToolCallDirective};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{Tool, ToolRegistry};
pub use memory::{MemoryDocument, MemoryStore};
pub use outcome::Outcome;
pub use store::KeyValueStore;
