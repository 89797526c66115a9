//! Wiring shared by the commands: config, services and the chat session.

use std::sync::Arc;

use parley_agent::{ChatSession, ConversationOrchestrator};
use parley_config::AppConfig;
use parley_core::memory::MemoryStore;
use parley_core::store::KeyValueStore;
use parley_memory::{ChromaMemoryStore, FileKvStore};
use parley_providers::CompletionClient;
use parley_speech::SpeechSynthesizer;
use tracing::warn;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

pub fn load_config() -> CliResult<AppConfig> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Fail early with setup instructions when no API key is available.
pub fn require_api_key(config: &AppConfig) -> CliResult<()> {
    if config.has_api_key() {
        return Ok(());
    }
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    PARLEY_API_KEY=sk-...");
    eprintln!("    OPENAI_API_KEY=sk-...");
    eprintln!();
    eprintln!("  Or add `api_key` to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}

pub fn history_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    Arc::new(FileKvStore::new(config.history.resolved_path()))
}

pub fn memory_store(config: &AppConfig) -> Option<Arc<dyn MemoryStore>> {
    match ChromaMemoryStore::from_config(&config.memory) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(error = %e, "Memory backend could not be created, continuing without memory");
            None
        }
    }
}

pub fn build_orchestrator(config: &AppConfig) -> CliResult<Arc<ConversationOrchestrator>> {
    let completion = CompletionClient::from_config(config)?;
    let tools = Arc::new(parley_tools::default_registry());
    let speech = Arc::new(SpeechSynthesizer::from_config(&config.speech));

    Ok(Arc::new(ConversationOrchestrator::from_config(
        config,
        completion,
        tools,
        memory_store(config),
        Some(speech),
    )))
}

pub async fn open_session(config: &AppConfig) -> CliResult<ChatSession> {
    let orchestrator = build_orchestrator(config)?;
    Ok(ChatSession::load(orchestrator, history_store(config)).await)
}
