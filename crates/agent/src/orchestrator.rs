//! ConversationOrchestrator — one user turn from chat log to final reply.
//!
//! Per turn:
//! 1. Format the chat log into request history
//! 2. Consult memory; a hit answers the turn directly (short-circuit mode)
//!    or enriches the system prompt
//! 3. Call the model; run at most one requested tool and call again with its result
//! 4. Store the turn in memory, speak the reply
//!
//! Any failure in 2-4 becomes the configured apology. The conversation
//! never ends on an error.

use parley_config::{AppConfig, ChatbotConfig};
use parley_core::error::Error;
use parley_core::memory::{MemoryDocument, MemoryStore};
use parley_core::message::{ChatEntry, Message, ToolCallDirective};
use parley_core::outcome::Outcome;
use parley_core::tool::{ToolRegistry, ToolResult, failure_message};
use parley_providers::{CompletionClient, CompletionOptions};
use parley_speech::{SpeechOptions, SpeechState, SpeechSynthesizer};
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info, warn};

use crate::history::format_conversation_history;

static ASSISTANT_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Assistant:\s*([\s\S]*)").ok());

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Answered straight from a stored conversation turn
    Memory,
    /// The model's first reply
    Model,
    /// The model's reply after running a tool
    Tool { name: String },
    /// Something failed; the apology was returned
    Apology,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub text: String,
    pub source: ReplySource,
}

impl TurnReply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// What `initialize` managed to bring up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub memory_ready: bool,
    pub speech: Option<SpeechState>,
}

/// Extract the reply text from a stored `"User: ...\nAssistant: ..."` turn.
/// Documents without the marker are returned whole.
pub fn memory_answer(document: &str) -> String {
    ASSISTANT_MARKER
        .as_ref()
        .and_then(|re| re.captures(document))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .unwrap_or_else(|| document.to_string())
}

pub struct ConversationOrchestrator {
    completion: CompletionClient,
    tools: Arc<ToolRegistry>,
    memory: Option<Arc<dyn MemoryStore>>,
    speech: Option<Arc<SpeechSynthesizer>>,
    chatbot: ChatbotConfig,
    enable_tools: bool,
    top_n: usize,
    short_circuit: bool,
    speech_options: SpeechOptions,
    memory_enabled: AtomicBool,
    speech_enabled: AtomicBool,
}

impl ConversationOrchestrator {
    /// An orchestrator with default chatbot settings, tools on, no memory
    /// and no speech.
    pub fn new(completion: CompletionClient, tools: Arc<ToolRegistry>) -> Self {
        Self {
            completion,
            tools,
            memory: None,
            speech: None,
            chatbot: ChatbotConfig::default(),
            enable_tools: true,
            top_n: 3,
            short_circuit: true,
            speech_options: SpeechOptions::default(),
            memory_enabled: AtomicBool::new(false),
            speech_enabled: AtomicBool::new(false),
        }
    }

    /// Wire the orchestrator from `config`. Toggles start from the
    /// `memory.enabled` and `speech.enabled` settings.
    pub fn from_config(
        config: &AppConfig,
        completion: CompletionClient,
        tools: Arc<ToolRegistry>,
        memory: Option<Arc<dyn MemoryStore>>,
        speech: Option<Arc<SpeechSynthesizer>>,
    ) -> Self {
        let mut orchestrator = Self::new(completion, tools)
            .with_chatbot(config.chatbot.clone())
            .with_tools_enabled(config.completion.enable_tools)
            .with_memory_options(config.memory.top_n, config.memory.short_circuit)
            .with_speech_options(SpeechOptions::from(&config.speech));
        if let Some(memory) = memory {
            orchestrator = orchestrator.with_memory(memory);
        }
        if let Some(speech) = speech {
            orchestrator = orchestrator.with_speech(speech);
        }
        orchestrator.set_memory_enabled(config.memory.enabled);
        orchestrator.set_speech_enabled(config.speech.enabled);
        orchestrator
    }

    pub fn with_chatbot(mut self, chatbot: ChatbotConfig) -> Self {
        self.chatbot = chatbot;
        self
    }

    pub fn with_tools_enabled(mut self, enabled: bool) -> Self {
        self.enable_tools = enabled;
        self
    }

    /// Attach a memory store and turn memory on.
    pub fn with_memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self.memory_enabled = AtomicBool::new(true);
        self
    }

    pub fn with_memory_options(mut self, top_n: usize, short_circuit: bool) -> Self {
        self.top_n = top_n.max(1);
        self.short_circuit = short_circuit;
        self
    }

    /// Attach a synthesizer and turn speech on.
    pub fn with_speech(mut self, speech: Arc<SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self.speech_enabled = AtomicBool::new(true);
        self
    }

    pub fn with_speech_options(mut self, options: SpeechOptions) -> Self {
        self.speech_options = options;
        self
    }

    pub fn set_memory_enabled(&self, enabled: bool) {
        self.memory_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_speech_enabled(&self, enabled: bool) {
        self.speech_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Memory is consulted only when a store is attached and the toggle is on.
    pub fn memory_enabled(&self) -> bool {
        self.memory.is_some() && self.memory_enabled.load(Ordering::SeqCst)
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech.is_some() && self.speech_enabled.load(Ordering::SeqCst)
    }

    pub fn chatbot(&self) -> &ChatbotConfig {
        &self.chatbot
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn speech(&self) -> Option<&Arc<SpeechSynthesizer>> {
        self.speech.as_ref()
    }

    /// Ensure the memory collection and warm up the speech model. Neither
    /// failure blocks the conversation.
    pub async fn initialize(&self) -> InitReport {
        let memory_ready = match &self.memory {
            Some(memory) if self.memory_enabled() => {
                let ready = memory.ensure_collection().await;
                if !ready {
                    debug!("Memory unavailable, continuing without memory features");
                }
                ready
            }
            _ => false,
        };

        let speech = match &self.speech {
            Some(speech) => Some(speech.initialize().await),
            None => None,
        };

        info!(memory_ready, speech = ?speech, "Conversation systems initialized");
        InitReport { memory_ready, speech }
    }

    /// Answer one user turn. `history` is the chat log before this message.
    pub async fn respond(&self, history: &[ChatEntry], user_text: &str) -> TurnReply {
        match self.run_turn(history, user_text).await {
            Ok(reply) => {
                self.speak(&reply.text).await;
                reply
            }
            Err(e) => {
                error!(error = %e, "Turn failed, returning apology");
                TurnReply::new(self.chatbot.apology.clone(), ReplySource::Apology)
            }
        }
    }

    async fn run_turn(&self, history: &[ChatEntry], user_text: &str) -> Result<TurnReply, Error> {
        let mut system_prompt = self.chatbot.system_prompt.clone();

        if self.memory_enabled() {
            let context = self.recall(user_text).await;
            if let Some(first) = context.first() {
                if self.short_circuit {
                    let answer = memory_answer(first);
                    if !answer.trim().is_empty() {
                        debug!("Answering from memory");
                        return Ok(TurnReply::new(answer, ReplySource::Memory));
                    }
                    debug!("Memory hit has an empty answer, asking the model");
                } else {
                    system_prompt.push_str(&Self::context_block(&context));
                }
            }
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(format_conversation_history(history, &self.chatbot.welcome_message));
        messages.push(Message::user(user_text));

        let options = if self.enable_tools {
            CompletionOptions::with_tools(self.tools.definitions())
        } else {
            CompletionOptions::default()
        };
        let response = self.completion.complete(&messages, options).await?;

        let reply = if self.enable_tools && response.requests_tools() {
            self.answer_with_tool(messages, response.tool_calls).await?
        } else {
            TurnReply::new(Self::final_text(&response)?, ReplySource::Model)
        };

        self.remember(user_text, &reply.text).await;
        Ok(reply)
    }

    /// Run the first directive, answer the rest as skipped, and ask the
    /// model again with the results.
    async fn answer_with_tool(
        &self,
        mut messages: Vec<Message>,
        calls: Vec<ToolCallDirective>,
    ) -> Result<TurnReply, Error> {
        let Some(first) = calls.first().cloned() else {
            return Err(Error::Internal("tool call list was empty".into()));
        };
        if calls.len() > 1 {
            warn!(
                count = calls.len(),
                executed = %first.function_name,
                "Model requested several tools; only the first is executed"
            );
        }

        let arguments = first.parse_arguments().or_fallback(|reason| {
            warn!(reason = %reason, "Using empty tool arguments");
            serde_json::Map::new()
        })?;

        let result = match self
            .tools
            .execute(&first.function_name, serde_json::Value::Object(arguments))
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %first.function_name, error = %e, "Tool call failed");
                failure_message(&first.function_name, &e)
            }
        };

        messages.push(Message::assistant_tool_calls(calls.clone()));
        messages.push(ToolResult::new(&first.id, result).into_message());
        for skipped in calls.iter().skip(1) {
            let notice = format!(
                "Error: Skipped {}. Only one tool call is executed per turn.",
                skipped.function_name
            );
            messages.push(ToolResult::new(&skipped.id, notice).into_message());
        }

        let follow_up = self
            .completion
            .complete(&messages, CompletionOptions::default())
            .await?;

        Ok(TurnReply::new(
            Self::final_text(&follow_up)?,
            ReplySource::Tool {
                name: first.function_name,
            },
        ))
    }

    async fn recall(&self, user_text: &str) -> Vec<String> {
        let Some(memory) = &self.memory else {
            return Vec::new();
        };
        if !memory.check_availability().await {
            return Vec::new();
        }
        memory.query(user_text, self.top_n).await
    }

    async fn remember(&self, user_text: &str, reply: &str) {
        if !self.memory_enabled() {
            return;
        }
        if let Some(memory) = &self.memory {
            if memory.check_availability().await {
                memory
                    .store(MemoryDocument::conversation_turn(user_text, reply))
                    .await;
            }
        }
    }

    async fn speak(&self, text: &str) {
        if !self.speech_enabled() || text.is_empty() {
            return;
        }
        let Some(speech) = &self.speech else {
            return;
        };
        match speech.speak(text, &self.speech_options).await {
            Outcome::Ok(()) => debug!("Reply spoken with generated voice"),
            Outcome::Degraded(reason) => {
                debug!(reason = %reason, "Reply spoken with platform voice")
            }
            Outcome::Fail(e) => warn!(error = %e, "Could not speak reply"),
        }
    }

    fn context_block(documents: &[String]) -> String {
        let mut block = String::from("\n\nRelevant past conversations:");
        for (i, doc) in documents.iter().enumerate() {
            block.push_str(&format!("\n{}. {doc}", i + 1));
        }
        block
    }

    fn final_text(message: &Message) -> Result<String, Error> {
        match message.text() {
            "" => Err(Error::Internal("model returned an empty reply".into())),
            text => Ok(text.to_string()),
        }
    }
}
