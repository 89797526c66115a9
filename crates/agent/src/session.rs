//! ChatSession — the persisted chat log around the orchestrator.
//!
//! The log is stored as JSON under [`HISTORY_KEY`]. A missing or unreadable
//! log starts over with the welcome entry. Storage failures are logged and
//! never interrupt the chat.

use parley_core::error::SpeechError;
use parley_core::message::{ChatEntry, Sender};
use parley_core::outcome::Outcome;
use parley_core::store::KeyValueStore;
use parley_speech::SpeechOptions;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::orchestrator::{ConversationOrchestrator, TurnReply};

pub const HISTORY_KEY: &str = "chatbot-messages";

static QUOTED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"["“]([^"”]+)["”]"#).ok());
static AFTER_PHAT_AM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)phát âm\s+([\p{L}'-]+)").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// Input over the length limit; nothing was sent
    TooLong { length: usize, max: usize },
    Replied(TurnReply),
}

#[derive(Debug)]
pub struct Pronunciation {
    pub phrase: String,
    pub outcome: Outcome<(), SpeechError>,
}

/// The phrase a learner wants pronounced: the first quoted phrase, else
/// the word following "phát âm".
pub fn pronunciation_target(text: &str) -> Option<String> {
    let quoted = QUOTED
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    quoted.or_else(|| {
        AFTER_PHAT_AM
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

pub struct ChatSession {
    orchestrator: Arc<ConversationOrchestrator>,
    store: Arc<dyn KeyValueStore>,
    entries: Vec<ChatEntry>,
}

impl ChatSession {
    /// Restore the chat log from `store`.
    pub async fn load(
        orchestrator: Arc<ConversationOrchestrator>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let welcome = orchestrator.chatbot().welcome_message.clone();
        let entries = match store.get(HISTORY_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatEntry>>(&raw) {
                Ok(entries) if !entries.is_empty() => {
                    debug!(count = entries.len(), "Restored chat history");
                    entries
                }
                Ok(_) => vec![ChatEntry::welcome(welcome)],
                Err(e) => {
                    warn!(error = %e, "Stored chat history is unreadable, starting fresh");
                    vec![ChatEntry::welcome(welcome)]
                }
            },
            Ok(None) => vec![ChatEntry::welcome(welcome)],
            Err(e) => {
                warn!(error = %e, "Could not read chat history, starting fresh");
                vec![ChatEntry::welcome(welcome)]
            }
        };

        Self {
            orchestrator,
            store,
            entries,
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn orchestrator(&self) -> &Arc<ConversationOrchestrator> {
        &self.orchestrator
    }

    /// Send one user message and append the reply.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        let max = self.orchestrator.chatbot().max_message_length;
        let length = text.chars().count();
        if length > max {
            return SendOutcome::TooLong { length, max };
        }

        let history = self.entries.clone();
        self.push(Sender::User, text);
        self.save().await;

        let reply = self.orchestrator.respond(&history, text).await;
        self.push(Sender::Bot, &reply.text);
        self.save().await;

        SendOutcome::Replied(reply)
    }

    /// Reset to the welcome entry and forget the stored log.
    pub async fn clear(&mut self) {
        self.entries = vec![ChatEntry::welcome(
            self.orchestrator.chatbot().welcome_message.clone(),
        )];
        if let Err(e) = self.store.remove(HISTORY_KEY).await {
            warn!(error = %e, "Could not remove stored chat history");
        }
    }

    /// Speak the phrase the learner last asked about. `None` when there is
    /// no such phrase or no synthesizer.
    pub async fn pronounce_last_word(&self) -> Option<Pronunciation> {
        let speech = self.orchestrator.speech()?;
        let phrase = self
            .entries
            .iter()
            .rev()
            .find(|e| e.sender == Sender::User)
            .and_then(|e| pronunciation_target(&e.text))?;

        let outcome = speech.speak(&phrase, &SpeechOptions::default()).await;
        Some(Pronunciation { phrase, outcome })
    }

    fn push(&mut self, sender: Sender, text: &str) {
        let id = self.entries.len() as u64 + 1;
        self.entries.push(ChatEntry::new(id, sender, text));
    }

    async fn save(&self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Could not serialize chat history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, raw).await {
            warn!(error = %e, "Could not save chat history");
        }
    }
}
