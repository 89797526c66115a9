//! Conversation orchestration for the Parley tutor.
//!
//! One turn runs **Recall → Ask → Act → Answer**:
//!
//! 1. **Recall** similar past turns from memory (optionally answering from them)
//! 2. **Ask** the model with the system prompt, history and user message
//! 3. **Act** on the first tool call, if any, and ask again with its result
//! 4. **Answer**, remember the turn and speak the reply
//!
//! Any failure along the way turns into the configured apology.

pub mod history;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use history::format_conversation_history;
pub use orchestrator::{ConversationOrchestrator, InitReport, ReplySource, TurnReply, memory_answer};
pub use session::{ChatSession, HISTORY_KEY, Pronunciation, SendOutcome, pronunciation_target};
