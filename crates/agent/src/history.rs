//! Chat log to completion-request history.

use parley_core::message::{ChatEntry, Message, Role};

/// Map the persisted chat log to request messages.
///
/// The welcome greeting is dropped when it is still the first entry; it
/// seeds the UI and was never part of the conversation. Everything else
/// keeps its order.
pub fn format_conversation_history(entries: &[ChatEntry], welcome_message: &str) -> Vec<Message> {
    let skip = match entries.first() {
        Some(first) if first.text == welcome_message => 1,
        _ => 0,
    };

    entries
        .iter()
        .skip(skip)
        .map(|entry| match entry.role() {
            Role::User => Message::user(&entry.text),
            _ => Message::assistant(&entry.text),
        })
        .collect()
}
