//! Message and chat history domain types.
//!
//! Two shapes of "message" flow through the system:
//! - [`Message`]: the wire-level turn sent to and received from the completion
//!   endpoint (system / user / assistant / tool roles, optional tool calls).
//! - [`ChatEntry`]: the persisted, user-facing chat log record
//!   (`{id, text, sender, timestamp}`) the session displays and stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::outcome::Outcome;

/// The greeting seeded into an empty chat. It is UI decoration, not a real turn.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// The role of a message sender in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (tutor persona, tool overview)
    System,
    /// The learner
    User,
    /// The model
    Assistant,
    /// Tool execution result
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A single turn in a completion request.
///
/// `content` is `None` only for an assistant message that requests tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: Option<String>,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallDirective>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_role(role: Role, content: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, Some(content.into()))
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, Some(content.into()))
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, Some(content.into()))
    }

    /// Create an assistant message that only requests tools (`content: null`).
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCallDirective>) -> Self {
        let mut msg = Self::with_role(Role::Assistant, None);
        msg.tool_calls = tool_calls;
        msg
    }

    /// Create a tool result message answering `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Tool, Some(content.into()));
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    /// The text content, or `""` when the message carries none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Whether the model asked for at least one tool.
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A model-issued request to run a named local function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDirective {
    /// Unique ID; the answering tool message must echo it
    pub id: String,

    /// Name of the tool to invoke
    pub function_name: String,

    /// Arguments as a JSON string, exactly as the model produced them
    pub arguments_json: String,
}

impl ToolCallDirective {
    pub fn new(
        id: impl Into<String>,
        function_name: impl Into<String>,
        arguments_json: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            function_name: function_name.into(),
            arguments_json: arguments_json.into(),
        }
    }

    /// Parse the argument string into a JSON object.
    ///
    /// Empty input parses as `{}`. Malformed JSON, or JSON that is not an
    /// object, comes back as `Degraded`; callers use an empty object then.
    pub fn parse_arguments(&self) -> Outcome<serde_json::Map<String, serde_json::Value>> {
        let raw = self.arguments_json.trim();
        if raw.is_empty() {
            return Outcome::Ok(serde_json::Map::new());
        }
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => Outcome::Ok(map),
            Ok(other) => Outcome::Degraded(format!(
                "arguments for {} are not a JSON object: {other}",
                self.function_name
            )),
            Err(e) => Outcome::Degraded(format!(
                "arguments for {} are not valid JSON: {e}",
                self.function_name
            )),
        }
    }
}

/// Who authored a persisted chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A persisted chat log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: u64,

    /// Display text. Boxed `{"content": ...}` shapes are unwrapped on load.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,

    pub sender: Sender,

    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    pub fn new(id: u64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// The seed entry shown in an empty chat.
    pub fn welcome(text: impl Into<String>) -> Self {
        Self::new(1, Sender::Bot, text)
    }

    pub fn role(&self) -> Role {
        match self.sender {
            Sender::User => Role::User,
            Sender::Bot => Role::Assistant,
        }
    }
}

/// Collapse a string-or-boxed content value into one canonical string.
///
/// `"text"` stays as is, `{"content": "text"}` is unwrapped one level, and
/// anything else (null, numbers, objects without a string `content`) is `""`.
pub fn normalize_content(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => match map.get("content") {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(normalize_content(&value))
}
