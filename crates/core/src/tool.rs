//! Tool trait — the abstraction over locally executed helper functions.
//!
//! The model may ask for one of these by name; the orchestrator runs it and
//! feeds the text result back in a follow-up completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use crate::error::ToolError;
use crate::message::Message;
use crate::provider::ToolDefinition;

/// The answer to one tool-call directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The directive ID this result answers
    pub tool_call_id: String,

    /// The text handed back to the model
    pub content: String,
}

impl ToolResult {
    pub fn new(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Convert into the `tool` role message the follow-up request carries.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.tool_call_id, self.content)
    }
}

/// The core Tool trait.
///
/// Each helper (translation, grammar, vocabulary, ...) implements this trait
/// and is registered in the [`ToolRegistry`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "translate_text").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// The text a failed tool run hands back to the model in place of a result.
pub fn failure_message(tool_name: &str, error: &ToolError) -> String {
    format!("Error: Unable to execute {tool_name}. {error}")
}

/// A registry of available tools, kept in registration order.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for advertising to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.to_definition())
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// An unknown name is an error (`ToolError::NotFound`), as are arguments
    /// that are not a JSON object (`ToolError::InvalidArguments`). A handler
    /// failure is not: it is turned into a descriptive `"Error: ..."` string
    /// so the model can read it and react.
    pub async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        if !arguments.is_object() {
            return Err(ToolError::InvalidArguments(format!(
                "{name} expects an object, got {arguments}"
            )));
        }

        match tool.execute(arguments).await {
            Ok(output) => {
                debug!(tool = %name, bytes = output.len(), "Tool executed");
                Ok(output)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                Ok(failure_message(name, &e))
            }
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
