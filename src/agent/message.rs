//! Conversation and message types exchanged with the chat model.

use crate::error::{NarcissusError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A model-issued request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation token, unique within one assistant message.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Tool arguments as a JSON object.
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Parse the raw JSON argument string sent by the model.
    ///
    /// An empty string means no arguments. Anything else must be a JSON object.
    pub fn from_raw(id: &str, name: &str, raw_arguments: &str) -> Result<Self> {
        let arguments = if raw_arguments.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(raw_arguments) {
                Ok(Value::Object(map)) => map,
                Ok(Value::Null) => Map::new(),
                Ok(other) => {
                    return Err(NarcissusError::MalformedResponse(format!(
                        "arguments for tool call {} ({}) are not an object: {}",
                        id, name, other
                    )))
                }
                Err(e) => {
                    return Err(NarcissusError::MalformedResponse(format!(
                        "arguments for tool call {} ({}) are not valid JSON: {}",
                        id, name, e
                    )))
                }
            }
        };

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        })
    }

    /// Arguments serialized back to a JSON string.
    pub fn arguments_json(&self) -> String {
        Value::Object(self.arguments.clone()).to_string()
    }
}

impl std::fmt::Display for ToolCallRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments_json())
    }
}

/// A single entry of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Message::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::ToolResult {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Text content of the message.
    pub fn content(&self) -> &str {
        match self {
            Message::User { content }
            | Message::Assistant { content, .. }
            | Message::ToolResult { content, .. } => content,
        }
    }

    /// Tool calls carried by an assistant message; empty for other variants.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Message::Assistant { .. })
    }
}

/// Ordered message history for one user interaction.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    id: Uuid,
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with a single user message.
    pub fn new(user_message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![Message::user(user_message)],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a reply from the model.
    pub fn push_assistant(&mut self, message: Message) -> Result<()> {
        if !message.is_assistant() {
            return Err(NarcissusError::Agent(
                "expected an assistant message".to_string(),
            ));
        }
        self.messages.push(message);
        Ok(())
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// Append the results of one tool execution step.
    ///
    /// The last message must be an assistant message and `results` must hold
    /// exactly one tool result per request, in request order.
    pub fn push_tool_results(&mut self, results: Vec<Message>) -> Result<()> {
        let requests = match self.messages.last() {
            Some(Message::Assistant { tool_calls, .. }) => tool_calls,
            _ => {
                return Err(NarcissusError::Agent(
                    "tool results must follow an assistant message".to_string(),
                ))
            }
        };

        if requests.len() != results.len() {
            return Err(NarcissusError::Agent(format!(
                "expected {} tool results, got {}",
                requests.len(),
                results.len()
            )));
        }

        for (request, result) in requests.iter().zip(&results) {
            match result {
                Message::ToolResult { tool_call_id, .. } if *tool_call_id == request.id => {}
                Message::ToolResult { tool_call_id, .. } => {
                    return Err(NarcissusError::Agent(format!(
                        "tool result {} does not match request {}",
                        tool_call_id, request.id
                    )))
                }
                _ => {
                    return Err(NarcissusError::Agent(
                        "only tool results may follow a tool-calling message".to_string(),
                    ))
                }
            }
        }

        self.messages.extend(results);
        Ok(())
    }

    /// Check that every tool result answers the assistant message before it,
    /// with one result per request in request order.
    pub fn is_well_correlated(&self) -> bool {
        let mut pending: &[ToolCallRequest] = &[];
        let mut answered = 0;

        for message in &self.messages {
            match message {
                Message::ToolResult { tool_call_id, .. } => {
                    match pending.get(answered) {
                        Some(request) if request.id == *tool_call_id => answered += 1,
                        _ => return false,
                    }
                }
                other => {
                    if answered != pending.len() {
                        return false;
                    }
                    pending = other.tool_calls();
                    answered = 0;
                }
            }
        }

        // A trailing tool-calling message may still be awaiting its results.
        answered == 0 || answered == pending.len()
    }
}
