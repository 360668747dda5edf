//! Chat model abstraction and the OpenAI implementation.

use super::message::{Message, ToolCallRequest};
use crate::error::{NarcissusError, Result};
use crate::openai::create_client_with_timeout;
use crate::tools::ToolDefinition;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// A hosted chat-completion model with tool calling.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next assistant message for the conversation.
    ///
    /// The returned message is always `Message::Assistant`.
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message>;
}

/// OpenAI chat completions backend.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    /// Create a model client with the given request timeout.
    pub fn new(model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message> {
        let request_messages = to_request_messages(system_prompt, messages)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(request_messages);
        if !tools.is_empty() {
            builder.tools(to_openai_tools(tools));
        }
        let request = builder
            .build()
            .map_err(|e| NarcissusError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| NarcissusError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| NarcissusError::MalformedResponse("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .iter()
            .map(|call| ToolCallRequest::from_raw(&call.id, &call.function.name, &call.function.arguments))
            .collect::<Result<Vec<_>>>()?;

        debug!("Model replied with {} tool calls", tool_calls.len());

        Ok(Message::assistant_with_tools(
            choice.message.content.unwrap_or_default(),
            tool_calls,
        ))
    }
}

/// Convert tool definitions into OpenAI function tools.
pub fn to_openai_tools(tools: &[ToolDefinition]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        })
        .collect()
}

/// Build the request history: the system prompt followed by the conversation.
pub fn to_request_messages(
    system_prompt: &str,
    messages: &[Message],
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut request = Vec::with_capacity(messages.len() + 1);

    request.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| NarcissusError::Agent(e.to_string()))?
            .into(),
    );

    for message in messages {
        let converted: ChatCompletionRequestMessage = match message {
            Message::User { content } => ChatCompletionRequestUserMessageArgs::default()
                .content(content.as_str())
                .build()
                .map_err(|e| NarcissusError::Agent(e.to_string()))?
                .into(),
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if !content.is_empty() {
                    args.content(content.as_str());
                }
                if !tool_calls.is_empty() {
                    args.tool_calls(
                        tool_calls
                            .iter()
                            .map(|call| ChatCompletionMessageToolCall {
                                id: call.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: call.name.clone(),
                                    arguments: call.arguments_json(),
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }
                args.build()
                    .map_err(|e| NarcissusError::Agent(e.to_string()))?
                    .into()
            }
            Message::ToolResult {
                tool_call_id,
                content,
            } => ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(tool_call_id.as_str())
                .content(content.as_str())
                .build()
                .map_err(|e| NarcissusError::Agent(e.to_string()))?
                .into(),
        };
        request.push(converted);
    }

    Ok(request)
}
