//! Agent runner: the reasoning / tool-execution loop.

use super::message::{Conversation, Message};
use super::model::{ChatModel, OpenAIChatModel};
use crate::aci::{AciClient, RemoteToolService};
use crate::config::{Prompts, Settings};
use crate::error::{NarcissusError, Result};
use crate::tools::{LocalTools, ToolCallRecord, ToolDefinition, ToolExecutor, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default maximum number of reasoning steps per question.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Where the loop goes after a reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The model requested tools: execute them, then reason again.
    Continue,
    /// The model answered: stop and return its text.
    End,
}

/// Decide whether to continue, looking only at the latest assistant message.
pub fn route(message: &Message) -> Route {
    if message.tool_calls().is_empty() {
        Route::End
    } else {
        Route::Continue
    }
}

/// Support agent that answers questions, calling tools as the model requests.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolExecutor>,
    definitions: Vec<ToolDefinition>,
    system_prompt: String,
    max_iterations: usize,
}

impl Agent {
    /// Create an agent from a model handle and a tool executor.
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolExecutor>) -> Self {
        let definitions = tools.registry().definitions();
        Self {
            model,
            tools,
            definitions,
            system_prompt: Prompts::default().system_prompt(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Build the model client, tool registry and executor from settings.
    ///
    /// Remote tool definitions are resolved once here; a missing ACI key
    /// disables the remote catalog instead of failing.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let model: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(
            &settings.model.model,
            Duration::from_secs(settings.model.timeout_secs),
        )?);

        let remote: Option<Arc<dyn RemoteToolService>> = if settings.aci.is_enabled() {
            Some(Arc::new(AciClient::from_settings(&settings.aci)?))
        } else {
            warn!("ACI_API_KEY not set; remote tools are disabled");
            None
        };

        info!(
            "Linked account owner ID: {:?}",
            settings.aci.linked_account_owner_id
        );
        if settings.observability.token.is_some() {
            info!("Observability token configured");
        }

        let registry =
            Arc::new(ToolRegistry::build(remote.as_deref(), &settings.aci.configured_tools).await);

        let executor = ToolExecutor::new(
            registry,
            LocalTools::new(&settings.tools)?,
            remote,
            &settings.aci.linked_account_owner_id,
        );

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::new(model, Arc::new(executor))
            .with_system_prompt(&prompts.system_prompt())
            .with_max_iterations(settings.model.max_iterations))
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Set maximum iterations for the agent loop.
    ///
    /// At least one reasoning step always runs.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tool_definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Answer a single user message, returning only the final text.
    pub async fn ask(&self, message: &str) -> Result<String> {
        self.run(message).await.map(|response| response.content)
    }

    /// Run the agent loop for a user message.
    #[instrument(skip(self, message))]
    pub async fn run(&self, message: &str) -> Result<AgentResponse> {
        if message.trim().is_empty() {
            return Err(NarcissusError::InvalidInput("message is empty".to_string()));
        }

        let mut conversation = Conversation::new(message);
        let mut tool_calls_made = Vec::new();
        let mut iterations = 0;

        info!(conversation = %conversation.id(), "Starting agent run");

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                warn!(conversation = %conversation.id(), "Iteration budget exhausted");
                return Err(NarcissusError::IterationsExhausted(self.max_iterations));
            }

            debug!("Agent iteration {}", iterations);

            let reply = self.reason(&conversation).await?;
            let next = route(&reply);
            conversation.push_assistant(reply)?;

            if next == Route::End {
                let content = conversation
                    .last_assistant()
                    .map(|m| m.content().to_string())
                    .unwrap_or_default();

                info!(
                    conversation = %conversation.id(),
                    "Agent finished after {} iteration(s) and {} tool call(s)",
                    iterations,
                    tool_calls_made.len()
                );

                return Ok(AgentResponse {
                    content,
                    conversation,
                    tool_calls: tool_calls_made,
                    iterations,
                });
            }

            let records = self.execute_tools(&conversation).await;
            conversation.push_tool_results(records.iter().map(ToolCallRecord::to_message).collect())?;
            tool_calls_made.extend(records);
        }
    }

    /// Reasoning step: ask the model for the next assistant message.
    async fn reason(&self, conversation: &Conversation) -> Result<Message> {
        let reply = self
            .model
            .complete(&self.system_prompt, conversation.messages(), &self.definitions)
            .await?;

        if !reply.is_assistant() {
            return Err(NarcissusError::MalformedResponse(
                "model did not return an assistant message".to_string(),
            ));
        }
        Ok(reply)
    }

    /// Tool execution step for the latest assistant message.
    async fn execute_tools(&self, conversation: &Conversation) -> Vec<ToolCallRecord> {
        match conversation.last_assistant() {
            Some(message) => self.tools.execute_all(message.tool_calls()).await,
            None => Vec::new(),
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// The full conversation of the run.
    pub conversation: Conversation,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ToolCallRequest;
    use serde_json::json;

    #[test]
    fn test_route_is_pure_function_of_tool_calls() {
        let answer = Message::assistant("Atla builds evaluation models.");
        assert_eq!(route(&answer), Route::End);
        assert_eq!(route(&answer), Route::End);

        let wants_tool = Message::assistant_with_tools(
            "",
            vec![ToolCallRequest::new("call_1", "fetch_website", json!({"path": "/"}))],
        );
        assert_eq!(route(&wants_tool), Route::Continue);
        assert_eq!(route(&wants_tool), Route::Continue);
    }

    #[test]
    fn test_route_ignores_text_content() {
        let with_text_and_tool = Message::assistant_with_tools(
            "Let me check the docs.",
            vec![ToolCallRequest::new("call_1", "fetch_docs", json!({}))],
        );
        assert_eq!(route(&with_text_and_tool), Route::Continue);
        assert_eq!(route(&Message::assistant("")), Route::End);
    }
}
