//! Tool execution step: dispatches tool-call requests and collects results.

use super::{LocalTools, ToolRegistry, ToolTarget};
use crate::aci::RemoteToolService;
use crate::agent::{Message, ToolCallRequest};
use crate::error::{NarcissusError, Result};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Prefix of every tool result produced from a failed invocation.
pub const TOOL_ERROR_PREFIX: &str = "Error executing tool:";

/// Dispatches tool calls to local tools or the remote service.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    local: LocalTools,
    remote: Option<Arc<dyn RemoteToolService>>,
    linked_account_owner_id: String,
}

impl ToolExecutor {
    pub fn new(
        registry: Arc<ToolRegistry>,
        local: LocalTools,
        remote: Option<Arc<dyn RemoteToolService>>,
        linked_account_owner_id: &str,
    ) -> Self {
        Self {
            registry,
            local,
            remote,
            linked_account_owner_id: linked_account_owner_id.to_string(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute every request in order and return one tool result per request.
    ///
    /// Failures never escape: they become tool results starting with
    /// [`TOOL_ERROR_PREFIX`].
    pub async fn execute_all(&self, requests: &[ToolCallRequest]) -> Vec<ToolCallRecord> {
        let mut records = Vec::with_capacity(requests.len());
        for request in requests {
            records.push(self.execute_one(request).await);
        }
        records
    }

    #[instrument(skip(self, request), fields(tool = %request.name, id = %request.id))]
    async fn execute_one(&self, request: &ToolCallRequest) -> ToolCallRecord {
        info!("Agent calling tool: {} with args: {}", request.name, request.arguments_json());

        let (result, failed) = match self.invoke(request).await {
            Ok(output) => (output, false),
            Err(e) => {
                error!("Tool {} failed: {}", request.name, e);
                (format!("{} {}", TOOL_ERROR_PREFIX, e), true)
            }
        };

        ToolCallRecord {
            id: request.id.clone(),
            name: request.name.clone(),
            arguments: request.arguments_json(),
            result,
            failed,
        }
    }

    async fn invoke(&self, request: &ToolCallRequest) -> Result<String> {
        match self.registry.target(&request.name) {
            Some(ToolTarget::Local(tool)) => self.local.invoke(tool, &request.arguments).await,
            // Unregistered names are still handed to the remote service.
            Some(ToolTarget::Remote) | None => {
                let remote = self
                    .remote
                    .as_ref()
                    .ok_or(NarcissusError::RemoteCatalogDisabled)?;
                remote
                    .execute(&request.name, &request.arguments, &self.linked_account_owner_id)
                    .await
            }
        }
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolCallRecord {
    /// Correlation id of the originating request.
    pub id: String,
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool, or the error description.
    pub result: String,
    /// Whether the invocation failed.
    pub failed: bool,
}

impl ToolCallRecord {
    /// The tool result message correlated to the originating request.
    pub fn to_message(&self) -> Message {
        Message::tool_result(&self.id, &self.result)
    }
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
