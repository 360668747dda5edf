//! Remote tool catalog and execution service.

mod client;

pub use client::{AciClient, FunctionExecutionResult};

use crate::error::Result;
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A third-party service that resolves tool names to definitions and
/// executes them on request.
#[async_trait]
pub trait RemoteToolService: Send + Sync {
    /// Look up a tool definition by catalog name. `None` if it does not exist.
    async fn get_definition(&self, name: &str) -> Result<Option<ToolDefinition>>;

    /// Execute a tool on behalf of the linked account, returning its result as text.
    async fn execute(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        linked_account_owner_id: &str,
    ) -> Result<String>;
}
