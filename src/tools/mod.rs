//! Tool definitions, the process-wide tool registry, and tool execution.
//!
//! Local tools (website, docs, SDK README, demo link) run in-process. Any
//! other tool name is delegated to the remote catalog service.

mod executor;
mod fetch;
mod local;

pub use executor::{ToolCallRecord, ToolExecutor, TOOL_ERROR_PREFIX};
pub use fetch::{
    collapse_whitespace, extract_text, truncate_content, WebFetcher, PAGE_CHAR_LIMIT,
    README_CHAR_LIMIT, TRUNCATION_MARKER,
};
pub use local::{LocalTool, LocalTools};

use crate::aci::RemoteToolService;
use crate::error::{NarcissusError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// A callable function exposed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }

    /// Parse an OpenAI-format function definition.
    ///
    /// Accepts both `{"type": "function", "function": {...}}` and the bare
    /// function object.
    pub fn from_openai_json(value: &Value) -> Result<Self> {
        let function = value.get("function").unwrap_or(value);

        let name = function["name"]
            .as_str()
            .ok_or_else(|| NarcissusError::RemoteTool("definition has no name".to_string()))?;
        let description = function["description"].as_str().unwrap_or_default();
        let parameters = function
            .get("parameters")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}}));

        Ok(Self::new(name, description, parameters))
    }
}

/// Where a registered tool is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolTarget {
    Local(LocalTool),
    Remote,
}

#[derive(Debug, Clone)]
struct RegisteredTool {
    definition: ToolDefinition,
    target: ToolTarget,
}

/// Immutable name-to-tool mapping, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Registry holding only the local tools.
    pub fn local() -> Self {
        let mut registry = Self::default();
        for tool in LocalTool::ALL {
            registry.insert(tool.definition(), ToolTarget::Local(tool));
        }
        registry
    }

    /// Build the registry from the local tools plus remote definitions.
    ///
    /// Each configured remote name is looked up once. Missing or failing
    /// lookups are logged and skipped, and a remote name that collides with a
    /// local tool is ignored so the local tool keeps precedence.
    pub async fn build(remote: Option<&dyn RemoteToolService>, configured: &[String]) -> Self {
        let mut registry = Self::local();

        let Some(remote) = remote else {
            if !configured.is_empty() {
                info!("Remote tool catalog disabled; skipping {} configured tools", configured.len());
            }
            return registry;
        };

        info!("Loading {} configured remote tools", configured.len());

        for name in configured {
            if registry.contains(name) {
                warn!("Remote tool {} collides with a local tool; keeping the local one", name);
                continue;
            }

            match remote.get_definition(name).await {
                Ok(Some(definition)) => {
                    info!("Loaded remote tool: {}", name);
                    registry.insert(definition, ToolTarget::Remote);
                }
                Ok(None) => warn!("Tool definition not found: {}", name),
                Err(e) => error!("Failed to load tool {}: {}", name, e),
            }
        }

        info!("Tool registry ready with {} tools", registry.len());
        registry
    }

    fn insert(&mut self, definition: ToolDefinition, target: ToolTarget) {
        let name = definition.name.clone();
        if self.tools.contains_key(&name) {
            warn!("Duplicate tool definition {}; keeping the first", name);
            return;
        }
        self.order.push(name.clone());
        self.tools.insert(name, RegisteredTool { definition, target });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn target(&self, name: &str) -> Option<ToolTarget> {
        self.tools.get(name).map(|t| t.target)
    }

    /// Definitions in registration order (local tools first).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition.clone())
            .collect()
    }

    /// Definitions paired with their execution target, in registration order.
    pub fn entries(&self) -> Vec<(ToolDefinition, ToolTarget)> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| (t.definition.clone(), t.target))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map};

    struct FakeCatalog;

    #[async_trait]
    impl RemoteToolService for FakeCatalog {
        async fn get_definition(&self, name: &str) -> Result<Option<ToolDefinition>> {
            match name {
                "BRAVE_SEARCH__WEB_SEARCH" => Ok(Some(ToolDefinition::new(
                    name,
                    "Search the web",
                    json!({"type": "object", "properties": {"query": {"type": "string"}}}),
                ))),
                "fetch_website" => Ok(Some(ToolDefinition::new(name, "remote copy", json!({})))),
                "BROKEN" => Err(NarcissusError::RemoteTool("catalog unavailable".to_string())),
                _ => Ok(None),
            }
        }

        async fn execute(
            &self,
            _name: &str,
            _arguments: &Map<String, Value>,
            _linked_account_owner_id: &str,
        ) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_local_registry() {
        let registry = ToolRegistry::local();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.target("fetch_docs"), Some(ToolTarget::Local(LocalTool::FetchDocs)));
        assert_eq!(registry.target("nope"), None);
    }

    #[tokio::test]
    async fn test_build_skips_missing_and_failing_tools() {
        let configured = vec![
            "BRAVE_SEARCH__WEB_SEARCH".to_string(),
            "GITHUB__GET_REPOSITORY".to_string(),
            "BROKEN".to_string(),
        ];
        let registry = ToolRegistry::build(Some(&FakeCatalog as &dyn RemoteToolService), &configured).await;

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.target("BRAVE_SEARCH__WEB_SEARCH"), Some(ToolTarget::Remote));
        assert!(!registry.contains("GITHUB__GET_REPOSITORY"));
        assert!(!registry.contains("BROKEN"));
        assert_eq!(registry.definitions().last().unwrap().name, "BRAVE_SEARCH__WEB_SEARCH");
    }

    #[tokio::test]
    async fn test_local_tool_wins_on_collision() {
        let configured = vec!["fetch_website".to_string()];
        let registry = ToolRegistry::build(Some(&FakeCatalog as &dyn RemoteToolService), &configured).await;

        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.target("fetch_website"),
            Some(ToolTarget::Local(LocalTool::FetchWebsite))
        );
    }

    #[tokio::test]
    async fn test_build_without_catalog() {
        let registry = ToolRegistry::build(None, &["BRAVE_SEARCH__WEB_SEARCH".to_string()]).await;
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_definition_from_openai_json() {
        let value = json!({
            "type": "function",
            "function": {
                "name": "BRAVE_SEARCH__WEB_SEARCH",
                "description": "Search the web",
                "parameters": {"type": "object", "properties": {}}
            }
        });
        let definition = ToolDefinition::from_openai_json(&value).unwrap();
        assert_eq!(definition.name, "BRAVE_SEARCH__WEB_SEARCH");
        assert_eq!(definition.description, "Search the web");

        let bare = ToolDefinition::from_openai_json(&json!({"name": "X"})).unwrap();
        assert_eq!(bare.parameters["type"], "object");

        assert!(ToolDefinition::from_openai_json(&json!({"description": "no name"})).is_err());
    }
}
