//! ACI REST client.

use super::RemoteToolService;
use crate::config::AciSettings;
use crate::error::{NarcissusError, Result};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use url::Url;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Result payload of a remote function execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionExecutionResult {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    function_input: &'a Map<String, Value>,
    linked_account_owner_id: &'a str,
}

/// Client for the ACI function catalog.
pub struct AciClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AciClient {
    /// Create a client from settings. Fails if no API key is configured.
    pub fn from_settings(settings: &AciSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(NarcissusError::RemoteCatalogDisabled)?;

        Self::new(
            &settings.base_url,
            &api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash keeps the last path segment when joining.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| NarcissusError::Config(format!("Invalid ACI base URL {}: {}", base_url, e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    fn function_url(&self, name: &str, action: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NarcissusError::Config("ACI base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["functions", name, action]);
        Ok(url)
    }
}

#[async_trait]
impl RemoteToolService for AciClient {
    #[instrument(skip(self))]
    async fn get_definition(&self, name: &str) -> Result<Option<ToolDefinition>> {
        let url = self.function_url(name, "definition")?;
        debug!("Requesting definition from {}", url);

        let response = self
            .http
            .get(url)
            .query(&[("format", "openai")])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: Value = response.error_for_status()?.json().await?;
        ToolDefinition::from_openai_json(&body).map(Some)
    }

    #[instrument(skip(self, arguments))]
    async fn execute(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
        linked_account_owner_id: &str,
    ) -> Result<String> {
        info!("Executing remote tool: {}", name);
        let args = Value::Object(arguments.clone());
        debug!("Tool args: {}", args);

        let url = self.function_url(name, "execute")?;
        let request = ExecuteRequest {
            function_input: arguments,
            linked_account_owner_id,
        };

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let result: FunctionExecutionResult = response.json().await?;

        if !result.success {
            let message = result
                .error
                .clone()
                .unwrap_or_else(|| "function execution failed".to_string());
            error!("Remote tool execution failed: {}", message);
            return Err(NarcissusError::RemoteTool(message));
        }

        info!("Remote tool execution successful");
        Ok(serde_json::to_string(&result)?)
    }
}
