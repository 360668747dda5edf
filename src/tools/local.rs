//! Locally implemented tools.

use super::fetch::{WebFetcher, README_CHAR_LIMIT};
use super::ToolDefinition;
use crate::config::ToolSettings;
use crate::error::{NarcissusError, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// The tools implemented in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalTool {
    /// Scrape a page of the marketing website.
    FetchWebsite,
    /// Scrape a page of the documentation site.
    FetchDocs,
    /// Fetch the raw SDK README.
    FetchSdkReadme,
    /// Return the demo booking link.
    GetDemoLink,
}

impl LocalTool {
    pub const ALL: [LocalTool; 4] = [
        LocalTool::FetchWebsite,
        LocalTool::FetchDocs,
        LocalTool::FetchSdkReadme,
        LocalTool::GetDemoLink,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LocalTool::FetchWebsite => "fetch_website",
            LocalTool::FetchDocs => "fetch_docs",
            LocalTool::FetchSdkReadme => "fetch_sdk_readme",
            LocalTool::GetDemoLink => "get_demo_link",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Function definition exposed to the model.
    pub fn definition(&self) -> ToolDefinition {
        match self {
            LocalTool::FetchWebsite => ToolDefinition::new(
                self.name(),
                "Fetch content from the main Atla AI website (atla-ai.com). \
                Use this to get current information about the platform, products, \
                pricing and company without using rate-limited search.",
                path_schema("Optional path to a specific page (e.g., '/about', '/pricing')"),
            ),
            LocalTool::FetchDocs => ToolDefinition::new(
                self.name(),
                "Fetch content from the Atla AI documentation site (docs.atla-ai.com). \
                Use this for setup guides, integrations and API details.",
                path_schema("Optional path to a specific docs page (e.g., '/quickstart')"),
            ),
            LocalTool::FetchSdkReadme => ToolDefinition::new(
                self.name(),
                "Fetch the README of the Atla Insights SDK on GitHub. \
                Use this for installation instructions and code examples.",
                json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
            LocalTool::GetDemoLink => ToolDefinition::new(
                self.name(),
                "Get the link for booking a demo with the Atla AI team. \
                Use this when a customer wants to talk to someone or see the product live.",
                json!({
                    "type": "object",
                    "properties": {}
                }),
            ),
        }
    }
}

fn path_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": description,
                "default": "/"
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct PathArgs {
    #[serde(default = "default_path")]
    path: String,
}

fn default_path() -> String {
    "/".to_string()
}

/// Executes local tools against the configured endpoints.
pub struct LocalTools {
    fetcher: WebFetcher,
    settings: ToolSettings,
}

impl LocalTools {
    pub fn new(settings: &ToolSettings) -> Result<Self> {
        Ok(Self {
            fetcher: WebFetcher::new(settings)?,
            settings: settings.clone(),
        })
    }

    /// Invoke a local tool with the model-supplied arguments.
    ///
    /// Fetch failures are reported in the returned text; only malformed
    /// arguments produce an error.
    pub async fn invoke(&self, tool: LocalTool, arguments: &Map<String, Value>) -> Result<String> {
        match tool {
            LocalTool::FetchWebsite => {
                let args = parse_path_args(arguments)?;
                Ok(self.fetch_website(&args.path).await)
            }
            LocalTool::FetchDocs => {
                let args = parse_path_args(arguments)?;
                Ok(self.fetch_docs(&args.path).await)
            }
            LocalTool::FetchSdkReadme => Ok(self.fetch_sdk_readme().await),
            LocalTool::GetDemoLink => Ok(self.get_demo_link()),
        }
    }

    pub async fn fetch_website(&self, path: &str) -> String {
        let url = join_url(&self.settings.website_base_url, path);
        self.fetcher.fetch_page(&url).await
    }

    pub async fn fetch_docs(&self, path: &str) -> String {
        let url = join_url(&self.settings.docs_base_url, path);
        self.fetcher.fetch_page(&url).await
    }

    pub async fn fetch_sdk_readme(&self) -> String {
        self.fetcher
            .fetch_raw(&self.settings.sdk_readme_url, README_CHAR_LIMIT)
            .await
    }

    pub fn get_demo_link(&self) -> String {
        format!(
            "You can book a demo with the Atla AI team here: {}",
            self.settings.demo_link
        )
    }
}

fn parse_path_args(arguments: &Map<String, Value>) -> Result<PathArgs> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| NarcissusError::ToolArguments(e.to_string()))
}

/// Append a path to a base URL, inserting a slash when the path lacks one.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        format!("{}/", base)
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::TRUNCATION_MARKER;

    fn tools() -> LocalTools {
        LocalTools::new(&ToolSettings::default()).unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for tool in LocalTool::ALL {
            assert_eq!(LocalTool::from_name(tool.name()), Some(tool));
            assert_eq!(tool.definition().name, tool.name());
        }
        assert_eq!(LocalTool::from_name("BRAVE_SEARCH__WEB_SEARCH"), None);
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://www.atla-ai.com", "/"), "https://www.atla-ai.com/");
        assert_eq!(join_url("https://www.atla-ai.com/", "/about"), "https://www.atla-ai.com/about");
        assert_eq!(join_url("https://docs.atla-ai.com", "quickstart"), "https://docs.atla-ai.com/quickstart");
        assert_eq!(join_url("https://docs.atla-ai.com", ""), "https://docs.atla-ai.com/");
    }

    #[test]
    fn test_demo_link_is_deterministic() {
        let tools = tools();
        let first = tools.get_demo_link();
        assert_eq!(first, tools.get_demo_link());
        assert!(first.contains("https://www.atla-ai.com/book-a-demo"));
    }

    #[tokio::test]
    async fn test_invoke_demo_link_ignores_arguments() {
        let mut args = Map::new();
        args.insert("unused".to_string(), json!(true));
        let result = tools().invoke(LocalTool::GetDemoLink, &args).await.unwrap();
        assert!(result.contains("book-a-demo"));
    }

    #[tokio::test]
    async fn test_invalid_path_argument() {
        let mut args = Map::new();
        args.insert("path".to_string(), json!(42));
        let result = tools().invoke(LocalTool::FetchWebsite, &args).await;
        assert!(matches!(result, Err(NarcissusError::ToolArguments(_))));
    }

    #[tokio::test]
    async fn test_fetch_docs_defaults_to_root() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<h1>Docs</h1>")
            .create_async()
            .await;

        let settings = ToolSettings {
            docs_base_url: server.url(),
            ..ToolSettings::default()
        };
        let tools = LocalTools::new(&settings).unwrap();
        let result = tools.invoke(LocalTool::FetchDocs, &Map::new()).await.unwrap();

        mock.assert_async().await;
        assert!(result.ends_with("\n\nDocs"));
    }

    async fn readme_with_body(body: String) -> (String, String) {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/README.md")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let url = format!("{}/README.md", server.url());
        let settings = ToolSettings {
            sdk_readme_url: url.clone(),
            ..ToolSettings::default()
        };
        let result = LocalTools::new(&settings).unwrap().fetch_sdk_readme().await;
        (url, result)
    }

    #[tokio::test]
    async fn test_sdk_readme_truncates_at_limit() {
        let (url, result) = readme_with_body("r".repeat(9_000)).await;

        let body = result
            .strip_prefix(&format!("Content from {}:\n\n", url))
            .unwrap();
        assert_eq!(body, format!("{}{}", "r".repeat(README_CHAR_LIMIT), TRUNCATION_MARKER));
        assert_eq!(body.chars().count(), 8_000 + TRUNCATION_MARKER.len());
    }

    #[tokio::test]
    async fn test_sdk_readme_at_limit_is_untouched() {
        let (url, result) = readme_with_body("r".repeat(8_000)).await;

        assert_eq!(result, format!("Content from {}:\n\n{}", url, "r".repeat(8_000)));
        assert!(!result.ends_with(TRUNCATION_MARKER));
    }
}
