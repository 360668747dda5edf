//! HTTP fetching and text extraction for the scraping tools.

use crate::config::ToolSettings;
use crate::error::Result;
use scraper::Html;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Suffix appended to truncated content.
pub const TRUNCATION_MARKER: &str = "... [content truncated]";

/// Character limit for scraped HTML pages.
pub const PAGE_CHAR_LIMIT: usize = 5_000;

/// Character limit for the raw SDK README.
pub const README_CHAR_LIMIT: usize = 8_000;

/// Truncate `text` to `limit` characters, appending the truncation marker.
///
/// Text at or under the limit is returned unchanged.
pub fn truncate_content(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Collapse whitespace the way a reader sees the page.
///
/// Every line is trimmed and split on runs of two spaces; the non-empty
/// pieces are joined with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Parse an HTML page and return its readable text.
///
/// Text nodes are joined line by line, skipping scripts and styles, then
/// whitespace is collapsed. Entities are decoded by the parser.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let pieces: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                matches!(
                    ancestor.value().as_element(),
                    Some(element) if HIDDEN_ELEMENTS.iter().any(|hidden| *hidden == element.name())
                )
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect();

    collapse_whitespace(&pieces.join("\n"))
}

/// Shared HTTP fetcher used by the scraping tools.
pub struct WebFetcher {
    client: reqwest::Client,
}

impl WebFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(settings: &ToolSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            client,
        })
    }

    /// Fetch an HTML page and return its readable text.
    ///
    /// Never fails: errors are returned as a description of the URL and error.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> String {
        info!("Fetching page: {}", url);
        match self.get_text(url).await {
            Ok(html) => {
                let text = truncate_content(&extract_text(&html), PAGE_CHAR_LIMIT);
                info!("Fetched page content ({} chars)", text.chars().count());
                format!("Content from {}:\n\n{}", url, text)
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                format!("Error fetching {}: {}", url, e)
            }
        }
    }

    /// Fetch a raw text file without markup stripping.
    #[instrument(skip(self))]
    pub async fn fetch_raw(&self, url: &str, limit: usize) -> String {
        info!("Fetching raw file: {}", url);
        match self.get_text(url).await {
            Ok(body) => {
                let text = truncate_content(&body, limit);
                info!("Fetched raw content ({} chars)", text.chars().count());
                format!("Content from {}:\n\n{}", url, text)
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                format!("Error fetching {}: {}", url, e)
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(server_url: &str) -> ToolSettings {
        ToolSettings {
            website_base_url: server_url.to_string(),
            fetch_timeout_secs: 2,
            ..ToolSettings::default()
        }
    }

    #[test]
    fn test_truncate_under_limit_is_unchanged() {
        let text = "a".repeat(PAGE_CHAR_LIMIT);
        assert_eq!(truncate_content(&text, PAGE_CHAR_LIMIT), text);
        assert_eq!(truncate_content("", PAGE_CHAR_LIMIT), "");
    }

    #[test]
    fn test_truncate_over_limit() {
        let text = "b".repeat(PAGE_CHAR_LIMIT + 1);
        let truncated = truncate_content(&text, PAGE_CHAR_LIMIT);
        assert_eq!(truncated.len(), PAGE_CHAR_LIMIT + TRUNCATION_MARKER.len());
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.starts_with(&"b".repeat(PAGE_CHAR_LIMIT)));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(10);
        let truncated = truncate_content(&text, 4);
        assert_eq!(truncated, format!("éééé{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_collapse_whitespace() {
        let text = "  Hello   world \n\n\n  Evaluate  agents\t\n";
        assert_eq!(collapse_whitespace(text), "Hello world Evaluate agents");
    }

    #[test]
    fn test_extract_text_strips_scripts_and_styles() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script type="text/javascript">var x = "<p>hidden</p>";</script></head>
            <body><!-- nav --><h1>Atla</h1><p>Evaluate &amp; monitor   agents</p></body></html>"#;

        let text = extract_text(html);
        assert_eq!(text, "Atla Evaluate & monitor agents");
    }

    #[test]
    fn test_extract_text_decodes_entities_and_keeps_stray_brackets() {
        let html = r#"<p>Atla&#8217;s evals &mdash; &copy; 2025 &#x2014; 5 &lt; 6</p><a title="a>b">link</a><p>if x < y and y > z</p>"#;

        let text = extract_text(html);
        assert_eq!(text, "Atla\u{2019}s evals \u{2014} \u{a9} 2025 \u{2014} 5 < 6 link if x < y and y > z");
    }

    #[tokio::test]
    async fn test_fetch_page_strips_and_truncates() {
        let mut server = mockito::Server::new_async().await;
        let body = format!("<html><body><p>{}</p></body></html>", "x".repeat(6_000));
        let mock = server
            .mock("GET", "/pricing")
            .match_header("user-agent", "Narcissus-AtlaAI-Agent/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        let fetcher = WebFetcher::new(&settings_for(&server.url())).unwrap();
        let url = format!("{}/pricing", server.url());
        let result = fetcher.fetch_page(&url).await;

        mock.assert_async().await;
        let expected = format!(
            "Content from {}:\n\n{}{}",
            url,
            "x".repeat(PAGE_CHAR_LIMIT),
            TRUNCATION_MARKER
        );
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_fetch_raw_keeps_markup() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/README.md")
            .with_status(200)
            .with_body("# SDK\n\n<details>install</details>")
            .create_async()
            .await;

        let fetcher = WebFetcher::new(&settings_for(&server.url())).unwrap();
        let url = format!("{}/README.md", server.url());
        let result = fetcher.fetch_raw(&url, README_CHAR_LIMIT).await;

        assert_eq!(
            result,
            format!("Content from {}:\n\n# SDK\n\n<details>install</details>", url)
        );
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_described() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = WebFetcher::new(&settings_for(&server.url())).unwrap();
        let url = format!("{}/missing", server.url());
        let result = fetcher.fetch_page(&url).await;

        assert!(result.starts_with(&format!("Error fetching {}", url)));
        assert!(result.contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = WebFetcher::new(&settings_for("http://127.0.0.1:1")).unwrap();
        let result = fetcher.fetch_page("http://127.0.0.1:1/").await;

        assert!(result.starts_with("Error fetching"));
        assert!(result.contains("http://127.0.0.1:1/"));
    }
}
