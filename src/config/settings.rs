//! Configuration settings for Narcissus.

use crate::error::NarcissusError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the ACI API key.
pub const ACI_API_KEY_ENV: &str = "ACI_API_KEY";
/// Environment variable holding the ACI linked account owner id.
pub const ACI_LINKED_ACCOUNT_ENV: &str = "ACI_LINKED_ACCOUNT_OWNER_ID";
/// Environment variable holding the observability token.
pub const OBSERVABILITY_TOKEN_ENV: &str = "ATLA_INSIGHTS_TOKEN";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub tools: ToolSettings,
    pub aci: AciSettings,
    pub observability: ObservabilitySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Chat completion model.
    pub model: String,
    /// Timeout for a single chat completion call, in seconds.
    pub timeout_secs: u64,
    /// Maximum reasoning steps per question before giving up.
    pub max_iterations: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
            max_iterations: 15,
        }
    }
}

/// Settings for the local scraping tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Base URL of the marketing website.
    pub website_base_url: String,
    /// Base URL of the documentation site.
    pub docs_base_url: String,
    /// Raw URL of the SDK README.
    pub sdk_readme_url: String,
    /// User-Agent header sent with every fetch.
    pub user_agent: String,
    /// Timeout for a single fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Booking URL returned by `get_demo_link`.
    pub demo_link: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            website_base_url: "https://www.atla-ai.com".to_string(),
            docs_base_url: "https://docs.atla-ai.com".to_string(),
            sdk_readme_url:
                "https://raw.githubusercontent.com/atla-ai/atla-insights-sdk/main/README.md"
                    .to_string(),
            user_agent: "Narcissus-AtlaAI-Agent/1.0".to_string(),
            fetch_timeout_secs: 10,
            demo_link: "https://www.atla-ai.com/book-a-demo".to_string(),
        }
    }
}

/// Remote tool catalog (ACI) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AciSettings {
    /// Base URL of the ACI REST API.
    pub base_url: String,
    /// API key. Usually supplied through `ACI_API_KEY`.
    pub api_key: Option<String>,
    /// Linked account owner id passed with every remote execution.
    pub linked_account_owner_id: String,
    /// Remote functions to bind, by catalog name.
    pub configured_tools: Vec<String>,
    /// Timeout for catalog lookups and remote executions, in seconds.
    pub timeout_secs: u64,
}

impl Default for AciSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.aci.dev/v1".to_string(),
            api_key: None,
            linked_account_owner_id: String::new(),
            configured_tools: vec!["BRAVE_SEARCH__WEB_SEARCH".to_string()],
            timeout_secs: 60,
        }
    }
}

impl AciSettings {
    /// Whether the remote catalog can be used.
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

/// Observability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ObservabilitySettings {
    /// Instrumentation token. Usually supplied through `ATLA_INSIGHTS_TOKEN`.
    pub token: Option<String>,
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Secrets and the linked account id are then taken from the environment.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.model.max_iterations == 0 {
            return Err(NarcissusError::Config(
                "model.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Override secrets from an environment lookup.
    ///
    /// A set-but-empty linked account id is kept as the literal empty string.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ACI_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.aci.api_key = Some(key);
        }
        if let Some(id) = lookup(ACI_LINKED_ACCOUNT_ENV) {
            self.aci.linked_account_owner_id = id;
        }
        if let Some(token) = lookup(OBSERVABILITY_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.observability.token = Some(token);
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::NarcissusError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("narcissus")
            .join("config.toml")
    }

    /// Settings as TOML with secrets masked, for display.
    pub fn to_redacted_toml(&self) -> crate::error::Result<String> {
        let mut shown = self.clone();
        shown.aci.api_key = shown.aci.api_key.as_deref().map(mask_secret);
        shown.observability.token = shown.observability.token.as_deref().map(mask_secret);
        toml::to_string_pretty(&shown)
            .map_err(|e| crate::error::NarcissusError::Config(e.to_string()))
    }
}

/// Mask all but the edges of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tools.fetch_timeout_secs, 10);
        assert_eq!(settings.tools.user_agent, "Narcissus-AtlaAI-Agent/1.0");
        assert_eq!(settings.model.max_iterations, 15);
        assert!(!settings.aci.is_enabled());
        assert_eq!(settings.aci.configured_tools, vec!["BRAVE_SEARCH__WEB_SEARCH"]);
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (ACI_API_KEY_ENV, "aci-key"),
            (ACI_LINKED_ACCOUNT_ENV, "owner-1"),
            (OBSERVABILITY_TOKEN_ENV, "tok"),
        ]);
        let mut settings = Settings::default();
        settings.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(settings.aci.api_key.as_deref(), Some("aci-key"));
        assert_eq!(settings.aci.linked_account_owner_id, "owner-1");
        assert_eq!(settings.observability.token.as_deref(), Some("tok"));
        assert!(settings.aci.is_enabled());
    }

    #[test]
    fn test_empty_env_values_do_not_fail() {
        let vars = env(&[(ACI_API_KEY_ENV, ""), (ACI_LINKED_ACCOUNT_ENV, "")]);
        let mut settings = Settings::default();
        settings.aci.linked_account_owner_id = "from-file".to_string();
        settings.apply_env_overrides(|k| vars.get(k).cloned());

        assert!(settings.aci.api_key.is_none());
        assert_eq!(settings.aci.linked_account_owner_id, "");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.model.model = "gpt-4.1".to_string();
        settings.aci.configured_tools = vec![];
        settings.save_to(&path).unwrap();

        let loaded: Settings = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.model.model, "gpt-4.1");
        assert!(loaded.aci.configured_tools.is_empty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("[model]\nmax_iterations = 3\n").unwrap();
        assert_eq!(settings.model.max_iterations, 3);
        assert_eq!(settings.model.model, "gpt-4o-mini");
        assert_eq!(settings.tools.docs_base_url, "https://docs.atla-ai.com");
    }

    #[test]
    fn test_zero_iteration_budget_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nmax_iterations = 0\n").unwrap();

        let err = Settings::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, NarcissusError::Config(_)));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("abcdefghijkl"), "abcd...ijkl");
    }
}
