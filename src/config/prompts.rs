//! Prompt templates for Narcissus.
//!
//! The agent prompt can be customized by placing an `agent.toml` file in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the support agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub system: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are Narcissus, a helpful customer support agent for {{company}}.

You help potential customers understand {{company}}'s products and services. You have
access to web search and custom tools to find current information about {{company}}'s
platform, documentation, and repositories.

When customers ask questions, look up relevant information and provide helpful,
accurate answers about {{company}}'s agent observability and evaluation platform.

Key capabilities:
- Use fetch_website to get direct content from the main website
- Use fetch_docs to read the product documentation
- Use fetch_sdk_readme to answer questions about installing and using the SDK
- Use get_demo_link when a customer wants to talk to the team or book a demo
- Use web search for broader research when needed, but note that you are heavily
  rate limited in the number of requests you can make.
- Always prioritize accurate, up-to-date information about {{company}}.

Your goal is to help potential customers understand how {{company}} can solve their
agent development and monitoring challenges."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// The agent system prompt with the configured variables substituted.
    ///
    /// `company` defaults to "Atla AI" unless overridden by a custom variable.
    pub fn system_prompt(&self) -> String {
        let mut vars = HashMap::new();
        vars.insert("company".to_string(), "Atla AI".to_string());
        for (key, value) in &self.variables {
            vars.insert(key.clone(), value.clone());
        }
        Self::render(&self.agent.system, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_system_prompt() {
        let prompt = Prompts::default().system_prompt();
        assert!(prompt.starts_with("You are Narcissus"));
        assert!(prompt.contains("Atla AI"));
        assert!(!prompt.contains("{{company}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_custom_prompt_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("agent.toml"),
            "system = \"Support bot for {{company}}.\"\n",
        )
        .unwrap();

        let mut vars = HashMap::new();
        vars.insert("company".to_string(), "Acme".to_string());

        let prompts = Prompts::load(dir.path().to_str(), Some(&vars)).unwrap();
        assert_eq!(prompts.system_prompt(), "Support bot for Acme.");
    }
}
