//! Configuration module for Narcissus.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts};
pub use settings::{
    mask_secret, AciSettings, GeneralSettings, ModelSettings, ObservabilitySettings,
    PromptSettings, Settings, ToolSettings, ACI_API_KEY_ENV, ACI_LINKED_ACCOUNT_ENV,
    OBSERVABILITY_TOKEN_ENV,
};
