//! Pre-flight checks before talking to the model.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{NarcissusError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering questions requires the OpenAI API key.
    Ask,
    /// Inspecting the tool registry has no hard requirements.
    Inspect,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask => check_api_key(std::env::var("OPENAI_API_KEY").ok()),
        Operation::Inspect => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key(key: Option<String>) -> Result<()> {
    match key {
        Some(key) if !key.is_empty() => Ok(()),
        Some(_) => Err(NarcissusError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(NarcissusError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_inspect_no_requirements() {
        assert!(check(Operation::Inspect).is_ok());
    }

    #[test]
    fn test_check_api_key() {
        assert!(check_api_key(Some("sk-test".to_string())).is_ok());
        assert!(check_api_key(Some(String::new())).is_err());
        assert!(check_api_key(None).is_err());
    }
}
