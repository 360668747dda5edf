//! Doctor command - verify configuration and API keys.

use crate::cli::Output;
use crate::config::{mask_secret, Settings, ACI_API_KEY_ENV, ACI_LINKED_ACCOUNT_ENV, OBSERVABILITY_TOKEN_ENV};
use console::style;
use url::Url;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Narcissus Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_openai_api_key(std::env::var("OPENAI_API_KEY").ok()),
        check_aci(settings),
        check_observability(settings),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

    println!();

    println!("{}", style("Tool Endpoints").bold());
    let endpoint_checks = vec![
        check_url("Website", &settings.tools.website_base_url),
        check_url("Docs", &settings.tools.docs_base_url),
        check_url("SDK README", &settings.tools.sdk_readme_url),
        check_url("Demo link", &settings.tools.demo_link),
        check_url("ACI API", &settings.aci.base_url),
    ];
    for check in &endpoint_checks {
        check.print();
    }
    checks.extend(endpoint_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Narcissus.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Narcissus is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key(key: Option<String>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_secret(&key)))
        }
        Some(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check the remote tool catalog configuration.
fn check_aci(settings: &Settings) -> CheckResult {
    if !settings.aci.is_enabled() {
        return CheckResult::warning(
            ACI_API_KEY_ENV,
            "not set (remote tools disabled)",
            &format!("Set with: export {}='...'", ACI_API_KEY_ENV),
        );
    }

    if settings.aci.linked_account_owner_id.is_empty() {
        return CheckResult::warning(
            ACI_LINKED_ACCOUNT_ENV,
            "empty (remote tools run without an owner id)",
            &format!("Set with: export {}='...'", ACI_LINKED_ACCOUNT_ENV),
        );
    }

    CheckResult::ok(
        ACI_API_KEY_ENV,
        &format!(
            "configured ({} tools, owner {})",
            settings.aci.configured_tools.len(),
            settings.aci.linked_account_owner_id
        ),
    )
}

/// Check the observability token.
fn check_observability(settings: &Settings) -> CheckResult {
    match &settings.observability.token {
        Some(token) => CheckResult::ok(
            OBSERVABILITY_TOKEN_ENV,
            &format!("configured ({})", mask_secret(token)),
        ),
        None => CheckResult::warning(
            OBSERVABILITY_TOKEN_ENV,
            "not set",
            &format!("Set with: export {}='...'", OBSERVABILITY_TOKEN_ENV),
        ),
    }
}

/// Check that a configured URL parses and uses HTTP(S).
fn check_url(name: &str, value: &str) -> CheckResult {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "https" || url.scheme() == "http" => CheckResult::ok(name, value),
        Ok(url) => CheckResult::error(
            name,
            &format!("unsupported scheme '{}'", url.scheme()),
            "Use an http:// or https:// URL",
        ),
        Err(e) => CheckResult::error(name, &format!("invalid URL: {}", e), "Fix it in the config file"),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: narcissus config edit",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_openai_api_key() {
        let valid = check_openai_api_key(Some("sk-abcdefghijklmnopqrstuvwxyz".to_string()));
        assert_eq!(valid.status, CheckStatus::Ok);
        assert!(!valid.message.contains("mnopqrst"));

        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("key".to_string())).status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_aci() {
        let mut settings = Settings::default();
        assert_eq!(check_aci(&settings).status, CheckStatus::Warning);

        settings.aci.api_key = Some("aci-key".to_string());
        let missing_owner = check_aci(&settings);
        assert_eq!(missing_owner.status, CheckStatus::Warning);
        assert_eq!(missing_owner.name, ACI_LINKED_ACCOUNT_ENV);

        settings.aci.linked_account_owner_id = "owner".to_string();
        assert_eq!(check_aci(&settings).status, CheckStatus::Ok);
    }

    #[test]
    fn test_check_url() {
        assert_eq!(check_url("Docs", "https://docs.atla-ai.com").status, CheckStatus::Ok);
        assert_eq!(check_url("Docs", "ftp://docs.atla-ai.com").status, CheckStatus::Error);
        assert_eq!(check_url("Docs", "not a url").status, CheckStatus::Error);
    }
}
