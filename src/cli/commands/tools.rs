//! Tools command - list the tools bound to the model.

use crate::aci::{AciClient, RemoteToolService};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tools::{ToolRegistry, ToolTarget};
use anyhow::Result;

/// Build the tool registry the agent would use and print it.
pub async fn run_tools(settings: Settings) -> Result<()> {
    preflight::check(Operation::Inspect)?;

    let remote = if settings.aci.is_enabled() {
        Some(AciClient::from_settings(&settings.aci)?)
    } else {
        Output::warning("ACI_API_KEY not set; only local tools are available.");
        None
    };

    let registry = ToolRegistry::build(
        remote.as_ref().map(|c| c as &dyn RemoteToolService),
        &settings.aci.configured_tools,
    )
    .await;

    Output::header(&format!("Tools ({})", registry.len()));
    for (definition, target) in registry.entries() {
        let kind = match target {
            ToolTarget::Local(_) => "local",
            ToolTarget::Remote => "remote",
        };
        Output::list_item(&format!("{} [{}]", definition.name, kind));
        Output::kv("description", &definition.description);
    }

    let missing: Vec<_> = settings
        .aci
        .configured_tools
        .iter()
        .filter(|name| !registry.contains(name))
        .collect();
    if settings.aci.is_enabled() && !missing.is_empty() {
        println!();
        for name in missing {
            Output::warning(&format!("Configured tool not loaded: {}", name));
        }
    }

    Ok(())
}
