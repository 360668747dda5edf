//! Config command: show, edit and locate the settings file.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, path: Option<&str>) -> Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            Output::kv("file", &describe_path(&config_path));
            println!();
            println!("{}", settings.to_redacted_toml()?);
        }

        ConfigAction::Edit => {
            if write_default_if_missing(&config_path)? {
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = editor_command(|key| std::env::var(key).ok());
            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status()
                .with_context(|| format!("Failed to launch editor '{}'", editor))?;

            if !status.success() {
                Output::warning("Editor exited with non-zero status.");
            }

            // Secrets come from the environment, so only the file is checked here.
            match Settings::load_from(Some(&config_path)) {
                Ok(_) => Output::success("Config is valid."),
                Err(e) => Output::error(&format!("Config has problems: {}", e)),
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Pick the editor: `VISUAL`, then `EDITOR`, then `vi`.
fn editor_command<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Write the default settings to `path` unless a file is already there.
fn write_default_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Settings::default().save_to(&path.to_path_buf())?;
    Ok(true)
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not created, using defaults)", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_editor_prefers_visual() {
        let vars: HashMap<&str, &str> = [("VISUAL", "code -w"), ("EDITOR", "nano")].into();
        assert_eq!(editor_command(|k| vars.get(k).map(|v| v.to_string())), "code -w");

        let vars: HashMap<&str, &str> = [("VISUAL", " "), ("EDITOR", "nano")].into();
        assert_eq!(editor_command(|k| vars.get(k).map(|v| v.to_string())), "nano");

        assert_eq!(editor_command(|_| None), "vi");
    }

    #[test]
    fn test_default_config_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narcissus").join("config.toml");

        assert!(write_default_if_missing(&path).unwrap());
        assert!(describe_path(&path).ends_with("config.toml"));

        std::fs::write(&path, "[model]\nmax_iterations = 4\n").unwrap();
        assert!(!write_default_if_missing(&path).unwrap());

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.model.max_iterations, 4);
    }

    #[test]
    fn test_missing_file_is_described() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(describe_path(&path).contains("using defaults"));
    }
}
