//! Configuration view and validation commands (`agentry config`).

use anyhow::{Context, Result};
use std::path::Path;

use agentry::config::{AgentryToml, FALLBACK_ENV};

use super::super::ConfigCommands;

fn print_table(name: &str, table: &std::collections::BTreeMap<String, Vec<String>>) {
    println!("[{}]", name);
    for (key, values) in table {
        let values: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
        println!("  {} = [{}]", key, values.join(", "));
    }
    println!();
}

pub fn cmd_config(config_path: &Path, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Agentry Configuration");
            println!("=====================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                AgentryToml::load(config_path)?
            } else {
                println!("No agentry.toml found at {}", config_path.display());
                println!("Using the built-in catalog.");
                AgentryToml::default()
            };
            println!();

            println!("[extract]");
            println!("  fallback_to_text = {}", toml.extract.fallback_to_text);
            println!("  allow_multiple = {}", toml.extract.allow_multiple);
            println!("  preferred_keys = {:?}", toml.extract.preferred_keys);
            println!();

            match &toml.dependencies {
                Some(table) => print_table("dependencies", table),
                None => println!("[dependencies] built-in\n"),
            }
            match &toml.triggers {
                Some(table) => print_table("triggers", table),
                None => println!("[triggers] built-in\n"),
            }

            // Effective values (including env overrides)
            println!("Effective values (with env overrides):");
            let options = toml.extract_options();
            println!(
                "  fallback_to_text = {} ({})",
                options.fallback_to_text, FALLBACK_ENV
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No agentry.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = AgentryToml::load(config_path)?;
            let warnings = toml
                .validate()
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("agentry.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if let Some(parent) = config_path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                std::fs::create_dir_all(parent)?;
            }

            AgentryToml::builtin().save(config_path)?;

            println!("Created agentry.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [extract] fallback_to_text, allow_multiple, preferred_keys");
            println!("  - [dependencies] which agents each agent waits for");
            println!("  - [triggers] which agents each change category re-runs");
            println!();
        }
    }

    Ok(())
}
