//! Response extraction command (`agentry extract`).

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use agentry::extract::{ExtractOptions, extract_document, extract_structured, extract_yaml};

/// What `extract` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// The document (or documents) found, with the configured fallback
    Document,
    /// A single object, textual fallback wrapped as `{"content": ...}`
    Wrapped,
    /// A YAML mapping only; fails when there is none
    YamlOnly,
}

pub fn cmd_extract(file: Option<&Path>, options: &ExtractOptions, mode: ExtractMode) -> Result<()> {
    let text = read_input(file)?;
    debug!(bytes = text.len(), ?mode, "extracting");

    let value = match mode {
        ExtractMode::Document => extract_document(&text, options).into_value(),
        ExtractMode::Wrapped => serde_json::Value::Object(extract_structured(&text)),
        ExtractMode::YamlOnly => match extract_yaml(&text) {
            Some(map) => serde_json::Value::Object(map),
            None => bail!("No YAML mapping found in input"),
        },
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
