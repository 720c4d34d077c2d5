//! Command implementations for the pyfront CLI
//!
//! Each command reads its input, delegates to the library crates and
//! reports errors on stderr.

pub mod check;
pub mod desugar;
pub mod schema;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use pyfront_ast::Node;
use pyfront_ingest::{TranslationError, translate_json};

use crate::config::FrontendConfig;

/// Read the command input; `-` is stdin.
pub fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Translate the input, printing every translation error.
pub fn load_tree(input: &Path, config: &FrontendConfig) -> Result<Node> {
    let text = read_input(input)?;
    translate_json(&text).map_err(|err| {
        for line in render_errors(&err, config.output.show_lines) {
            eprintln!("{line}");
        }
        anyhow!(
            "{}: {}",
            input.display(),
            err.summary.as_deref().unwrap_or("translation failed")
        )
    })
}

/// One line per message, in the order they were found.
pub fn render_errors(err: &TranslationError, show_lines: bool) -> Vec<String> {
    err.messages
        .iter()
        .map(|m| match m.line {
            Some(line) if show_lines => format!("line {line}: {}", m.message),
            _ => m.message.clone(),
        })
        .collect()
}
