//! Dashboard renderers: colored terminal output, Markdown and JSON.

pub mod markdown;
pub mod terminal;

pub use markdown::generate_markdown_report;

use anyhow::Result;
use serde::Serialize;

/// Generate a JSON report for any serializable view.
pub fn generate_json_report<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
