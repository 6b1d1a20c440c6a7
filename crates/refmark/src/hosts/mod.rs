/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Concrete document hosts for the CLI.
 */

pub mod markdown;
pub mod notebook;

pub use markdown::MarkdownHost;
pub use notebook::NotebookHost;

use once_cell::sync::Lazy;
use regex::Regex;

/// How rewritten spans are rendered back into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// HTML anchors and Markdown links embedded in the text.
    Anchored,
    /// Bare formatted labels, preserving fixed-width table alignment.
    Plain,
}

static TABLE_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|.*\S.*\|\s*$").expect("table row regex"));

/// A line that starts and ends with a pipe is a Markdown table row;
/// replacements inside it should keep their source width.
pub fn is_table_row(line: &str) -> bool {
    TABLE_ROW_RE.is_match(line)
}
