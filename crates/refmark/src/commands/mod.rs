//! Command implementations for the refmark CLI
//!
//! Each command module handles the CLI interface and delegates to
//! refmark-core for actual resolution.

pub mod check;
pub mod process;

use std::path::Path;

use anyhow::{Result, bail};
use refmark_core::Driver;

use crate::bibsource::FileBibliographySource;

/// Input formats the CLI understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Flat Markdown with reference markup (`.mdx`).
    Markdown,
    /// Jupyter (`.ipynb`) or Databricks (`.source`) notebook.
    Notebook,
}

pub fn input_kind(path: &Path) -> Result<InputKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "mdx" => Ok(InputKind::Markdown),
        "ipynb" | "source" => Ok(InputKind::Notebook),
        _ => bail!(
            "Unsupported input format '{}'. Use .mdx, .ipynb, or .source.",
            path.display()
        ),
    }
}

/// A driver wired up for `input`: bibliography URLs resolve relative to
/// the document's directory.
pub fn build_driver(input: &Path) -> Driver {
    let base = input.parent().unwrap_or_else(|| Path::new("."));
    Driver::new().with_bibliography_source(Box::new(FileBibliographySource::new(base)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_by_extension() {
        assert_eq!(input_kind(Path::new("a.mdx")).unwrap(), InputKind::Markdown);
        assert_eq!(input_kind(Path::new("a.MDX")).unwrap(), InputKind::Markdown);
        assert_eq!(
            input_kind(Path::new("nb.ipynb")).unwrap(),
            InputKind::Notebook
        );
        assert_eq!(
            input_kind(Path::new("nb.source")).unwrap(),
            InputKind::Notebook
        );
        assert!(input_kind(Path::new("a.txt")).is_err());
        assert!(input_kind(Path::new("noext")).is_err());
    }
}
