/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The `refmark check` command.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use refmark_core::PassReport;

use crate::commands::{InputKind, build_driver, input_kind};
use crate::hosts::{MarkdownHost, NotebookHost, RenderMode};

/// Resolve the document without writing output and fail when any
/// reference or citation is left unresolved.
pub fn execute(input: &Path) -> Result<()> {
    let kind = input_kind(input)?;
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let driver = build_driver(input);

    let report = match kind {
        InputKind::Markdown => {
            let mut host = MarkdownHost::new(&content, RenderMode::Plain);
            driver.process(&mut host)?
        }
        InputKind::Notebook => {
            let mut host = NotebookHost::new(&content, RenderMode::Plain)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            driver.process(&mut host)?
        }
    };

    if report.is_clean() {
        tracing::info!(
            labels = report.labels_defined,
            citations = report.citations_assigned,
            "all references resolved"
        );
        return Ok(());
    }

    bail!("{}", summarize(&report));
}

fn summarize(report: &PassReport) -> String {
    let total = report.unresolved_references.len() + report.unresolved_citations.len();
    let mut message = format!("Summary: {} undefined references found!\n", total);
    for key in &report.unresolved_references {
        message.push_str(&format!("  - Undefined reference '{}'\n", key));
    }
    for key in &report.unresolved_citations {
        message.push_str(&format!("  - Undefined citation '{}'\n", key));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document_passes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.mdx");
        fs::write(&input, "## Intro @s:intro\n\nSee #s:intro.\n").unwrap();
        assert!(execute(&input).is_ok());
    }

    #[test]
    fn test_undefined_reference_fails_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.mdx");
        fs::write(&input, "See #s:missing.\n").unwrap();
        let err = execute(&input).unwrap_err();
        assert!(err.to_string().contains("Undefined reference 's:missing'"));
    }

    #[test]
    fn test_summary_counts_both_kinds() {
        let report = PassReport {
            skipped: false,
            labels_defined: 1,
            citations_assigned: 0,
            unresolved_references: vec!["s:a".into()],
            unresolved_citations: vec!["ghost".into()],
        };
        let summary = summarize(&report);
        assert!(summary.starts_with("Summary: 2 undefined references found!"));
        assert!(summary.contains("Undefined citation 'ghost'"));
    }
}
