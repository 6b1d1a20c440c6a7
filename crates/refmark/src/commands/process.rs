/*
 * process.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The `refmark process` command.
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::commands::{InputKind, build_driver, input_kind};
use crate::hosts::{MarkdownHost, NotebookHost, RenderMode};

pub fn execute(input: &Path, output: Option<&Path>, plain: bool) -> Result<()> {
    let kind = input_kind(input)?;
    let mode = if plain {
        RenderMode::Plain
    } else {
        RenderMode::Anchored
    };
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let driver = build_driver(input);

    let (out_path, rendered) = match kind {
        InputKind::Markdown => {
            let mut host = MarkdownHost::new(&content, mode);
            let report = driver.process(&mut host)?;
            tracing::info!(
                labels = report.labels_defined,
                citations = report.citations_assigned,
                "resolved document"
            );
            let out_path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input.with_extension("md"));
            (out_path, host.to_output())
        }
        InputKind::Notebook => {
            let mut host = NotebookHost::new(&content, mode)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            let report = driver.process(&mut host)?;
            tracing::info!(
                labels = report.labels_defined,
                citations = report.citations_assigned,
                "resolved notebook"
            );
            let out_path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| default_notebook_output(input));
            (out_path, host.into_output()?)
        }
    };

    fs::write(&out_path, rendered)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    tracing::info!(output = %out_path.display(), "processed file saved");
    Ok(())
}

/// `notebook.ipynb` → `notebook_processed.ipynb`, keeping the extension
/// so the result stays openable by the same front-end.
fn default_notebook_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("notebook");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("ipynb");
    input.with_file_name(format!("{}_processed.{}", stem, ext))
}
