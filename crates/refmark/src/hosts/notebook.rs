/*
 * notebook.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Host adapter for Jupyter (.ipynb) and Databricks (.source) notebooks.
 */

use anyhow::{Context, Result};
use refmark_core::{Capabilities, DocumentHost};
use refmark_types::{Segment, Span, spans_to_markdown, spans_to_plain};
use serde_json::Value;

use super::{RenderMode, is_table_row};

/// How a Markdown cell encodes its `source` field.
///
/// Jupyter stores a list of strings, each line keeping its trailing
/// newline except the last; Databricks stores a single string with
/// embedded newlines. Both are preserved on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Lines,
    Joined,
}

struct MarkdownCell {
    cell_index: usize,
    kind: SourceKind,
    lines: Vec<String>,
    rendered: Vec<Option<String>>,
}

/// A notebook document: segments are the lines of every Markdown cell in
/// document order; code cells pass through untouched.
pub struct NotebookHost {
    notebook: Value,
    cells: Vec<MarkdownCell>,
    /// Flat segment index → (cell, line).
    index: Vec<(usize, usize)>,
    mode: RenderMode,
}

impl NotebookHost {
    pub fn new(content: &str, mode: RenderMode) -> Result<Self> {
        let notebook: Value =
            serde_json::from_str(content).context("notebook is not valid JSON")?;

        let mut cells = Vec::new();
        if let Some(raw_cells) = notebook.get("cells").and_then(Value::as_array) {
            for (cell_index, cell) in raw_cells.iter().enumerate() {
                if cell.get("cell_type").and_then(Value::as_str) != Some("markdown") {
                    continue;
                }
                let Some((kind, lines)) = extract_lines(cell.get("source")) else {
                    continue;
                };
                let rendered = lines.iter().map(|_| None).collect();
                cells.push(MarkdownCell {
                    cell_index,
                    kind,
                    lines,
                    rendered,
                });
            }
        }

        let mut index = Vec::new();
        for (cell_pos, cell) in cells.iter().enumerate() {
            for line_pos in 0..cell.lines.len() {
                index.push((cell_pos, line_pos));
            }
        }

        Ok(Self {
            notebook,
            cells,
            index,
            mode,
        })
    }

    /// The processed notebook as JSON text.
    pub fn into_output(mut self) -> Result<String> {
        let raw_cells = self
            .notebook
            .get_mut("cells")
            .and_then(Value::as_array_mut)
            .context("notebook has no cells array")?;

        for cell in &self.cells {
            let lines: Vec<&str> = cell
                .lines
                .iter()
                .zip(&cell.rendered)
                .map(|(line, rendered)| rendered.as_deref().unwrap_or(line))
                .collect();
            raw_cells[cell.cell_index]["source"] = assemble_source(cell.kind, &lines);
        }

        Ok(serde_json::to_string_pretty(&self.notebook)?)
    }
}

/// Split a cell `source` value into lines, remembering its encoding.
fn extract_lines(source: Option<&Value>) -> Option<(SourceKind, Vec<String>)> {
    match source? {
        Value::Array(entries) => {
            let lines = entries
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.strip_suffix('\n').unwrap_or(s).to_string())
                })
                .collect::<Option<Vec<_>>>()?;
            Some((SourceKind::Lines, lines))
        }
        Value::String(joined) => Some((
            SourceKind::Joined,
            joined.split('\n').map(str::to_string).collect(),
        )),
        _ => None,
    }
}

/// Reassemble lines into a cell `source` value of the given encoding.
fn assemble_source(kind: SourceKind, lines: &[&str]) -> Value {
    match kind {
        SourceKind::Lines => {
            let count = lines.len();
            Value::Array(
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        if i + 1 < count {
                            Value::String(format!("{}\n", line))
                        } else {
                            Value::String((*line).to_string())
                        }
                    })
                    .collect(),
            )
        }
        SourceKind::Joined => Value::String(lines.join("\n")),
    }
}

impl DocumentHost for NotebookHost {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            enumerate_regions: true,
            render_events: false,
            typeset: false,
        }
    }

    fn segments(&self) -> Vec<Segment> {
        self.index
            .iter()
            .map(|&(cell_pos, line_pos)| {
                let line = &self.cells[cell_pos].lines[line_pos];
                Segment {
                    text: line.clone(),
                    preserve_width: self.mode == RenderMode::Plain && is_table_row(line),
                }
            })
            .collect()
    }

    fn splice(&mut self, index: usize, spans: Vec<Span>) {
        let (cell_pos, line_pos) = self.index[index];
        let rendered = match self.mode {
            RenderMode::Anchored => spans_to_markdown(&spans),
            RenderMode::Plain => spans_to_plain(&spans),
        };
        self.cells[cell_pos].rendered[line_pos] = Some(rendered);
    }
}
