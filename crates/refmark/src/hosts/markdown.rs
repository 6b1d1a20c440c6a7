/*
 * markdown.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Host adapter for flat Markdown (.mdx) files.
 */

use refmark_core::{Capabilities, DocumentHost};
use refmark_types::{Segment, Span, spans_to_markdown, spans_to_plain};

use super::{RenderMode, is_table_row};

/// A flat Markdown file, one segment per line.
///
/// The host keeps the original lines untouched and accumulates rewrites
/// separately, so every pass scans original source text.
pub struct MarkdownHost {
    lines: Vec<String>,
    rendered: Vec<Option<Vec<Span>>>,
    mode: RenderMode,
}

impl MarkdownHost {
    pub fn new(source: &str, mode: RenderMode) -> Self {
        let lines: Vec<String> = source.split('\n').map(str::to_string).collect();
        let rendered = lines.iter().map(|_| None).collect();
        Self {
            lines,
            rendered,
            mode,
        }
    }

    /// The processed document.
    pub fn to_output(&self) -> String {
        self.lines
            .iter()
            .zip(&self.rendered)
            .map(|(line, spans)| match spans {
                Some(spans) => match self.mode {
                    RenderMode::Anchored => spans_to_markdown(spans),
                    RenderMode::Plain => spans_to_plain(spans),
                },
                None => line.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DocumentHost for MarkdownHost {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            enumerate_regions: true,
            render_events: false,
            typeset: false,
        }
    }

    fn segments(&self) -> Vec<Segment> {
        self.lines
            .iter()
            .map(|line| Segment {
                text: line.clone(),
                preserve_width: self.mode == RenderMode::Plain && is_table_row(line),
            })
            .collect()
    }

    fn splice(&mut self, index: usize, spans: Vec<Span>) {
        self.rendered[index] = Some(spans);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refmark_core::Driver;

    fn process(source: &str, mode: RenderMode) -> String {
        let mut host = MarkdownHost::new(source, mode);
        Driver::new().process(&mut host).unwrap();
        host.to_output()
    }

    #[test]
    fn test_plain_mode_matches_preprocessor_output() {
        let source = "## Section @s:intro\n\nRefer to #s:intro for details.";
        assert_eq!(
            process(source, RenderMode::Plain),
            "## Section s 1\n\nRefer to s 1 for details."
        );
    }

    #[test]
    fn test_anchored_mode_emits_links() {
        let source = "## Section @s:intro\n\nRefer to #s:intro.";
        assert_eq!(
            process(source, RenderMode::Anchored),
            "## Section <a id=\"intro\">s 1</a>\n\nRefer to [s 1](#intro)."
        );
    }

    #[test]
    fn test_table_alignment_is_preserved_in_plain_mode() {
        let source = "| @fig:one | alpha |\n| #fig:one | beta  |";
        assert_eq!(
            process(source, RenderMode::Plain),
            "| fig 1    | alpha |\n| fig 1    | beta  |"
        );
    }

    #[test]
    fn test_trailing_newline_round_trips() {
        let source = "nothing to resolve\n";
        assert_eq!(process(source, RenderMode::Plain), source);
    }
}
