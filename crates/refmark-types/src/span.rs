/*
 * span.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

/// One piece of rewritten output.
///
/// A rewrite pass maps each input segment to a sequence of spans. Plain
/// text passes through as [`Span::Text`]; resolved definition markers
/// become [`Span::Anchor`]s and resolved reference markers become
/// [`Span::Link`]s. The host decides how spans are spliced back into its
/// document representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Span {
    /// Unmodified text.
    Text(String),

    /// An anchor point with a visible label, e.g. a resolved label
    /// definition or a bibliography entry.
    Anchor { id: String, label: String },

    /// A hyperlink to an anchor in the same document.
    Link { target: String, label: String },
}

impl Span {
    /// Plain text content of this span, ignoring any decoration.
    pub fn text(&self) -> &str {
        match self {
            Span::Text(s) => s,
            Span::Anchor { label, .. } => label,
            Span::Link { label, .. } => label,
        }
    }

    /// Render this span as Markdown with embedded HTML anchors.
    pub fn to_markdown(&self) -> String {
        match self {
            Span::Text(s) => s.clone(),
            Span::Anchor { id, label } => format!("<a id=\"{}\">{}</a>", id, label),
            Span::Link { target, label } => format!("[{}](#{})", label, target),
        }
    }
}

/// Render spans as Markdown with embedded HTML anchors.
pub fn spans_to_markdown(spans: &[Span]) -> String {
    spans.iter().map(Span::to_markdown).collect()
}

/// Render spans as plain text, dropping all decoration.
pub fn spans_to_plain(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text().to_string()).collect()
}

/// Map a rewrite function over the plain-text spans of an earlier rewrite,
/// leaving decorated spans untouched.
///
/// This is how independent resolvers compose: the second resolver only
/// ever sees text the first one left alone.
pub fn rewrite_text_spans<F>(spans: Vec<Span>, mut rewrite: F) -> Vec<Span>
where
    F: FnMut(&str) -> Vec<Span>,
{
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::Text(text) => out.extend(rewrite(&text)),
            other => out.push(other),
        }
    }
    out
}
