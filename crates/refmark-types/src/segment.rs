/*
 * segment.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

/// One raw text segment supplied by a host, in document order.
///
/// Hosts enumerate the text of every renderable region as a flat sequence
/// of segments; numbering is deterministic because the order is stable.
/// The segment must carry original source text: resolution is re-entrant
/// only when every pass scans the same unrewritten input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// The raw text to scan and rewrite.
    pub text: String,

    /// Replacement text should be right-padded to the width of the marker
    /// it replaces, so fixed-width layouts (Markdown table rows) keep
    /// their alignment.
    pub preserve_width: bool,
}

impl Segment {
    /// A segment with default rendering behavior.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preserve_width: false,
        }
    }

    /// A segment whose replacements are padded to marker width.
    pub fn fixed_width(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preserve_width: true,
        }
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Segment::new(text)
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::new(text)
    }
}
