/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Label and cross-reference resolution.
 */

//! Label and cross-reference resolution.
//!
//! This crate resolves lightweight cross-reference markup embedded in
//! prose: `@` defines a numbered label, `#` references one, and an
//! optional alphabetic prefix scopes the label to a named counting
//! sequence (`@fig:setup`, `#eq:pyth`). Resolution is a strict two-phase
//! process over one pass:
//!
//! ```text
//! raw text segments
//!       │ scan            (assign numbers, build the registry)
//!       ▼
//! LabelRegistry
//!       │ rewrite         (consume the registry, emit spans)
//!       ▼
//! anchors + hyperlinks
//! ```
//!
//! The registry is per-pass state: it is rebuilt from scratch on every
//! scan, so numbering is always reproducible from source text alone.
//!
//! # Example
//!
//! ```
//! use refmark_crossref::LabelRegistry;
//! use refmark_types::{Segment, spans_to_plain};
//!
//! let text = Segment::new("## Setup @s:intro\n\nSee #s:intro.");
//! let mut registry = LabelRegistry::new();
//! registry.scan_segment(&text.text);
//! let spans = registry.rewrite_segment(&text);
//! assert_eq!(spans_to_plain(&spans), "## Setup s 1\n\nSee s 1.");
//! ```

pub mod marker;
pub mod registry;

pub use marker::{Marker, Sigil, markers};
pub use registry::{LabelEntry, LabelKey, LabelRegistry, Namespace, TaggableTypes};

/// Placeholder rendered for a reference whose key was never defined.
pub const UNRESOLVED_PLACEHOLDER: &str = "??";
