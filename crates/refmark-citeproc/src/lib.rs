//! Citation processing and bibliography rendering.
//!
//! This crate resolves inline citation markers (`#cite:key`) against a
//! minimal bibliography record format:
//!
//! ```text
//! bibliography source blob
//!       │ parse            (best-effort, never fails)
//!       ▼
//! BibRecord set
//!       │ scan             (assign citation numbers in first-use order)
//!       ▼
//! CitationIndex
//!       │ rewrite          (markers → links, directive → entry list)
//!       ▼
//! [n] hyperlinks + formatted bibliography
//! ```
//!
//! Citation numbers come from a single shared counter, assigned in strict
//! first-occurrence order in document text, independent of
//! bibliography-source order. The index is per-pass state, rebuilt on
//! every scan.
//!
//! # Example
//!
//! ```
//! use refmark_citeproc::{CitationIndex, parse_bibliography};
//! use refmark_types::{Segment, spans_to_plain};
//!
//! let records = parse_bibliography(
//!     "@book{knuth1968,\n  author = {Donald Knuth},\n  year = {1968},\n}",
//! );
//! let mut index = CitationIndex::with_records(records);
//! let segment = Segment::new("see #cite:knuth1968");
//! index.scan_segment(&segment.text);
//! assert_eq!(spans_to_plain(&index.rewrite_segment(&segment)), "see [1]");
//! ```

pub mod bibliography;
pub mod format;
pub mod index;

pub use bibliography::{BibDirective, BibRecord, find_directive, parse_bibliography};
pub use format::format_entry;
pub use index::CitationIndex;

/// Placeholder number rendered for a citation whose key has no record.
pub const UNRESOLVED_NUMBER: &str = "?";

/// Anchor id prefix for bibliography entries.
pub const ANCHOR_PREFIX: &str = "ref-";
