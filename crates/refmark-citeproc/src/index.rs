//! Per-pass citation index.
//!
//! [`CitationIndex`] owns the record set and citation numbers for one
//! resolution pass. Scanning assigns numbers in strict first-occurrence
//! order in document text; rewriting replaces citation markers with
//! hyperlinks to bibliography anchors and the `@bibliography` directive
//! with the rendered entry list.

use hashlink::LinkedHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use refmark_types::{Segment, Span};

use crate::bibliography::{BibRecord, find_directive};
use crate::format::format_entry;
use crate::{ANCHOR_PREFIX, UNRESOLVED_NUMBER};

/// A `#cite:<key><bang?>` marker found in a text segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CiteMarker<'a> {
    key: &'a str,
    raw: bool,
    start: usize,
    end: usize,
}

static CITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#cite:(?P<key>[A-Za-z0-9_][A-Za-z0-9_-]*)(?P<bang>!)?").expect("cite regex")
});

/// Same boundary rule as label markers: never at the start of a line
/// (ATX headings) and never directly after an alphanumeric character.
fn boundary_ok(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None | Some('\n') => false,
        Some(prev) => !(prev.is_alphanumeric() || prev == '@' || prev == '#'),
    }
}

fn cite_markers(text: &str) -> Vec<CiteMarker<'_>> {
    CITE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0).expect("match");
            if !boundary_ok(text, whole.start()) {
                return None;
            }
            Some(CiteMarker {
                key: caps.name("key").expect("key group").as_str(),
                raw: caps.name("bang").is_some(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// All citation state for one resolution pass.
///
/// Records come from the bibliography source; numbers are assigned by
/// scanning document text. Both maps preserve insertion order, so the
/// cited set is already in citation-number order.
#[derive(Debug)]
pub struct CitationIndex {
    records: LinkedHashMap<String, BibRecord>,
    numbers: LinkedHashMap<String, u32>,
    next_number: u32,
}

impl Default for CitationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationIndex {
    /// An index with no records: every citation is unresolved.
    pub fn new() -> Self {
        Self {
            records: LinkedHashMap::new(),
            numbers: LinkedHashMap::new(),
            next_number: 1,
        }
    }

    /// An index over a parsed record set.
    pub fn with_records(records: impl IntoIterator<Item = BibRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.add_record(record);
        }
        index
    }

    /// Add one record, replacing any record with the same key.
    pub fn add_record(&mut self, record: BibRecord) {
        self.records.replace(record.key.clone(), record);
    }

    /// Look up a record by citation key.
    pub fn record(&self, key: &str) -> Option<&BibRecord> {
        self.records.get(key)
    }

    /// The citation number of a key, if it was seen during scan.
    pub fn number(&self, key: &str) -> Option<u32> {
        self.numbers.get(key).copied()
    }

    /// Number of distinct keys cited so far.
    pub fn cited_len(&self) -> usize {
        self.numbers.len()
    }

    /// Scan one segment, assigning numbers to first occurrences.
    ///
    /// Only keys with a known record receive numbers; a key without a
    /// record stays unresolved and renders a placeholder during rewrite.
    pub fn scan_segment(&mut self, text: &str) {
        for marker in cite_markers(text) {
            if !self.records.contains_key(marker.key) {
                continue;
            }
            if self.numbers.contains_key(marker.key) {
                continue;
            }
            let number = self.next_number;
            self.next_number += 1;
            tracing::trace!(key = marker.key, number, "assigned citation number");
            self.numbers.insert(marker.key.to_string(), number);
        }
    }

    /// Scan a sequence of segments in document order.
    pub fn scan<'a>(&mut self, segments: impl IntoIterator<Item = &'a Segment>) {
        for segment in segments {
            self.scan_segment(&segment.text);
        }
    }

    /// Cited records in citation-number order.
    pub fn cited(&self) -> Vec<(u32, &BibRecord)> {
        self.numbers
            .iter()
            .filter_map(|(key, &number)| self.records.get(key).map(|r| (number, r)))
            .collect()
    }

    /// Citation keys in `text` that have no record in this index.
    pub fn unresolved_citations(&self, text: &str) -> Vec<String> {
        cite_markers(text)
            .into_iter()
            .filter(|m| !self.records.contains_key(m.key))
            .map(|m| m.key.to_string())
            .collect()
    }

    /// Rewrite one segment against the scanned index.
    ///
    /// Citation markers become hyperlinks to their bibliography anchors,
    /// displaying `[n]` (bare `n` with the bang modifier). The
    /// `@bibliography` directive is replaced with the rendered entry
    /// list for cited keys.
    pub fn rewrite_segment(&self, segment: &Segment) -> Vec<Span> {
        let text = segment.text.as_str();
        let directive = find_directive(text);
        let mut markers = cite_markers(text);
        markers.retain(|m| {
            directive
                .as_ref()
                .is_none_or(|d| m.end <= d.start || m.start >= d.end)
        });

        let mut spans = Vec::new();
        let mut cursor = 0;
        let mut markers = markers.into_iter().peekable();
        loop {
            let next_marker = markers.peek().map(|m| m.start);
            let next_directive = directive
                .as_ref()
                .filter(|d| d.start >= cursor)
                .map(|d| d.start);
            let take_marker = match (next_marker, next_directive) {
                (Some(marker), Some(directive)) => marker < directive,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            if take_marker {
                let marker = markers.next().expect("peeked");
                if marker.start > cursor {
                    spans.push(Span::Text(text[cursor..marker.start].to_string()));
                }
                spans.push(self.render_marker(&marker, segment.preserve_width));
                cursor = marker.end;
            } else {
                let d = directive.as_ref().expect("directive present");
                if d.start > cursor {
                    spans.push(Span::Text(text[cursor..d.start].to_string()));
                }
                spans.extend(self.render_bibliography());
                cursor = d.end;
            }
        }
        if cursor < text.len() {
            spans.push(Span::Text(text[cursor..].to_string()));
        }
        if spans.is_empty() {
            spans.push(Span::Text(String::new()));
        }
        spans
    }

    /// Render the bibliography entry list for cited keys, in
    /// citation-number order, each entry anchored at `ref-<key>`.
    pub fn render_bibliography(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        for (i, (number, record)) in self.cited().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::Text("\n".to_string()));
            }
            spans.push(Span::Anchor {
                id: format!("{}{}", ANCHOR_PREFIX, record.key),
                label: format_entry(number, record),
            });
        }
        spans
    }

    fn render_marker(&self, marker: &CiteMarker<'_>, preserve_width: bool) -> Span {
        let number = match self.number(marker.key) {
            Some(n) => n.to_string(),
            None => {
                tracing::debug!(key = marker.key, "unresolved citation");
                UNRESOLVED_NUMBER.to_string()
            }
        };
        let label = if marker.raw {
            number
        } else {
            format!("[{}]", number)
        };
        let label = pad(&label, marker.end - marker.start, preserve_width);
        if self.records.contains_key(marker.key) {
            Span::Link {
                target: format!("{}{}", ANCHOR_PREFIX, marker.key),
                label,
            }
        } else {
            Span::Text(label)
        }
    }
}

fn pad(label: &str, width: usize, preserve_width: bool) -> String {
    if preserve_width && label.len() < width {
        format!("{:<width$}", label, width = width)
    } else {
        label.to_string()
    }
}
