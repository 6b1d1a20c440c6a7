/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-pass label registry and namespace counters.
 */

//! Per-pass label registry and namespace counters.
//!
//! [`LabelRegistry`] owns all resolution state for one pass: the label
//! entries in definition order and one monotonically increasing counter
//! per namespace. Scanning assigns numbers; rewriting is a pure lookup.

use std::collections::{HashMap, HashSet};

use hashlink::LinkedHashMap;
use refmark_types::{Segment, Span};

use crate::UNRESOLVED_PLACEHOLDER;
use crate::marker::{Marker, Sigil, markers};

/// An independent counting sequence for labels.
///
/// The global namespace is just another counter, keyed by the sentinel
/// variant rather than a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Global,
    Named(String),
}

impl Namespace {
    fn from_marker(prefix: Option<&str>) -> Self {
        match prefix {
            Some(name) => Namespace::Named(name.to_string()),
            None => Namespace::Global,
        }
    }

    /// The namespace name, or `None` for the global namespace.
    pub fn name(&self) -> Option<&str> {
        match self {
            Namespace::Global => None,
            Namespace::Named(name) => Some(name),
        }
    }
}

/// The identity of a label: its namespace plus its local id.
///
/// The namespace is normalized to lowercase, so a reference-side casing
/// hint (`#EQ:pyth` for `@eq:pyth`) still names the same label; the
/// entry's recorded namespace keeps the casing of the first definition
/// and is what formatting uses. Local ids stay case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelKey {
    pub namespace: Namespace,
    pub id: String,
}

impl LabelKey {
    pub fn new(namespace: Namespace, id: impl Into<String>) -> Self {
        let namespace = match namespace {
            Namespace::Global => Namespace::Global,
            Namespace::Named(name) => Namespace::Named(name.to_ascii_lowercase()),
        };
        Self {
            namespace,
            id: id.into(),
        }
    }

    fn from_marker(marker: &Marker<'_>) -> Self {
        Self::new(Namespace::from_marker(marker.namespace), marker.id)
    }
}

impl std::fmt::Display for LabelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.namespace.name() {
            Some(ns) => write!(f, "{}:{}", ns, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A resolved label: its key, its assigned number, and whether its
/// namespace renders in tag form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub namespace: Namespace,
    pub id: String,
    pub number: u32,
    pub taggable: bool,
}

impl LabelEntry {
    /// Format this label for display.
    ///
    /// Taggable namespaces render `(number)`, other named namespaces
    /// render `namespace number`, the global namespace renders the bare
    /// number. The raw flag always yields the bare number.
    pub fn format(&self, raw: bool) -> String {
        if raw {
            return self.number.to_string();
        }
        if self.taggable {
            return format!("({})", self.number);
        }
        match &self.namespace {
            Namespace::Global => self.number.to_string(),
            Namespace::Named(ns) => format!("{} {}", ns, self.number),
        }
    }
}

/// Namespaces whose numbers render parenthesized, mirroring mathematical
/// equation-tag conventions. Membership is case-insensitive.
#[derive(Debug, Clone)]
pub struct TaggableTypes(HashSet<String>);

impl TaggableTypes {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains(&namespace.to_ascii_lowercase())
    }
}

impl Default for TaggableTypes {
    fn default() -> Self {
        Self::new(["eq", "eqn", "equation"])
    }
}

/// All label state for one resolution pass.
///
/// The registry is rebuilt from scratch every pass; nothing persists
/// across passes, so renumbering is deterministic from source text alone.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    taggable: TaggableTypes,
    entries: LinkedHashMap<LabelKey, LabelEntry>,
    counters: HashMap<Namespace, u32>,
}

impl LabelRegistry {
    /// An empty registry with the default taggable type set.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with a caller-supplied taggable type set.
    pub fn with_taggable_types(taggable: TaggableTypes) -> Self {
        Self {
            taggable,
            entries: LinkedHashMap::new(),
            counters: HashMap::new(),
        }
    }

    /// Number of labels defined so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a label entry by key.
    pub fn get(&self, key: &LabelKey) -> Option<&LabelEntry> {
        self.entries.get(key)
    }

    /// Scan one segment, assigning numbers to new definition markers.
    ///
    /// The first definition of a key wins; later definitions of the same
    /// key are no-ops that reuse the existing number. References are not
    /// recorded; they resolve by lookup during rewrite.
    pub fn scan_segment(&mut self, text: &str) {
        for marker in markers(text) {
            if marker.sigil != Sigil::Definition {
                continue;
            }
            let key = LabelKey::from_marker(&marker);
            if self.entries.contains_key(&key) {
                continue;
            }
            let counter = self.counters.entry(key.namespace.clone()).or_insert(0);
            *counter += 1;
            let number = *counter;
            tracing::trace!(key = %key, number, "assigned label number");
            // the entry records the namespace as written at definition;
            // the key carries the normalized form
            let namespace = Namespace::from_marker(marker.namespace);
            let taggable = namespace
                .name()
                .is_some_and(|ns| self.taggable.contains(ns));
            self.entries.insert(
                key.clone(),
                LabelEntry {
                    namespace,
                    id: key.id,
                    number,
                    taggable,
                },
            );
        }
    }

    /// Scan a sequence of segments in document order.
    pub fn scan<'a>(&mut self, segments: impl IntoIterator<Item = &'a Segment>) {
        for segment in segments {
            self.scan_segment(&segment.text);
        }
    }

    /// Rewrite one segment against the scanned registry.
    ///
    /// Definition markers become anchors tagged by the local id;
    /// reference markers become hyperlinks to those anchors. Both display
    /// the formatted label of the *referenced* entry; a reference-side
    /// namespace hint never overrides the recorded one. References to
    /// keys never defined render the `??` placeholder.
    pub fn rewrite_segment(&self, segment: &Segment) -> Vec<Span> {
        let text = segment.text.as_str();
        let mut spans = Vec::new();
        let mut cursor = 0;
        for marker in markers(text) {
            if marker.start > cursor {
                spans.push(Span::Text(text[cursor..marker.start].to_string()));
            }
            spans.push(self.render_marker(&marker, segment.preserve_width));
            cursor = marker.end;
        }
        if cursor < text.len() {
            spans.push(Span::Text(text[cursor..].to_string()));
        }
        if spans.is_empty() {
            spans.push(Span::Text(String::new()));
        }
        spans
    }

    /// Reference keys in `text` that no definition in this pass resolves.
    pub fn unresolved_references(&self, text: &str) -> Vec<LabelKey> {
        markers(text)
            .into_iter()
            .filter(|m| m.sigil == Sigil::Reference)
            .map(|m| LabelKey::from_marker(&m))
            .filter(|key| !self.entries.contains_key(key))
            .collect()
    }

    fn render_marker(&self, marker: &Marker<'_>, preserve_width: bool) -> Span {
        let key = LabelKey::from_marker(marker);
        let Some(entry) = self.entries.get(&key) else {
            tracing::debug!(key = %key, "unresolved reference");
            return Span::Text(pad(UNRESOLVED_PLACEHOLDER, marker.width(), preserve_width));
        };
        let label = pad(&entry.format(marker.raw), marker.width(), preserve_width);
        match marker.sigil {
            Sigil::Definition => Span::Anchor {
                id: entry.id.clone(),
                label,
            },
            Sigil::Reference => Span::Link {
                target: entry.id.clone(),
                label,
            },
        }
    }
}

/// Right-pad a replacement to the width of the marker it replaces, so
/// fixed-width layouts such as Markdown table rows keep their alignment.
fn pad(label: &str, width: usize, preserve_width: bool) -> String {
    if preserve_width && label.len() < width {
        format!("{:<width$}", label, width = width)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(registry: &mut LabelRegistry, text: &str) {
        registry.scan_segment(text);
    }

    #[test]
    fn test_namespace_counters_are_independent() {
        let mut registry = LabelRegistry::new();
        scan_all(&mut registry, "a @fig:a b @tbl:b c @fig:c");
        let fig_a = registry
            .get(&LabelKey::new(Namespace::Named("fig".into()), "a"))
            .unwrap();
        let tbl_b = registry
            .get(&LabelKey::new(Namespace::Named("tbl".into()), "b"))
            .unwrap();
        let fig_c = registry
            .get(&LabelKey::new(Namespace::Named("fig".into()), "c"))
            .unwrap();
        assert_eq!(fig_a.number, 1);
        assert_eq!(tbl_b.number, 1);
        assert_eq!(fig_c.number, 2);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut registry = LabelRegistry::new();
        scan_all(&mut registry, "x @s:intro y @s:other z @s:intro");
        let intro = registry
            .get(&LabelKey::new(Namespace::Named("s".into()), "intro"))
            .unwrap();
        assert_eq!(intro.number, 1);
        // the re-definition did not consume a number
        let other = registry
            .get(&LabelKey::new(Namespace::Named("s".into()), "other"))
            .unwrap();
        assert_eq!(other.number, 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_global_counter_uses_sentinel_namespace() {
        let mut registry = LabelRegistry::new();
        scan_all(&mut registry, "p @mean q @stddev");
        assert_eq!(
            registry
                .get(&LabelKey::new(Namespace::Global, "mean"))
                .unwrap()
                .number,
            1
        );
        assert_eq!(
            registry
                .get(&LabelKey::new(Namespace::Global, "stddev"))
                .unwrap()
                .number,
            2
        );
    }

    #[test]
    fn test_taggable_formatting() {
        let entry = LabelEntry {
            namespace: Namespace::Named("eq".into()),
            id: "pyth".into(),
            number: 1,
            taggable: true,
        };
        assert_eq!(entry.format(false), "(1)");
        assert_eq!(entry.format(true), "1");
    }

    #[test]
    fn test_named_and_global_formatting() {
        let named = LabelEntry {
            namespace: Namespace::Named("s".into()),
            id: "intro".into(),
            number: 3,
            taggable: false,
        };
        assert_eq!(named.format(false), "s 3");
        assert_eq!(named.format(true), "3");
        let global = LabelEntry {
            namespace: Namespace::Global,
            id: "mean".into(),
            number: 2,
            taggable: false,
        };
        assert_eq!(global.format(false), "2");
    }

    #[test]
    fn test_taggable_membership_is_case_insensitive() {
        let mut registry = LabelRegistry::new();
        scan_all(&mut registry, "tag @EQ:pyth here");
        let entry = registry
            .get(&LabelKey::new(Namespace::Named("EQ".into()), "pyth"))
            .unwrap();
        assert!(entry.taggable);
        assert_eq!(entry.format(false), "(1)");
    }

    #[test]
    fn test_rewrite_emits_anchor_and_link() {
        let mut registry = LabelRegistry::new();
        let segment = Segment::new("## Setup @s:intro\n\nSee #s:intro.");
        registry.scan_segment(&segment.text);
        let spans = registry.rewrite_segment(&segment);
        assert!(spans.contains(&Span::Anchor {
            id: "intro".into(),
            label: "s 1".into(),
        }));
        assert!(spans.contains(&Span::Link {
            target: "intro".into(),
            label: "s 1".into(),
        }));
    }

    #[test]
    fn test_unresolved_reference_renders_placeholder() {
        let registry = LabelRegistry::new();
        let segment = Segment::new("see #x:never-defined here");
        let spans = registry.rewrite_segment(&segment);
        assert_eq!(
            spans,
            vec![
                Span::Text("see ".into()),
                Span::Text("??".into()),
                Span::Text(" here".into()),
            ]
        );
    }

    #[test]
    fn test_width_preservation_in_table_rows() {
        let mut registry = LabelRegistry::new();
        let segment = Segment::fixed_width("| @fig:setup | first |");
        registry.scan_segment(&segment.text);
        let spans = registry.rewrite_segment(&segment);
        // "@fig:setup" is 10 bytes wide; "fig 1" is padded to match
        assert_eq!(
            refmark_types::spans_to_plain(&spans),
            "| fig 1      | first |"
        );
    }

    #[test]
    fn test_unresolved_reference_report() {
        let mut registry = LabelRegistry::new();
        registry.scan_segment("@s:intro");
        let missing = registry.unresolved_references("see #s:intro and #s:nope");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].to_string(), "s:nope");
    }
}
