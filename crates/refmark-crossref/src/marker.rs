/*
 * marker.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Marker grammar and scanning.
 */

//! Marker grammar and scanning.
//!
//! A marker is `<sigil><namespace?>:<local-id><bang?>`:
//!
//! - sigil: `@` defines a label, `#` references one
//! - namespace: optional alphabetic prefix terminated by `:`
//! - local-id: alphanumeric token, may also contain `:`, `_` and `-`
//! - bang: optional trailing `!` requesting the raw rendering
//!   (bare number, no namespace label or parentheses)

use once_cell::sync::Lazy;
use regex::Regex;

/// Whether a marker defines a label or references one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    /// `@`: defines a label and claims the next number in its namespace.
    Definition,
    /// `#`: resolves to the number of an already-defined label.
    Reference,
}

/// A marker found in a text segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
    pub sigil: Sigil,
    /// Namespace prefix, if the marker carried one.
    pub namespace: Option<&'a str>,
    /// Local identifier within the namespace.
    pub id: &'a str,
    /// Trailing bang: render the bare number.
    pub raw: bool,
    /// Byte offset of the sigil in the segment.
    pub start: usize,
    /// Byte offset one past the end of the marker.
    pub end: usize,
}

impl Marker<'_> {
    /// Source width of the marker, in bytes.
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<sigil>[@#])(?:(?P<ns>[A-Za-z]+):)?(?P<id>[A-Za-z0-9_][A-Za-z0-9_-]*(?::[A-Za-z0-9_][A-Za-z0-9_-]*)*)(?P<bang>!)?",
    )
    .expect("marker regex")
});

/// Namespaces that belong to other resolvers, never to labels.
const RESERVED_NAMESPACES: &[&str] = &["cite"];

/// Global identifiers reserved for inline directives.
const RESERVED_IDS: &[&str] = &["bibliography"];

/// Markers are only recognized at a plausible word boundary.
///
/// A reference at the start of a line is skipped so ATX headings are
/// never misread as references (the `regex` crate has no lookbehind, so
/// the preceding byte is checked by hand). A sigil directly after an
/// alphanumeric character is skipped so e-mail addresses and fragment
/// URLs pass through untouched.
fn boundary_ok(text: &str, start: usize, sigil: Sigil) -> bool {
    match text[..start].chars().next_back() {
        None => sigil == Sigil::Definition,
        Some('\n') => sigil == Sigil::Definition,
        Some(prev) => !(prev.is_alphanumeric() || prev == '@' || prev == '#'),
    }
}

fn reserved(sigil: Sigil, namespace: Option<&str>, id: &str) -> bool {
    if let Some(ns) = namespace {
        return RESERVED_NAMESPACES
            .iter()
            .any(|r| ns.eq_ignore_ascii_case(r));
    }
    sigil == Sigil::Definition && RESERVED_IDS.iter().any(|r| id.eq_ignore_ascii_case(r))
}

/// Scan a text segment for label markers, in order of occurrence.
///
/// Reserved markup (`#cite:…`, the `@bibliography` directive) is skipped;
/// those sequences belong to the citation resolver.
pub fn markers(text: &str) -> Vec<Marker<'_>> {
    let mut found = Vec::new();
    for caps in MARKER_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match");
        let sigil = match &text[whole.start()..whole.start() + 1] {
            "@" => Sigil::Definition,
            _ => Sigil::Reference,
        };
        if !boundary_ok(text, whole.start(), sigil) {
            continue;
        }
        let namespace = caps.name("ns").map(|m| m.as_str());
        let id = caps.name("id").expect("id group").as_str();
        if reserved(sigil, namespace, id) {
            continue;
        }
        found.push(Marker {
            sigil,
            namespace,
            id,
            raw: caps.name("bang").is_some(),
            start: whole.start(),
            end: whole.end(),
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_with_namespace() {
        let found = markers("## Section @s:intro");
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.sigil, Sigil::Definition);
        assert_eq!(m.namespace, Some("s"));
        assert_eq!(m.id, "intro");
        assert!(!m.raw);
    }

    #[test]
    fn test_global_definition() {
        let found = markers("### Problem @mean");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].namespace, None);
        assert_eq!(found[0].id, "mean");
    }

    #[test]
    fn test_reference_with_bang() {
        let found = markers("see #s:intro! here");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sigil, Sigil::Reference);
        assert!(found[0].raw);
    }

    #[test]
    fn test_local_id_may_contain_colon() {
        let found = markers("panel @fig:setup:left done");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].namespace, Some("fig"));
        assert_eq!(found[0].id, "setup:left");
    }

    #[test]
    fn test_numeric_prefix_is_not_a_namespace() {
        let found = markers("run @2024:q1 next");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].namespace, None);
        assert_eq!(found[0].id, "2024:q1");
    }

    #[test]
    fn test_heading_is_not_a_reference() {
        assert!(markers("#intro\n## Section").is_empty());
        let found = markers("mid-line #intro works");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_reference_after_newline_is_skipped() {
        assert!(markers("text\n#heading-like").is_empty());
    }

    #[test]
    fn test_email_address_is_skipped() {
        assert!(markers("mail user@example-host for help").is_empty());
    }

    #[test]
    fn test_cite_namespace_is_reserved() {
        assert!(markers("see #cite:knuth1968 for details").is_empty());
    }

    #[test]
    fn test_bibliography_directive_is_reserved() {
        let found = markers("@bibliography url=\"refs.bib\"");
        // `url` is not preceded by a sigil, so only the reserved word is
        // even a candidate.
        assert!(found.is_empty());
    }

    #[test]
    fn test_marker_offsets() {
        let text = "a @fig:one b";
        let found = markers(text);
        assert_eq!(&text[found[0].start..found[0].end], "@fig:one");
        assert_eq!(found[0].width(), 8);
    }
}
