//! Bibliography record parsing.
//!
//! The source format is a flat text blob of records, each opened by an
//! entry marker with an entry type and a citation key, followed by
//! `field = value` lines:
//!
//! ```text
//! @book{knuth1968,
//!   author = {Donald Knuth},
//!   title  = {The Art of Computer Programming},
//!   year   = 1968,
//! }
//! ```
//!
//! Parsing is best-effort: a line that matches neither shape is silently
//! skipped, unknown entry types are preserved verbatim, and malformed
//! input yields zero records rather than an error. Field names are
//! case-insensitive (stored lowercased); `{…}` and `"…"` delimiters and
//! trailing commas are stripped from values.

use hashlink::LinkedHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// One parsed bibliography record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibRecord {
    /// Citation key, unique within one source.
    pub key: String,
    /// Entry type as written in the source (`book`, `article`, …).
    pub entry_type: String,
    fields: LinkedHashMap<String, String>,
}

impl BibRecord {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: LinkedHashMap::new(),
        }
    }

    /// Look up a field by case-insensitive name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set a field, lowercasing its name. A repeated field keeps its
    /// original position but takes the new value.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .replace(name.to_ascii_lowercase(), value.into());
    }

    /// Iterate fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*@\s*([A-Za-z]+)\s*\{\s*([^,{}\s]+)\s*,?\s*$"#).expect("header regex")
});

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z][A-Za-z0-9_-]*)\s*=\s*(.+?)\s*,?\s*$"#).expect("field regex")
});

/// Parse a bibliography source blob into records.
///
/// Never fails: anything unrecognizable is skipped and parsing continues
/// with the next line. A record whose key repeats replaces the earlier
/// record.
pub fn parse_bibliography(source: &str) -> Vec<BibRecord> {
    let mut records: LinkedHashMap<String, BibRecord> = LinkedHashMap::new();
    let mut current: Option<BibRecord> = None;

    for line in source.lines() {
        if let Some(caps) = HEADER_RE.captures(line) {
            if let Some(done) = current.take() {
                records.replace(done.key.clone(), done);
            }
            current = Some(BibRecord::new(&caps[2], &caps[1]));
            continue;
        }
        if line.trim() == "}" {
            if let Some(done) = current.take() {
                records.replace(done.key.clone(), done);
            }
            continue;
        }
        let Some(record) = current.as_mut() else {
            continue;
        };
        if let Some(caps) = FIELD_RE.captures(line) {
            record.set_field(&caps[1], strip_delimiters(&caps[2]));
        }
        // anything else is junk between fields; skip it
    }
    if let Some(done) = current.take() {
        records.replace(done.key.clone(), done);
    }

    let parsed: Vec<BibRecord> = records.into_iter().map(|(_, r)| r).collect();
    tracing::debug!(records = parsed.len(), "parsed bibliography source");
    parsed
}

/// Strip one layer of `{…}` or `"…"` delimiters from a field value.
fn strip_delimiters(value: &str) -> String {
    let value = value.trim();
    let inner = if (value.starts_with('{') && value.ends_with('}'))
        || (value.starts_with('"') && value.ends_with('"'))
    {
        if value.len() >= 2 {
            &value[1..value.len() - 1]
        } else {
            value
        }
    } else {
        value
    };
    inner.trim().to_string()
}

/// The inline directive naming the bibliography placeholder and the URL
/// of the source to fetch: `@bibliography url="<url>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibDirective {
    pub url: String,
    /// Byte offset of the directive in its segment.
    pub start: usize,
    /// Byte offset one past the end of the directive.
    pub end: usize,
}

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@bibliography\s+url="([^"]*)""#).expect("directive regex")
});

/// Find the bibliography directive in a text segment, if present.
pub fn find_directive(text: &str) -> Option<BibDirective> {
    DIRECTIVE_RE.captures(text).map(|caps| {
        let whole = caps.get(0).expect("match");
        BibDirective {
            url: caps[1].to_string(),
            start: whole.start(),
            end: whole.end(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
@book{knuth1968,
  author = {Donald E. Knuth},
  title = {The Art of Computer Programming},
  publisher = {Addison-Wesley},
  year = 1968,
}

@article{turing1936,
  author = "Alan M. Turing",
  title = "On Computable Numbers",
  journal = {Proceedings of the London Mathematical Society},
  year = {1936},
}
"#;

    #[test]
    fn test_parse_two_records() {
        let records = parse_bibliography(SOURCE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "knuth1968");
        assert_eq!(records[0].entry_type, "book");
        assert_eq!(records[1].key, "turing1936");
        assert_eq!(records[1].entry_type, "article");
    }

    #[test]
    fn test_delimiters_are_stripped() {
        let records = parse_bibliography(SOURCE);
        assert_eq!(records[0].field("author"), Some("Donald E. Knuth"));
        assert_eq!(records[0].field("year"), Some("1968"));
        assert_eq!(records[1].field("author"), Some("Alan M. Turing"));
        assert_eq!(records[1].field("year"), Some("1936"));
    }

    #[test]
    fn test_field_names_are_case_insensitive() {
        let records = parse_bibliography("@misc{x,\n  TITLE = {Shouting}\n}");
        assert_eq!(records[0].field("title"), Some("Shouting"));
        assert_eq!(records[0].field("Title"), Some("Shouting"));
    }

    #[test]
    fn test_unknown_entry_type_is_preserved() {
        let records = parse_bibliography("@dataset{d1,\n  year = 2020\n}");
        assert_eq!(records[0].entry_type, "dataset");
    }

    #[test]
    fn test_junk_lines_are_skipped() {
        let source = "@book{k,\n  ???not a field???\n  year = 1999\n}";
        let records = parse_bibliography(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("year"), Some("1999"));
        assert_eq!(records[0].fields().count(), 1);
    }

    #[test]
    fn test_malformed_source_yields_zero_records() {
        assert!(parse_bibliography("this is not a bibliography").is_empty());
        assert!(parse_bibliography("").is_empty());
    }

    #[test]
    fn test_field_outside_record_is_ignored() {
        let records = parse_bibliography("year = 2000\n@misc{m,\n title = {T}\n}");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("year"), None);
    }

    #[test]
    fn test_repeated_key_replaces_record() {
        let source = "@misc{m,\n year = 1\n}\n@misc{m,\n year = 2\n}";
        let records = parse_bibliography(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("year"), Some("2"));
    }

    #[test]
    fn test_find_directive() {
        let text = "Bibliography:\n\n@bibliography url=\"refs.bib\"\n";
        let directive = find_directive(text).unwrap();
        assert_eq!(directive.url, "refs.bib");
        assert_eq!(
            &text[directive.start..directive.end],
            "@bibliography url=\"refs.bib\""
        );
    }

    #[test]
    fn test_no_directive() {
        assert_eq!(find_directive("plain text"), None);
    }
}
