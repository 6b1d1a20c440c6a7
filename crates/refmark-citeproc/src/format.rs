//! IEEE-style bibliography entry formatting.
//!
//! Entries render as `[n] Author1, Author2, "Title," Venue, Year.`
//! Missing fields are elided rather than rendered as empty segments, so
//! a sparse record still produces a clean line. The venue is the
//! `journal` field, falling back to `booktitle`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bibliography::BibRecord;

static AUTHOR_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(?i:and)\s+").expect("author separator regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapse the conjunction delimiter between author names into a
/// comma-separated list: `A and B and C` → `A, B, C`.
fn normalize_authors(value: &str) -> String {
    AUTHOR_SEP_RE
        .split(value)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse internal whitespace runs (field values may span wrapped
/// source lines by the time a caller assembled them).
fn clean(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

/// Format one bibliography entry in IEEE style.
pub fn format_entry(number: u32, record: &BibRecord) -> String {
    let authors = record
        .field("author")
        .map(normalize_authors)
        .filter(|s| !s.is_empty());
    let title = record.field("title").map(clean).filter(|s| !s.is_empty());
    let venue = record
        .field("journal")
        .or_else(|| record.field("booktitle"))
        .map(clean)
        .filter(|s| !s.is_empty());
    let year = record.field("year").map(clean).filter(|s| !s.is_empty());

    let mut entry = format!("[{}]", number);
    if let Some(authors) = &authors {
        entry.push(' ');
        entry.push_str(authors);
        entry.push(',');
    }
    if let Some(title) = &title {
        entry.push_str(" \"");
        entry.push_str(title);
        entry.push_str(",\"");
    }
    for part in [&venue, &year].into_iter().flatten() {
        entry.push(' ');
        entry.push_str(part);
        entry.push(',');
    }

    // close the entry: the final separator becomes a period
    if let Some(stripped) = entry.strip_suffix(",\"") {
        format!("{}.\"", stripped)
    } else if let Some(stripped) = entry.strip_suffix(',') {
        format!("{}.", stripped)
    } else {
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> BibRecord {
        let mut record = BibRecord::new("key", "misc");
        for (name, value) in fields {
            record.set_field(name, *value);
        }
        record
    }

    #[test]
    fn test_full_entry() {
        let r = record(&[
            ("author", "Donald E. Knuth"),
            ("title", "The Art of Computer Programming"),
            ("journal", "Addison-Wesley"),
            ("year", "1968"),
        ]);
        assert_eq!(
            format_entry(1, &r),
            "[1] Donald E. Knuth, \"The Art of Computer Programming,\" Addison-Wesley, 1968."
        );
    }

    #[test]
    fn test_author_conjunction_collapses() {
        let r = record(&[("author", "Alice Ames and Bob Berg and Carol Chu")]);
        assert_eq!(format_entry(2, &r), "[2] Alice Ames, Bob Berg, Carol Chu.");
    }

    #[test]
    fn test_uppercase_conjunction() {
        let r = record(&[("author", "Alice Ames AND Bob Berg")]);
        assert_eq!(format_entry(1, &r), "[1] Alice Ames, Bob Berg.");
    }

    #[test]
    fn test_booktitle_fallback() {
        let r = record(&[
            ("title", "A Paper"),
            ("booktitle", "Proc. of the Conference"),
            ("year", "2001"),
        ]);
        assert_eq!(
            format_entry(3, &r),
            "[3] \"A Paper,\" Proc. of the Conference, 2001."
        );
    }

    #[test]
    fn test_missing_fields_are_elided() {
        let r = record(&[("year", "1936")]);
        assert_eq!(format_entry(1, &r), "[1] 1936.");
    }

    #[test]
    fn test_title_only_closes_inside_quotes() {
        let r = record(&[("title", "On Computable Numbers")]);
        assert_eq!(format_entry(1, &r), "[1] \"On Computable Numbers.\"");
    }

    #[test]
    fn test_empty_record() {
        let r = record(&[]);
        assert_eq!(format_entry(7, &r), "[7]");
    }

    #[test]
    fn test_whitespace_collapses() {
        let r = record(&[("title", "Spread   Out\tTitle")]);
        assert_eq!(format_entry(1, &r), "[1] \"Spread Out Title.\"");
    }
}
