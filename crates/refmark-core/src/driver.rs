/*
 * driver.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The rewrite driver: one scan+rewrite pass over a host document.
 */

//! The rewrite driver.
//!
//! [`Driver::process`] runs one resolution pass: every registry is
//! rebuilt by scanning the host's current segments, then every segment
//! is rewritten against the freshly built registries. The two phases
//! always run as a pair, so a rewrite can never observe a stale
//! registry.
//!
//! Label resolution always runs. Citation resolution is engaged only
//! when the document carries a `@bibliography` directive, and is gated
//! on fetch completion of the named source; a failed fetch degrades to
//! an empty record set and the pass still completes.

use std::collections::HashSet;

use refmark_citeproc::{CitationIndex, find_directive, parse_bibliography};
use refmark_crossref::{LabelRegistry, TaggableTypes};
use refmark_types::{Segment, rewrite_text_spans};

use crate::Result;
use crate::host::{BibliographySource, DocumentHost};

/// Outcome of one resolution pass, for diagnostics.
#[derive(Debug, Default)]
pub struct PassReport {
    /// The pass no-oped because the host lacks an integration point.
    pub skipped: bool,
    /// Labels defined during scan.
    pub labels_defined: usize,
    /// Distinct citation keys assigned numbers.
    pub citations_assigned: usize,
    /// Reference keys that resolved to no label, in document order.
    pub unresolved_references: Vec<String>,
    /// Citation keys with no bibliography record, in document order.
    pub unresolved_citations: Vec<String>,
}

impl PassReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// True when every reference and citation resolved.
    pub fn is_clean(&self) -> bool {
        self.unresolved_references.is_empty() && self.unresolved_citations.is_empty()
    }
}

/// Orchestrates the resolvers over a host document.
pub struct Driver {
    taggable: TaggableTypes,
    bibliography: Option<Box<dyn BibliographySource>>,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            taggable: TaggableTypes::default(),
            bibliography: None,
        }
    }

    /// Override the taggable namespace set.
    pub fn with_taggable_types(mut self, taggable: TaggableTypes) -> Self {
        self.taggable = taggable;
        self
    }

    /// Configure how bibliography URLs are retrieved. Without a source,
    /// documents carrying a `@bibliography` directive resolve all
    /// citations to placeholders.
    pub fn with_bibliography_source(mut self, source: Box<dyn BibliographySource>) -> Self {
        self.bibliography = Some(source);
        self
    }

    /// Run one scan+rewrite pass over the host document.
    ///
    /// Never fails on document content: unresolved markup renders
    /// placeholders, a broken bibliography yields zero records, and a
    /// host without the region-enumeration capability produces a
    /// skipped report.
    pub fn process(&self, host: &mut dyn DocumentHost) -> Result<PassReport> {
        let capabilities = host.capabilities();
        if !capabilities.enumerate_regions {
            tracing::debug!("host cannot enumerate content regions, skipping pass");
            return Ok(PassReport::skipped());
        }

        let segments = host.segments();
        tracing::debug!(segments = segments.len(), "starting resolution pass");

        let mut labels = LabelRegistry::with_taggable_types(self.taggable.clone());
        labels.scan(&segments);

        let citations = self.build_citation_index(&segments);

        for (index, segment) in segments.iter().enumerate() {
            let mut spans = labels.rewrite_segment(segment);
            if let Some(citations) = &citations {
                spans = rewrite_text_spans(spans, |text| {
                    citations.rewrite_segment(&Segment {
                        text: text.to_string(),
                        preserve_width: segment.preserve_width,
                    })
                });
            }
            host.splice(index, spans);
        }

        let report = self.build_report(&labels, citations.as_ref(), &segments);
        if !report.unresolved_references.is_empty() {
            tracing::warn!(
                keys = ?report.unresolved_references,
                "unresolved references"
            );
        }
        if !report.unresolved_citations.is_empty() {
            tracing::warn!(keys = ?report.unresolved_citations, "unresolved citations");
        }

        if capabilities.typeset {
            tracing::debug!("signalling typesetter");
            host.typeset();
        }

        Ok(report)
    }

    /// Build the citation index, gated on the bibliography directive and
    /// on fetch completion. Returns `None` when the document carries no
    /// directive; the citation resolver is simply not engaged.
    fn build_citation_index(&self, segments: &[Segment]) -> Option<CitationIndex> {
        let directive = segments.iter().find_map(|s| find_directive(&s.text))?;

        let records = match &self.bibliography {
            None => {
                tracing::warn!(
                    url = %directive.url,
                    "no bibliography source configured, citations will be unresolved"
                );
                Vec::new()
            }
            Some(source) => match pollster::block_on(source.fetch(&directive.url)) {
                Ok(blob) => parse_bibliography(&blob),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        url = %directive.url,
                        "bibliography fetch failed, citations will be unresolved"
                    );
                    Vec::new()
                }
            },
        };

        let mut index = CitationIndex::with_records(records);
        index.scan(segments);
        Some(index)
    }

    fn build_report(
        &self,
        labels: &LabelRegistry,
        citations: Option<&CitationIndex>,
        segments: &[Segment],
    ) -> PassReport {
        let mut report = PassReport {
            skipped: false,
            labels_defined: labels.len(),
            citations_assigned: citations.map(CitationIndex::cited_len).unwrap_or(0),
            unresolved_references: Vec::new(),
            unresolved_citations: Vec::new(),
        };
        for segment in segments {
            report.unresolved_references.extend(
                labels
                    .unresolved_references(&segment.text)
                    .into_iter()
                    .map(|key| key.to_string()),
            );
            if let Some(citations) = citations {
                report
                    .unresolved_citations
                    .extend(citations.unresolved_citations(&segment.text));
            }
        }
        dedup_in_order(&mut report.unresolved_references);
        dedup_in_order(&mut report.unresolved_citations);
        report
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop repeated keys, keeping first occurrences in document order.
fn dedup_in_order(keys: &mut Vec<String>) {
    let mut seen = HashSet::new();
    keys.retain(|key| seen.insert(key.clone()));
}
