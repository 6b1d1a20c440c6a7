/*
 * host.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Host integration traits.
 */

//! Host integration traits.
//!
//! The core never walks a document tree itself. A host adapter exposes
//! text in stable document order and splices rewritten spans back;
//! which adapter is selected for a given environment is a host concern,
//! the driver only consults the adapter's [`Capabilities`].

use async_trait::async_trait;

use refmark_types::{Segment, Span};

/// What a concrete host adapter supports.
///
/// A host that cannot enumerate content regions causes the pass to
/// no-op silently; partial functionality still works, and a missing
/// integration point never fails the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The host can enumerate renderable text regions in document order.
    pub enumerate_regions: bool,
    /// The host re-triggers passes on render/mutation events.
    pub render_events: bool,
    /// The host has an embedded-math typesetter to signal after a pass.
    pub typeset: bool,
}

impl Capabilities {
    /// Everything supported.
    pub fn full() -> Self {
        Self {
            enumerate_regions: true,
            render_events: true,
            typeset: true,
        }
    }

    /// Nothing supported; every pass no-ops.
    pub fn none() -> Self {
        Self {
            enumerate_regions: false,
            render_events: false,
            typeset: false,
        }
    }
}

/// The narrow interface between the resolution core and a host document.
///
/// # Re-entrancy contract
///
/// [`segments`](DocumentHost::segments) must return the *original*
/// source text on every call, not previously rewritten output. The
/// driver rebuilds all registries from scratch each pass; supplying
/// original text is what makes repeated passes idempotent rather than
/// double-numbering.
pub trait DocumentHost {
    /// What this adapter supports.
    fn capabilities(&self) -> Capabilities;

    /// Raw text segments of every renderable region, in stable document
    /// order (flattened across regions).
    fn segments(&self) -> Vec<Segment>;

    /// Splice replacement spans back for the segment at `index`.
    fn splice(&mut self, index: usize, spans: Vec<Span>);

    /// Signal the embedded-math typesetter to re-run. Only called when
    /// [`Capabilities::typeset`] is set.
    fn typeset(&mut self) {}
}

/// Retrieval of a bibliography source blob.
///
/// This is the one asynchronous boundary in the system; the driver
/// awaits completion before citation scanning proceeds. A failed fetch
/// degrades the pass to "no records"; it never aborts label
/// resolution.
#[async_trait]
pub trait BibliographySource: Send + Sync {
    async fn fetch(&self, url: &str) -> crate::Result<String>;
}
