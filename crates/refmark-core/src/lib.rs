/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolution driver and host integration.
 */

//! Resolution driver and host integration.
//!
//! This crate orchestrates the two resolvers over a host document:
//!
//! - [`DocumentHost`]: the narrow interface a host implements to supply
//!   text segments and receive replacement spans
//! - [`BibliographySource`]: the asynchronous boundary through which a
//!   bibliography blob is retrieved
//! - [`Driver`]: runs one resolution pass, scan then rewrite, always
//!   as a pair, never against a stale registry
//!
//! A pass is synchronous and runs to completion; failures degrade (an
//! unresolved glyph, an empty record set) rather than aborting the host
//! document. Registries are rebuilt from scratch on every pass, so
//! repeated passes over the same source are idempotent.

pub mod driver;
pub mod error;
pub mod host;

pub use driver::{Driver, PassReport};
pub use error::{RefmarkError, Result};
pub use host::{BibliographySource, Capabilities, DocumentHost};

// re-exported: the taggable set is configured on the driver
pub use refmark_crossref::TaggableTypes;
