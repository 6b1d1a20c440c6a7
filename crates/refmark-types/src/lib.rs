/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document interface types for refmark.
 *
 * This crate defines the data types exchanged between the resolution
 * engine and a host document: raw text segments in, replacement spans
 * out. It has no knowledge of any concrete host (files, notebooks, live
 * document trees) and minimal dependencies, so both resolvers and any
 * host adapter can depend on it.
 */

pub mod segment;
pub mod span;

pub use segment::Segment;
pub use span::{Span, rewrite_text_spans, spans_to_markdown, spans_to_plain};
