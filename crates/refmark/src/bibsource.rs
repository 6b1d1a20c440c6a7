/*
 * bibsource.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filesystem-backed bibliography retrieval.
 */

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use refmark_core::{BibliographySource, RefmarkError, Result};

/// Resolves bibliography URLs against the local filesystem.
///
/// Plain paths and `file://` URLs are read relative to the document
/// being processed. Network schemes are out of scope here; they resolve
/// to a fetch error, which the driver degrades to an empty record set.
pub struct FileBibliographySource {
    base: PathBuf,
}

impl FileBibliographySource {
    /// Resolve relative URLs against `base` (the document's directory).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl BibliographySource for FileBibliographySource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let path = if let Some(stripped) = url.strip_prefix("file://") {
            Path::new(stripped).to_path_buf()
        } else if url.contains("://") {
            return Err(RefmarkError::fetch(
                url,
                "only local paths and file:// URLs are supported",
            ));
        } else {
            Path::new(url).to_path_buf()
        };

        let path = if path.is_absolute() {
            path
        } else {
            self.base.join(path)
        };

        std::fs::read_to_string(&path).map_err(|e| RefmarkError::fetch(url, e.to_string()))
    }
}
