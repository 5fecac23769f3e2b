//! The content-engine primitive set and engine-side error taxonomy.

use crate::device::Device;
use crate::geom::{Matrix, PageBounds};
use crate::outline::Outline;
use std::path::Path;
use thiserror::Error;

/// Errors a content engine can report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The source is encrypted and no password was supplied.
    #[error("document requires a password")]
    NeedsPassword,

    /// A password was supplied but it is not the document's password.
    #[error("wrong password for encrypted document")]
    WrongPassword,

    /// The source file does not exist.
    #[error("source file not found: {0}")]
    Missing(String),

    /// The source exists but is not structurally valid.
    #[error("corrupt source: {reason}")]
    Corrupt { reason: String },

    /// A page index outside the document's page tree.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// IO error while reading the source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The small primitive set the bridge calls into an engine through.
///
/// An engine parses documents, resolves pages, and interprets one page's
/// content into calls on a [`Device`]. Everything else (handle lifecycle,
/// display-list caching, rasterization) lives on the bridge side of this
/// trait.
pub trait ContentEngine {
    /// Parsed cross-reference/page-tree state for one open document.
    type Document;
    /// One loaded page object.
    type Page;

    /// Parse the source at `path` into document state.
    ///
    /// `password` is the host-supplied password string; empty means none
    /// was given.
    fn open(&self, path: &Path, password: &str) -> Result<Self::Document, EngineError>;

    /// Number of pages in the document's page tree.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Resolve and load the page object at a zero-based index.
    fn load_page(&self, doc: &Self::Document, index: usize) -> Result<Self::Page, EngineError>;

    /// The page's intrinsic bounding box.
    fn page_bounds(&self, page: &Self::Page) -> PageBounds;

    /// Interpret the page's content into drawing operations on `device`,
    /// with coordinates transformed by `ctm`.
    fn run_page(
        &self,
        doc: &Self::Document,
        page: &Self::Page,
        device: &mut dyn Device,
        ctm: Matrix,
    ) -> Result<(), EngineError>;

    /// Load the document's outline tree, if it has one. Absence of an
    /// outline is not an error.
    fn load_outline(&self, doc: &Self::Document) -> Option<Outline>;
}
