//! The resource registry: sole owner of document and page records.

use crate::cache::RenderCache;
use crate::display_list::DisplayList;
use crate::error::{BridgeError, Result};
use crate::handle::{DocumentHandle, HandleTable, PageHandle};
use crate::raster;
use inkbridge_engine::{ContentEngine, Matrix, Outline, PageBounds, ViewBox};
use log::{debug, warn};
use std::path::Path;

/// One open document.
///
/// Field order is teardown order: outline first, then the render cache,
/// then the engine's page-tree state.
struct DocumentRecord<E: ContentEngine> {
    outline: Option<Outline>,
    cache: RenderCache,
    doc: E::Document,
}

/// One open page.
///
/// Field order is teardown order: the display list releases before the
/// page object it was recorded from.
struct PageRecord<E: ContentEngine> {
    list: DisplayList,
    page: E::Page,
    bounds: PageBounds,
}

/// The handle-managed bridge between a host and a content engine.
///
/// Owns every document and page record reachable from the handles it has
/// issued; the host owns only the opaque handle values. A document must
/// outlive the pages opened from it: the registry does not track the
/// association, but a freed document makes subsequent renders against its
/// handle fail with [`BridgeError::StaleHandle`] rather than touching
/// freed state.
///
/// # Example
///
/// ```no_run
/// use inkbridge::Bridge;
/// use inkbridge_engine::{Matrix, MemDocEngine, ViewBox};
///
/// let mut bridge = Bridge::new(MemDocEngine::new());
/// let doc = bridge.open_document("document.json", "")?;
/// let page = bridge.open_page(doc, 0)?;
///
/// let mut pixels = vec![0u8; 200 * 200 * 4];
/// bridge.render_page(
///     doc,
///     page,
///     ViewBox::new(0, 0, 200, 200),
///     Matrix::identity(),
///     &mut pixels,
/// )?;
///
/// bridge.free_page(page);
/// bridge.free_document(doc);
/// # Ok::<(), inkbridge::BridgeError>(())
/// ```
pub struct Bridge<E: ContentEngine> {
    engine: E,
    documents: HandleTable<DocumentRecord<E>>,
    pages: HandleTable<PageRecord<E>>,
}

impl<E: ContentEngine> Bridge<E> {
    /// Create a bridge over the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            documents: HandleTable::new(),
            pages: HandleTable::new(),
        }
    }

    /// Open the document at `path`.
    ///
    /// `password` is the host's password string; empty means none was
    /// supplied. On success the record owns the engine's parsed state, a
    /// fresh render cache, and the outline tree if the document has one
    /// (absence is not an error). On failure nothing is retained and no
    /// handle is issued.
    pub fn open_document<P: AsRef<Path>>(
        &mut self,
        path: P,
        password: &str,
    ) -> Result<DocumentHandle> {
        let path = path.as_ref();
        let doc = self
            .engine
            .open(path, password)
            .map_err(BridgeError::from)?;
        let outline = self.engine.load_outline(&doc);

        let handle = DocumentHandle::from_raw(self.documents.insert(DocumentRecord {
            outline,
            cache: RenderCache::new(),
            doc,
        }));
        debug!(
            "opened document {} -> handle {:#x}",
            path.display(),
            handle.to_raw()
        );
        Ok(handle)
    }

    /// Free a document and everything it owns.
    ///
    /// A null handle is a no-op. A stale handle (already freed, or never
    /// issued) is detected, logged, and ignored. Returns whether a live
    /// record was actually freed.
    pub fn free_document(&mut self, handle: DocumentHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        match self.documents.remove(handle.to_raw()) {
            Some(record) => {
                debug!("freeing document handle {:#x}", handle.to_raw());
                drop(record);
                true
            }
            None => {
                warn!("ignoring stale document handle {:#x}", handle.to_raw());
                false
            }
        }
    }

    /// Number of pages in an open document.
    pub fn page_count(&self, handle: DocumentHandle) -> Result<usize> {
        let record = self.document(handle)?;
        Ok(self.engine.page_count(&record.doc))
    }

    /// The document's outline tree, if it has one.
    pub fn outline(&self, handle: DocumentHandle) -> Result<Option<&Outline>> {
        Ok(self.document(handle)?.outline.as_ref())
    }

    /// Open a page of a document by zero-based index.
    ///
    /// Loads the page object, reads its bounds, and immediately interprets
    /// its content once into a fresh display list under the identity
    /// transform. Renders replay that recording; no interpretation happens
    /// after this point. On failure the partial record is released and no
    /// handle is issued.
    pub fn open_page(&mut self, doc_handle: DocumentHandle, index: usize) -> Result<PageHandle> {
        let record = self
            .documents
            .get(doc_handle.to_raw())
            .ok_or(BridgeError::StaleHandle { kind: "document" })?;

        let page = self.engine.load_page(&record.doc, index).map_err(|e| {
            warn!("page {} load failed: {}", index, e);
            BridgeError::PageLoadFailed { index }
        })?;
        let bounds = self.engine.page_bounds(&page);

        let mut list = DisplayList::new();
        self.engine
            .run_page(&record.doc, &page, &mut list, Matrix::identity())
            .map_err(|e| {
                warn!("page {} interpretation failed: {}", index, e);
                BridgeError::PageLoadFailed { index }
            })?;

        let handle = PageHandle::from_raw(self.pages.insert(PageRecord { list, page, bounds }));
        debug!(
            "opened page {} -> handle {:#x} ({} ops)",
            index,
            handle.to_raw(),
            self.pages
                .get(handle.to_raw())
                .map(|r| r.list.len())
                .unwrap_or(0)
        );
        Ok(handle)
    }

    /// Free a page and its display list.
    ///
    /// Null and stale handles behave as in [`Bridge::free_document`].
    pub fn free_page(&mut self, handle: PageHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        match self.pages.remove(handle.to_raw()) {
            Some(record) => {
                debug!("freeing page handle {:#x}", handle.to_raw());
                drop(record);
                true
            }
            None => {
                warn!("ignoring stale page handle {:#x}", handle.to_raw());
                false
            }
        }
    }

    /// The page's intrinsic bounding box: (left, bottom, right, top), in
    /// page-space units. A pure read of state cached at open time.
    pub fn media_box(&self, handle: PageHandle) -> Result<PageBounds> {
        Ok(self.page(handle)?.bounds)
    }

    /// Number of recorded drawing operations on a page. Zero for a blank
    /// page.
    pub fn page_op_count(&self, handle: PageHandle) -> Result<usize> {
        Ok(self.page(handle)?.list.len())
    }

    /// Render a page region into a caller-supplied pixel buffer.
    ///
    /// `pixels` must be exactly `viewbox.width() * viewbox.height()`
    /// pixels of 4 bytes (BGRx); anything else is a
    /// [`BridgeError::ViewportMismatch`]. The buffer is cleared to opaque
    /// white, the page's display list is replayed under `ctm` through a
    /// device bound to the document's render cache, and the result is
    /// swizzled to the BGRx contract. Render cost is proportional to page
    /// visual complexity, never to document size.
    pub fn render_page(
        &mut self,
        doc_handle: DocumentHandle,
        page_handle: PageHandle,
        viewbox: ViewBox,
        ctm: Matrix,
        pixels: &mut [u8],
    ) -> Result<()> {
        let doc = self
            .documents
            .get_mut(doc_handle.to_raw())
            .ok_or(BridgeError::StaleHandle { kind: "document" })?;
        let page = self
            .pages
            .get(page_handle.to_raw())
            .ok_or(BridgeError::StaleHandle { kind: "page" })?;

        raster::render_into(&mut doc.cache, &page.list, viewbox, ctm, pixels)
    }

    /// (hits, misses) counters of a document's render cache.
    pub fn cache_stats(&self, handle: DocumentHandle) -> Result<(u64, u64)> {
        Ok(self.document(handle)?.cache.stats())
    }

    /// Number of live document records.
    pub fn live_documents(&self) -> usize {
        self.documents.len()
    }

    /// Number of live page records.
    pub fn live_pages(&self) -> usize {
        self.pages.len()
    }

    fn document(&self, handle: DocumentHandle) -> Result<&DocumentRecord<E>> {
        self.documents
            .get(handle.to_raw())
            .ok_or(BridgeError::StaleHandle { kind: "document" })
    }

    fn page(&self, handle: PageHandle) -> Result<&PageRecord<E>> {
        self.pages
            .get(handle.to_raw())
            .ok_or(BridgeError::StaleHandle { kind: "page" })
    }
}
