//! # inkbridge
//!
//! A handle-managed bridge between a host environment and a document
//! content engine.
//!
//! The bridge owns document and page records behind opaque, generation-
//! checked 64-bit handles, records each page's interpreted content into a
//! display list exactly once at page-open time, and rasterizes that
//! recording into caller-supplied BGRx pixel buffers under arbitrary
//! affine transforms, so repeated renders of one page (zoom, pan,
//! rotation) never re-interpret its content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use inkbridge::Bridge;
//! use inkbridge_engine::{Matrix, MemDocEngine, ViewBox};
//!
//! let mut bridge = Bridge::new(MemDocEngine::new());
//!
//! let doc = bridge.open_document("document.json", "")?;
//! println!("{} pages", bridge.page_count(doc)?);
//!
//! let page = bridge.open_page(doc, 0)?;
//! let bounds = bridge.media_box(page)?;
//!
//! let mut pixels = vec![0u8; 200 * 200 * 4];
//! bridge.render_page(
//!     doc,
//!     page,
//!     ViewBox::new(0, 0, 200, 200),
//!     Matrix::scale(200.0 / bounds.width()),
//!     &mut pixels,
//! )?;
//!
//! bridge.free_page(page);
//! bridge.free_document(doc);
//! # Ok::<(), inkbridge::BridgeError>(())
//! ```
//!
//! All operations are synchronous, blocking calls on the caller's thread.
//! Mutating operations take `&mut self`; hosts that share one `Bridge`
//! across threads serialize access externally.

mod cache;
mod display_list;
mod error;
mod handle;
mod raster;
mod registry;

pub use cache::RenderCache;
pub use display_list::DisplayList;
pub use error::{BridgeError, Result};
pub use handle::{DocumentHandle, PageHandle};
pub use raster::{encode_png, write_png, BYTES_PER_PIXEL};
pub use registry::Bridge;

pub use inkbridge_engine::{ContentEngine, Matrix, Outline, PageBounds, ViewBox};
