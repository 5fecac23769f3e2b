//! # inkbridge-ffi
//!
//! The C ABI boundary of the inkbridge workspace.
//!
//! Handles cross this boundary as plain `u64` values; zero is the null
//! handle and is accepted as a no-op by the free functions. Open failures
//! return the null handle and store a message retrievable through
//! [`ink_last_error`]; render failures are logged and swallowed, leaving
//! whatever pixels were written (possibly just the cleared background).
//!
//! All entry points are panic-contained: a panic inside the bridge is
//! reported like any other failure instead of unwinding into the host.

mod boundary;

use boundary::{scoped_matrix, scoped_str, scoped_viewbox, ScopedPixels};
use inkbridge::{Bridge, DocumentHandle, PageHandle};
use inkbridge_engine::MemDocEngine;
use libc::c_char;
use log::{debug, error};
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, OnceLock};

static BRIDGE: OnceLock<Mutex<Bridge<MemDocEngine>>> = OnceLock::new();

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn bridge() -> MutexGuard<'static, Bridge<MemDocEngine>> {
    BRIDGE
        .get_or_init(|| Mutex::new(Bridge::new(MemDocEngine::new())))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_last_error(message: impl Into<String>) {
    let message = message.into();
    error!("{message}");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Run a boundary operation body, containing panics.
fn contained<T>(fallback: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            set_last_error("panic inside bridge operation");
            fallback
        }
    }
}

/// Initialize env_logger-backed logging for the library. Safe to call more
/// than once; later calls are no-ops.
#[no_mangle]
pub extern "C" fn ink_init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
    debug!("inkbridge logging initialized");
}

/// Copy the calling thread's last error message into `buf`.
///
/// Returns the message length in bytes (NUL excluded), or 0 if there is no
/// pending message. The copy is truncated to `cap - 1` bytes and always
/// NUL-terminated when `cap > 0`.
///
/// # Safety
///
/// `buf` must be null or point to `cap` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn ink_last_error(buf: *mut c_char, cap: usize) -> usize {
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some(message) = slot.as_deref() else {
            return 0;
        };
        if !buf.is_null() && cap > 0 {
            let n = message.len().min(cap - 1);
            // SAFETY: caller guarantees buf points to cap writable bytes
            unsafe {
                std::ptr::copy_nonoverlapping(message.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        message.len()
    })
}

/// Open the document at `path` with `password` (empty or null for none).
///
/// Returns the document handle, or 0 on failure with the reason stored for
/// [`ink_last_error`].
///
/// # Safety
///
/// `path` must point to a NUL-terminated string; `password` may be null.
#[no_mangle]
pub unsafe extern "C" fn ink_document_open(
    path: *const c_char,
    password: *const c_char,
) -> u64 {
    // SAFETY: caller guarantees both pointers per this function's contract
    let path = unsafe { scoped_str(path) };
    let password = unsafe { scoped_str(password) }.unwrap_or("");
    contained(0, || {
        clear_last_error();
        let Some(path) = path else {
            set_last_error("document path is null or not UTF-8");
            return 0;
        };

        match bridge().open_document(path, password) {
            Ok(handle) => handle.to_raw(),
            Err(e) => {
                set_last_error(format!("open failed: {e}"));
                0
            }
        }
    })
}

/// Free a document. Null handles are a no-op; stale handles are logged and
/// ignored.
#[no_mangle]
pub extern "C" fn ink_document_free(handle: u64) {
    contained((), || {
        bridge().free_document(DocumentHandle::from_raw(handle));
    })
}

/// Number of pages in an open document, or -1 on a stale/null handle.
#[no_mangle]
pub extern "C" fn ink_document_page_count(handle: u64) -> i64 {
    contained(-1, || {
        clear_last_error();
        match bridge().page_count(DocumentHandle::from_raw(handle)) {
            Ok(count) => count as i64,
            Err(e) => {
                set_last_error(format!("page count failed: {e}"));
                -1
            }
        }
    })
}

/// Open a page by zero-based index. Returns the page handle, or 0 on
/// failure with the reason stored for [`ink_last_error`].
#[no_mangle]
pub extern "C" fn ink_page_open(doc_handle: u64, index: i32) -> u64 {
    contained(0, || {
        clear_last_error();
        if index < 0 {
            set_last_error(format!("negative page index {index}"));
            return 0;
        }
        match bridge().open_page(DocumentHandle::from_raw(doc_handle), index as usize) {
            Ok(handle) => handle.to_raw(),
            Err(e) => {
                set_last_error(format!("open page failed: {e}"));
                0
            }
        }
    })
}

/// Free a page. Null handles are a no-op; stale handles are logged and
/// ignored.
#[no_mangle]
pub extern "C" fn ink_page_free(handle: u64) {
    contained((), || {
        bridge().free_page(PageHandle::from_raw(handle));
    })
}

/// Write a page's media box into a host 4-float array as
/// `[left, bottom, right, top]`. Returns false on a null output buffer or
/// a stale handle.
///
/// # Safety
///
/// `out` must be null or point to 4 writable f32 values.
#[no_mangle]
pub unsafe extern "C" fn ink_page_media_box(handle: u64, out: *mut f32) -> bool {
    contained(false, || {
        if out.is_null() {
            return false;
        }
        match bridge().media_box(PageHandle::from_raw(handle)) {
            Ok(bounds) => {
                // SAFETY: out checked non-null; caller guarantees 4 floats
                let slice = unsafe { std::slice::from_raw_parts_mut(out, 4) };
                slice.copy_from_slice(&bounds.to_array());
                true
            }
            Err(e) => {
                set_last_error(format!("media box failed: {e}"));
                false
            }
        }
    })
}

/// Render a page region into a host pixel array.
///
/// `viewbox` is 4 ints `[x0, y0, x1, y1]` in device pixels; `matrix` is 6
/// floats `[a, b, c, d, e, f]`; `pixels` holds `pixel_count` int-packed
/// BGRx pixels and must match the viewbox extent. Failures are logged and
/// stored for [`ink_last_error`]; the call itself always returns, leaving
/// best-effort pixel contents.
///
/// # Safety
///
/// `viewbox`, `matrix`, and `pixels` must be null or point to 4 i32, 6
/// f32, and `pixel_count` u32 values respectively, valid for the call.
#[no_mangle]
pub unsafe extern "C" fn ink_page_render(
    doc_handle: u64,
    page_handle: u64,
    viewbox: *const i32,
    matrix: *const f32,
    pixels: *mut u32,
    pixel_count: usize,
) {
    // SAFETY: caller guarantees all three pointers per this function's
    // contract; the pixel guard's scope ends inside this call.
    let viewbox = unsafe { scoped_viewbox(viewbox) };
    let ctm = unsafe { scoped_matrix(matrix) };
    let guard = unsafe { ScopedPixels::acquire(pixels, pixel_count) };
    contained((), || {
        clear_last_error();
        let Some(viewbox) = viewbox else {
            set_last_error("render: viewbox is null");
            return;
        };
        let Some(ctm) = ctm else {
            set_last_error("render: matrix is null");
            return;
        };
        let Some(mut guard) = guard else {
            set_last_error("render: pixel buffer is null");
            return;
        };

        let result = bridge().render_page(
            DocumentHandle::from_raw(doc_handle),
            PageHandle::from_raw(page_handle),
            viewbox,
            ctm,
            guard.bytes_mut(),
        );
        match result {
            Ok(()) => guard.mark_modified(),
            // best-effort: partial pixels stay, no error escapes the call
            Err(e) => set_last_error(format!("render failed: {e}")),
        }
    })
}
