//! Scoped access to host-owned memory.
//!
//! Every host array or string a boundary call receives is acquired into a
//! guard (or a plain copy) whose lifetime ends inside that call, on every
//! exit path. No raw pointer escapes its owning operation; write targets
//! report whether their contents changed when the scope releases.

use inkbridge_engine::{Matrix, ViewBox};
use libc::c_char;
use log::trace;
use std::ffi::CStr;

/// Scoped mutable access to a host-owned u32 pixel array.
///
/// Acquire at the top of the operation, release (drop) before it returns.
/// The modified flag mirrors the host-side "contents changed" signal the
/// release carries.
pub(crate) struct ScopedPixels {
    ptr: *mut u8,
    len: usize,
    modified: bool,
}

impl ScopedPixels {
    /// Acquire `pixel_count` 4-byte pixels starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `pixel_count` writable u32 values that
    /// stay valid and unaliased for the guard's lifetime.
    pub unsafe fn acquire(ptr: *mut u32, pixel_count: usize) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        Some(Self {
            ptr: ptr.cast::<u8>(),
            len: pixel_count * 4,
            modified: false,
        })
    }

    /// The buffer as raw bytes, for the duration of the scope.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: acquire() checked the pointer; len covers exactly the
        // pixels the caller handed over.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Record that the buffer contents were written.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }
}

impl Drop for ScopedPixels {
    fn drop(&mut self) {
        trace!(
            "releasing pixel buffer: {} bytes, modified={}",
            self.len,
            self.modified
        );
    }
}

/// Copy a host 6-float array into a transform, scoped to the call.
///
/// # Safety
///
/// `ptr` must be null or point to 6 readable f32 values.
pub(crate) unsafe fn scoped_matrix(ptr: *const f32) -> Option<Matrix> {
    if ptr.is_null() {
        return None;
    }
    let m = std::slice::from_raw_parts(ptr, 6);
    Some(Matrix::new(m[0], m[1], m[2], m[3], m[4], m[5]))
}

/// Copy a host 4-int array into a viewbox, scoped to the call.
///
/// # Safety
///
/// `ptr` must be null or point to 4 readable i32 values.
pub(crate) unsafe fn scoped_viewbox(ptr: *const i32) -> Option<ViewBox> {
    if ptr.is_null() {
        return None;
    }
    let v = std::slice::from_raw_parts(ptr, 4);
    Some(ViewBox::new(v[0], v[1], v[2], v[3]))
}

/// Borrow a host C string as UTF-8 for the duration of the call.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub(crate) unsafe fn scoped_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}
