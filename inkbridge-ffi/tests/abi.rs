//! C ABI round-trip tests, driven from Rust through the extern surface.

use inkbridge_engine::{Color, MemDocBuilder, MemPageBuilder};
use inkbridge_ffi::*;
use libc::c_char;
use std::ffi::CString;
use tempfile::TempDir;

fn fixture(dir: &TempDir, name: &str, builder: &MemDocBuilder) -> CString {
    let path = dir.path().join(name);
    builder.write_to(&path).expect("write fixture");
    CString::new(path.to_str().unwrap()).unwrap()
}

fn last_error() -> String {
    let mut buf = vec![0u8; 256];
    let n = unsafe { ink_last_error(buf.as_mut_ptr() as *mut c_char, buf.len()) };
    buf.truncate(n.min(buf.len() - 1));
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn open_count_render_free() {
    let dir = TempDir::new().unwrap();
    let path = fixture(
        &dir,
        "doc.json",
        &MemDocBuilder::new()
            .page(MemPageBuilder::letter().rect(10.0, 10.0, 150.0, 150.0, Color::BLACK))
            .page(MemPageBuilder::letter()),
    );
    let empty = CString::new("").unwrap();

    let doc = unsafe { ink_document_open(path.as_ptr(), empty.as_ptr()) };
    assert_ne!(doc, 0, "{}", last_error());
    assert_eq!(ink_document_page_count(doc), 2);

    let page = ink_page_open(doc, 0);
    assert_ne!(page, 0, "{}", last_error());

    let mut bounds = [0f32; 4];
    assert!(unsafe { ink_page_media_box(page, bounds.as_mut_ptr()) });
    assert_eq!(bounds, [0.0, 0.0, 612.0, 792.0]);

    let viewbox = [0i32, 0, 200, 200];
    let matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut pixels = vec![0u32; 200 * 200];
    unsafe {
        ink_page_render(
            doc,
            page,
            viewbox.as_ptr(),
            matrix.as_ptr(),
            pixels.as_mut_ptr(),
            pixels.len(),
        );
    }
    // white clear is 0xffffffff; the black rect must have marked pixels
    assert!(pixels.iter().any(|&px| px != 0xffff_ffff));

    ink_page_free(page);
    ink_document_free(doc);
}

#[test]
fn failed_open_reports_message() {
    let missing = CString::new("/no/such/fixture.json").unwrap();
    let empty = CString::new("").unwrap();
    let doc = unsafe { ink_document_open(missing.as_ptr(), empty.as_ptr()) };
    assert_eq!(doc, 0);
    assert!(last_error().contains("open failed"));
}

#[test]
fn wrong_password_reports_message() {
    let dir = TempDir::new().unwrap();
    let path = fixture(
        &dir,
        "locked.json",
        &MemDocBuilder::new()
            .password("sesame")
            .page(MemPageBuilder::letter()),
    );
    let wrong = CString::new("open up").unwrap();

    let doc = unsafe { ink_document_open(path.as_ptr(), wrong.as_ptr()) };
    assert_eq!(doc, 0);
    assert!(last_error().contains("wrong password"));
}

#[test]
fn null_handles_are_noops() {
    ink_document_free(0);
    ink_page_free(0);
    assert_eq!(ink_document_page_count(0), -1);

    let mut bounds = [0f32; 4];
    assert!(!unsafe { ink_page_media_box(0, bounds.as_mut_ptr()) });
}

#[test]
fn render_with_mismatched_count_is_swallowed() {
    let dir = TempDir::new().unwrap();
    let path = fixture(
        &dir,
        "doc.json",
        &MemDocBuilder::new().page(MemPageBuilder::letter()),
    );
    let empty = CString::new("").unwrap();

    let doc = unsafe { ink_document_open(path.as_ptr(), empty.as_ptr()) };
    let page = ink_page_open(doc, 0);
    assert_ne!(page, 0);

    let viewbox = [0i32, 0, 100, 100];
    let matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut pixels = vec![0u32; 16]; // far too small
    unsafe {
        ink_page_render(
            doc,
            page,
            viewbox.as_ptr(),
            matrix.as_ptr(),
            pixels.as_mut_ptr(),
            pixels.len(),
        );
    }
    assert!(last_error().contains("render failed"));

    ink_page_free(page);
    ink_document_free(doc);
}
