//! The raster pipeline: replaying a display list into a caller buffer.
//!
//! The pixel target is host-owned and sized `width * height` pixels, 4
//! bytes each, blue-green-red-pad byte order, row-major. Painting happens
//! through tiny-skia in its native RGBA order directly over the caller's
//! memory; a final in-place swizzle produces the BGRx contract. No parsing
//! happens here: the only input is a previously recorded display list.

use crate::cache::RenderCache;
use crate::display_list::DisplayList;
use crate::error::{BridgeError, Result};
use inkbridge_engine::{Color, Device, FillRule, Matrix, PathData, StrokeStyle, ViewBox};
use log::debug;
use std::io::BufWriter;
use std::path::Path;

/// Bytes per pixel of the render target.
pub const BYTES_PER_PIXEL: usize = 4;

/// A drawing device that paints into a borrowed pixel surface.
///
/// The surface origin is the viewbox's (x0, y0): device-space coordinates
/// are shifted so that pixel (x0, y0) lands on the buffer's first pixel.
struct DrawDevice<'a> {
    pixmap: tiny_skia::PixmapMut<'a>,
    origin: (f32, f32),
    cache: &'a mut RenderCache,
}

impl DrawDevice<'_> {
    fn to_sk_transform(&self, ctm: &Matrix) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            ctm.a,
            ctm.b,
            ctm.c,
            ctm.d,
            ctm.e - self.origin.0,
            ctm.f - self.origin.1,
        )
    }
}

fn paint_for(color: Color) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn sk_fill_rule(rule: FillRule) -> tiny_skia::FillRule {
    match rule {
        FillRule::NonZero => tiny_skia::FillRule::Winding,
        FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
    }
}

impl Device for DrawDevice<'_> {
    fn fill_path(&mut self, path: &PathData, rule: FillRule, ctm: &Matrix, color: Color) {
        let transform = self.to_sk_transform(ctm);
        let Some(sk_path) = self.cache.sk_path(path) else {
            debug!("skipping degenerate fill path {}", path.id());
            return;
        };
        self.pixmap
            .fill_path(sk_path, &paint_for(color), sk_fill_rule(rule), transform, None);
    }

    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeStyle, ctm: &Matrix, color: Color) {
        let transform = self.to_sk_transform(ctm);
        let Some(sk_path) = self.cache.sk_path(path) else {
            debug!("skipping degenerate stroke path {}", path.id());
            return;
        };
        let sk_stroke = tiny_skia::Stroke {
            width: stroke.width,
            ..tiny_skia::Stroke::default()
        };
        self.pixmap
            .stroke_path(sk_path, &paint_for(color), &sk_stroke, transform, None);
    }
}

/// Check the viewbox against the target buffer and report the extent.
fn checked_extent(viewbox: ViewBox, buffer_len: usize) -> Result<(u32, u32)> {
    let width = viewbox.width();
    let height = viewbox.height();
    let expected = viewbox.pixel_count() * BYTES_PER_PIXEL;
    if width <= 0 || height <= 0 || buffer_len != expected {
        return Err(BridgeError::ViewportMismatch {
            width,
            height,
            expected,
            actual: buffer_len,
        });
    }
    Ok((width as u32, height as u32))
}

/// Replay `list` into `pixels` under `ctm`, viewport-bounded by `viewbox`.
///
/// Clears the buffer to opaque white before drawing, so no pixel is ever
/// left at its previous (undefined) contents, then replays and swizzles to
/// BGRx. Degenerate operations are skipped; the output keeps whatever was
/// drawn before and after them.
pub(crate) fn render_into(
    cache: &mut RenderCache,
    list: &DisplayList,
    viewbox: ViewBox,
    ctm: Matrix,
    pixels: &mut [u8],
) -> Result<()> {
    let (width, height) = checked_extent(viewbox, pixels.len())?;

    // White clear doubles as the RGBA/BGRx-neutral background.
    pixels.fill(0xff);

    {
        let pixmap = tiny_skia::PixmapMut::from_bytes(pixels, width, height).ok_or(
            BridgeError::ViewportMismatch {
                width: viewbox.width(),
                height: viewbox.height(),
                expected: viewbox.pixel_count() * BYTES_PER_PIXEL,
                actual: 0,
            },
        )?;
        let mut device = DrawDevice {
            pixmap,
            origin: (viewbox.x0 as f32, viewbox.y0 as f32),
            cache,
        };
        list.replay(&mut device, &ctm);
    }

    // tiny-skia painted RGBA; the host contract is BGRx.
    for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        px.swap(0, 2);
    }

    Ok(())
}

/// Encode a rendered BGRx buffer as PNG bytes.
pub fn encode_png(width: u32, height: u32, bgrx: &[u8]) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if bgrx.len() != expected {
        return Err(BridgeError::PngEncoding(format!(
            "buffer is {} bytes, expected {}",
            bgrx.len(),
            expected
        )));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in bgrx.chunks_exact(BYTES_PER_PIXEL) {
        rgb.push(px[2]);
        rgb.push(px[1]);
        rgb.push(px[0]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(BufWriter::new(&mut out), width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| BridgeError::PngEncoding(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| BridgeError::PngEncoding(e.to_string()))?;
    }
    Ok(out)
}

/// Write a rendered BGRx buffer to a PNG file.
pub fn write_png<P: AsRef<Path>>(path: P, width: u32, height: u32, bgrx: &[u8]) -> Result<()> {
    let bytes = encode_png(width, height, bgrx)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_engine::PathSeg;

    fn unit_square_list() -> DisplayList {
        let mut list = DisplayList::new();
        let path = PathData::new(vec![
            PathSeg::MoveTo(0.0, 0.0),
            PathSeg::LineTo(1.0, 0.0),
            PathSeg::LineTo(1.0, 1.0),
            PathSeg::LineTo(0.0, 1.0),
            PathSeg::Close,
        ]);
        list.fill_path(&path, FillRule::NonZero, &Matrix::identity(), Color::BLACK);
        list
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let mut cache = RenderCache::new();
        let list = unit_square_list();
        let mut pixels = vec![0u8; 10];
        let err = render_into(
            &mut cache,
            &list,
            ViewBox::new(0, 0, 4, 4),
            Matrix::identity(),
            &mut pixels,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::ViewportMismatch { .. }));
    }

    #[test]
    fn inverted_viewbox_is_rejected() {
        let mut cache = RenderCache::new();
        let list = unit_square_list();
        let mut pixels = vec![0u8; 0];
        let err = render_into(
            &mut cache,
            &list,
            ViewBox::new(10, 10, 0, 0),
            Matrix::identity(),
            &mut pixels,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::ViewportMismatch { .. }));
    }

    #[test]
    fn extreme_viewbox_corners_are_rejected() {
        let mut cache = RenderCache::new();
        let list = unit_square_list();
        let mut pixels = vec![0u8; 4 * 4 * BYTES_PER_PIXEL];
        let err = render_into(
            &mut cache,
            &list,
            ViewBox::new(i32::MIN, 0, i32::MAX, 10),
            Matrix::identity(),
            &mut pixels,
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::ViewportMismatch { .. }));
    }

    #[test]
    fn empty_list_renders_all_white() {
        let mut cache = RenderCache::new();
        let list = DisplayList::new();
        let mut pixels = vec![0u8; 8 * 8 * BYTES_PER_PIXEL];
        render_into(
            &mut cache,
            &list,
            ViewBox::new(0, 0, 8, 8),
            Matrix::identity(),
            &mut pixels,
        )
        .expect("render");
        assert!(pixels.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn scaled_square_marks_pixels() {
        let mut cache = RenderCache::new();
        let list = unit_square_list();
        let mut pixels = vec![0u8; 16 * 16 * BYTES_PER_PIXEL];
        render_into(
            &mut cache,
            &list,
            ViewBox::new(0, 0, 16, 16),
            Matrix::scale(16.0),
            &mut pixels,
        )
        .expect("render");
        // center of the square must be solid black in BGRx
        let center = (8 * 16 + 8) * BYTES_PER_PIXEL;
        assert_eq!(&pixels[center..center + 3], &[0, 0, 0]);
    }

    #[test]
    fn viewbox_origin_offsets_output() {
        let mut cache = RenderCache::new();
        let list = unit_square_list();

        // Render the 16x16 device-space square through a viewport whose
        // origin starts at (8, 8): only the square's upper-right quadrant
        // lands in the 8x8 buffer.
        let mut pixels = vec![0u8; 8 * 8 * BYTES_PER_PIXEL];
        render_into(
            &mut cache,
            &list,
            ViewBox::new(8, 8, 16, 16),
            Matrix::scale(16.0),
            &mut pixels,
        )
        .expect("render");
        let first = 0;
        assert_eq!(&pixels[first..first + 3], &[0, 0, 0]);
    }

    #[test]
    fn png_encode_rejects_short_buffer() {
        let err = encode_png(4, 4, &[0u8; 7]).unwrap_err();
        assert!(matches!(err, BridgeError::PngEncoding(_)));
    }

    #[test]
    fn png_encode_round_trips_header() {
        let pixels = vec![0xffu8; 4 * 4 * BYTES_PER_PIXEL];
        let bytes = encode_png(4, 4, &pixels).expect("png");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
