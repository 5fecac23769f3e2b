//! Fabricate a small document, render its first page, write a PNG.
//!
//! Run with: `cargo run --example render_to_png`

use inkbridge::{Bridge, ViewBox};
use inkbridge_engine::{Color, Matrix, MemDocBuilder, MemDocEngine, MemPageBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir();
    let fixture = dir.join("inkbridge_example.json");

    MemDocBuilder::new()
        .page(
            MemPageBuilder::letter()
                .rect(72.0, 72.0, 468.0, 648.0, Color::rgb(230, 230, 230))
                .rect(100.0, 560.0, 200.0, 40.0, Color::rgb(30, 30, 120))
                .rect(100.0, 480.0, 412.0, 8.0, Color::BLACK),
        )
        .write_to(&fixture)?;

    let mut bridge = Bridge::new(MemDocEngine::new());
    let doc = bridge.open_document(&fixture, "")?;
    let page = bridge.open_page(doc, 0)?;
    let bounds = bridge.media_box(page)?;
    println!(
        "document has {} page(s); page 0 is {}x{} units",
        bridge.page_count(doc)?,
        bounds.width(),
        bounds.height()
    );

    let scale = 400.0 / bounds.width();
    let viewbox = ViewBox::new(0, 0, 400, (bounds.height() * scale) as i32);
    let mut pixels = vec![0u8; viewbox.pixel_count() * inkbridge::BYTES_PER_PIXEL];
    bridge.render_page(doc, page, viewbox, Matrix::scale(scale), &mut pixels)?;

    let out = dir.join("inkbridge_example.png");
    inkbridge::write_png(
        &out,
        viewbox.width() as u32,
        viewbox.height() as u32,
        &pixels,
    )?;
    println!("wrote {}", out.display());

    bridge.free_page(page);
    bridge.free_document(doc);
    Ok(())
}
