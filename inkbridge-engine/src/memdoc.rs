//! In-memory vector-document codec.
//!
//! A minimal [`ContentEngine`] over a JSON document format:
//!
//! ```json
//! {
//!   "password": "secret",
//!   "outline": { "title": "root", "children": [] },
//!   "pages": [
//!     {
//!       "media_box": [0.0, 0.0, 612.0, 792.0],
//!       "content": [
//!         { "Fill": { "path": [ { "MoveTo": [10.0, 10.0] } ],
//!                     "color": { "r": 0, "g": 0, "b": 0, "a": 255 },
//!                     "rule": "NonZero" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `password` and `outline` are optional. The codec exists so the bridge
//! has a shippable engine behind the [`ContentEngine`] seam and so tests
//! can fabricate encrypted, multi-page, oddly-sized fixtures on disk; a
//! binding to a native document engine would implement the same trait.

use crate::device::Device;
use crate::engine::{ContentEngine, EngineError};
use crate::geom::{Matrix, PageBounds};
use crate::ops::{Color, FillRule, PathData, PathSeg, StrokeStyle};
use crate::outline::Outline;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// One drawing operation in a page's content stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ContentOp {
    Fill {
        path: Vec<PathSeg>,
        color: Color,
        #[serde(default)]
        rule: FillRule,
    },
    Stroke {
        path: Vec<PathSeg>,
        color: Color,
        width: f32,
    },
}

/// On-disk page record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PageFile {
    media_box: [f32; 4],
    #[serde(default)]
    content: Vec<ContentOp>,
}

/// On-disk document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocFile {
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    outline: Option<Outline>,
    pages: Vec<PageFile>,
}

/// Parsed document state: the codec's page tree.
#[derive(Debug)]
pub struct MemDocument {
    outline: Option<Outline>,
    pages: Vec<PageFile>,
}

/// One loaded page: bounds plus interpreted drawing operations.
///
/// Path identities are assigned at load time, so two loads of the same
/// page index yield independent path identities.
#[derive(Debug)]
pub struct MemPage {
    bounds: PageBounds,
    ops: Vec<LoadedOp>,
}

#[derive(Debug)]
enum LoadedOp {
    Fill {
        path: PathData,
        rule: FillRule,
        color: Color,
    },
    Stroke {
        path: PathData,
        stroke: StrokeStyle,
        color: Color,
    },
}

/// The JSON vector-document engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemDocEngine;

impl MemDocEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ContentEngine for MemDocEngine {
    type Document = MemDocument;
    type Page = MemPage;

    fn open(&self, path: &Path, password: &str) -> Result<MemDocument, EngineError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EngineError::Missing(path.display().to_string())
            } else {
                EngineError::Io(e)
            }
        })?;

        let file: DocFile = serde_json::from_slice(&bytes).map_err(|e| EngineError::Corrupt {
            reason: e.to_string(),
        })?;

        if let Some(expected) = &file.password {
            if password.is_empty() {
                return Err(EngineError::NeedsPassword);
            }
            if password != expected {
                return Err(EngineError::WrongPassword);
            }
        }

        debug!(
            "opened memdoc {} ({} pages)",
            path.display(),
            file.pages.len()
        );
        Ok(MemDocument {
            outline: file.outline,
            pages: file.pages,
        })
    }

    fn page_count(&self, doc: &MemDocument) -> usize {
        doc.pages.len()
    }

    fn load_page(&self, doc: &MemDocument, index: usize) -> Result<MemPage, EngineError> {
        let record = doc
            .pages
            .get(index)
            .ok_or_else(|| EngineError::PageOutOfRange {
                index,
                count: doc.pages.len(),
            })?;

        let [left, bottom, right, top] = record.media_box;
        let ops = record
            .content
            .iter()
            .map(|op| match op {
                ContentOp::Fill { path, color, rule } => LoadedOp::Fill {
                    path: PathData::new(path.clone()),
                    rule: *rule,
                    color: *color,
                },
                ContentOp::Stroke { path, color, width } => LoadedOp::Stroke {
                    path: PathData::new(path.clone()),
                    stroke: StrokeStyle::new(*width),
                    color: *color,
                },
            })
            .collect();

        Ok(MemPage {
            bounds: PageBounds::new(left, bottom, right, top),
            ops,
        })
    }

    fn page_bounds(&self, page: &MemPage) -> PageBounds {
        page.bounds
    }

    fn run_page(
        &self,
        _doc: &MemDocument,
        page: &MemPage,
        device: &mut dyn Device,
        ctm: Matrix,
    ) -> Result<(), EngineError> {
        for op in &page.ops {
            match op {
                LoadedOp::Fill { path, rule, color } => {
                    device.fill_path(path, *rule, &ctm, *color);
                }
                LoadedOp::Stroke {
                    path,
                    stroke,
                    color,
                } => {
                    device.stroke_path(path, stroke, &ctm, *color);
                }
            }
        }
        Ok(())
    }

    fn load_outline(&self, doc: &MemDocument) -> Option<Outline> {
        doc.outline.clone()
    }
}

/// Builder for fabricating memdoc files (fixtures, examples).
#[derive(Debug, Clone)]
pub struct MemDocBuilder {
    file: DocFile,
}

impl MemDocBuilder {
    /// Start an empty, unencrypted document.
    pub fn new() -> Self {
        Self {
            file: DocFile {
                password: None,
                outline: None,
                pages: Vec::new(),
            },
        }
    }

    /// Protect the document with a password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.file.password = Some(password.into());
        self
    }

    /// Attach an outline tree.
    pub fn outline(mut self, outline: Outline) -> Self {
        self.file.outline = Some(outline);
        self
    }

    /// Append a page.
    pub fn page(mut self, page: MemPageBuilder) -> Self {
        self.file.pages.push(page.record);
        self
    }

    /// Serialize to the on-disk JSON form.
    pub fn to_json(&self) -> String {
        // DocFile round-trips through serde without fallible state
        serde_json::to_string_pretty(&self.file).unwrap_or_default()
    }

    /// Write the document to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for MemDocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one page of a memdoc.
#[derive(Debug, Clone)]
pub struct MemPageBuilder {
    record: PageFile,
}

impl MemPageBuilder {
    /// Start a page with the given media box.
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            record: PageFile {
                media_box: [left, bottom, right, top],
                content: Vec::new(),
            },
        }
    }

    /// A US Letter page.
    pub fn letter() -> Self {
        Self::new(0.0, 0.0, 612.0, 792.0)
    }

    /// Fill an arbitrary path.
    pub fn fill(mut self, path: Vec<PathSeg>, color: Color) -> Self {
        self.record.content.push(ContentOp::Fill {
            path,
            color,
            rule: FillRule::NonZero,
        });
        self
    }

    /// Fill an axis-aligned rectangle.
    pub fn rect(self, x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        self.fill(
            vec![
                PathSeg::MoveTo(x, y),
                PathSeg::LineTo(x + w, y),
                PathSeg::LineTo(x + w, y + h),
                PathSeg::LineTo(x, y + h),
                PathSeg::Close,
            ],
            color,
        )
    }

    /// Stroke an arbitrary path.
    pub fn stroke(mut self, path: Vec<PathSeg>, width: f32, color: Color) -> Self {
        self.record
            .content
            .push(ContentOp::Stroke { path, color, width });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingDevice {
        fills: usize,
        strokes: usize,
    }

    impl Device for CountingDevice {
        fn fill_path(&mut self, _: &PathData, _: FillRule, _: &Matrix, _: Color) {
            self.fills += 1;
        }
        fn stroke_path(&mut self, _: &PathData, _: &StrokeStyle, _: &Matrix, _: Color) {
            self.strokes += 1;
        }
    }

    fn write_fixture(builder: &MemDocBuilder) -> tempfile::TempPath {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        builder.write_to(file.path()).expect("write fixture");
        file.into_temp_path()
    }

    #[test]
    fn open_and_count_pages() {
        let path = write_fixture(
            &MemDocBuilder::new()
                .page(MemPageBuilder::letter())
                .page(MemPageBuilder::new(0.0, 0.0, 300.0, 500.0)),
        );
        let engine = MemDocEngine::new();
        let doc = engine.open(path.as_ref(), "").expect("open");
        assert_eq!(engine.page_count(&doc), 2);
    }

    #[test]
    fn missing_file_is_missing() {
        let engine = MemDocEngine::new();
        let err = engine
            .open(Path::new("/nonexistent/fixture.json"), "")
            .unwrap_err();
        assert!(matches!(err, EngineError::Missing(_)));
    }

    #[test]
    fn garbage_is_corrupt() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), b"not json at all").expect("write");
        let engine = MemDocEngine::new();
        let err = engine.open(file.path(), "").unwrap_err();
        assert!(matches!(err, EngineError::Corrupt { .. }));
    }

    #[test]
    fn password_gate() {
        let path = write_fixture(
            &MemDocBuilder::new()
                .password("secret")
                .page(MemPageBuilder::letter()),
        );
        let engine = MemDocEngine::new();
        assert!(matches!(
            engine.open(path.as_ref(), "").unwrap_err(),
            EngineError::NeedsPassword
        ));
        assert!(matches!(
            engine.open(path.as_ref(), "nope").unwrap_err(),
            EngineError::WrongPassword
        ));
        assert!(engine.open(path.as_ref(), "secret").is_ok());
    }

    #[test]
    fn page_out_of_range() {
        let path = write_fixture(&MemDocBuilder::new().page(MemPageBuilder::letter()));
        let engine = MemDocEngine::new();
        let doc = engine.open(path.as_ref(), "").expect("open");
        let err = engine.load_page(&doc, 1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PageOutOfRange { index: 1, count: 1 }
        ));
    }

    #[test]
    fn run_page_forwards_every_op() {
        let path = write_fixture(
            &MemDocBuilder::new().page(
                MemPageBuilder::letter()
                    .rect(10.0, 10.0, 50.0, 50.0, Color::BLACK)
                    .rect(70.0, 10.0, 50.0, 50.0, Color::rgb(200, 0, 0))
                    .stroke(
                        vec![PathSeg::MoveTo(0.0, 0.0), PathSeg::LineTo(100.0, 100.0)],
                        2.0,
                        Color::BLACK,
                    ),
            ),
        );
        let engine = MemDocEngine::new();
        let doc = engine.open(path.as_ref(), "").expect("open");
        let page = engine.load_page(&doc, 0).expect("page");
        let mut device = CountingDevice {
            fills: 0,
            strokes: 0,
        };
        engine
            .run_page(&doc, &page, &mut device, Matrix::identity())
            .expect("run");
        assert_eq!(device.fills, 2);
        assert_eq!(device.strokes, 1);
    }

    #[test]
    fn outline_round_trip() {
        let path = write_fixture(
            &MemDocBuilder::new()
                .outline(Outline::new("Contents", None).with_child(Outline::new("Ch 1", Some(0))))
                .page(MemPageBuilder::letter()),
        );
        let engine = MemDocEngine::new();
        let doc = engine.open(path.as_ref(), "").expect("open");
        let outline = engine.load_outline(&doc).expect("outline");
        assert_eq!(outline.title, "Contents");
        assert_eq!(outline.len(), 2);
    }

    #[test]
    fn media_box_preserved() {
        let path = write_fixture(&MemDocBuilder::new().page(MemPageBuilder::new(
            5.0, 10.0, 305.0, 510.0,
        )));
        let engine = MemDocEngine::new();
        let doc = engine.open(path.as_ref(), "").expect("open");
        let page = engine.load_page(&doc, 0).expect("page");
        assert_eq!(
            engine.page_bounds(&page).to_array(),
            [5.0, 10.0, 305.0, 510.0]
        );
    }
}
