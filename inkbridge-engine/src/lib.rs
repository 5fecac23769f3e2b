//! # inkbridge-engine
//!
//! The content-engine seam of the inkbridge workspace.
//!
//! A content engine is the component that knows how to open a document,
//! walk its page tree, and interpret one page's content into drawing
//! operations sent to a [`Device`]. The bridge in the `inkbridge` crate
//! only ever talks to an engine through the small [`ContentEngine`]
//! primitive set defined here, so any engine binding that can answer
//! those primitives can sit behind the bridge.
//!
//! This crate also ships [`memdoc`], a concrete engine over a
//! JSON-encoded vector-document format. It is the engine the workspace
//! binds by default and the one the test suites fabricate fixtures for.

mod device;
mod engine;
mod geom;
pub mod memdoc;
mod ops;
mod outline;

pub use device::Device;
pub use engine::{ContentEngine, EngineError};
pub use geom::{Matrix, PageBounds, ViewBox};
pub use memdoc::{MemDocBuilder, MemDocEngine, MemDocument, MemPage, MemPageBuilder};
pub use ops::{Color, FillRule, PathData, PathSeg, StrokeStyle};
pub use outline::Outline;
