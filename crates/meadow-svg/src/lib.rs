#![forbid(unsafe_code)]

//! SVG scene graph for `meadow` (headless).
//!
//! Shapes, gradients and clip paths live in one [`Scene`] arena and refer to each other by id.
//! [`Document::to_svg`] collects the shared resources a tree uses and emits a self-contained
//! document with a deterministic `<defs>` section.

pub mod defs;
pub mod document;
pub mod error;
pub mod gradient;
pub mod scene;
pub mod shape;
mod util;

pub use defs::{Defs, collect_defs};
pub use document::Document;
pub use error::{Error, Result};
pub use gradient::{GradientId, LinearGradient, Stop};
pub use scene::{ClipId, ClipPath, Scene, Session};
pub use shape::{Paint, Shape, ShapeId, ShapeKind, Style, regular_polygon, striped_rect};
