#![forbid(unsafe_code)]

//! Geometry kernel and sampling primitives for `meadow` (headless).
//!
//! Design goals:
//! - deterministic output: identical seeds and call sequences yield identical geometry
//! - renderer-agnostic paths (`PathData`) that the SVG layer wraps as shapes
//! - no ambient state: the random source is always passed explicitly

pub mod color;
pub mod error;
pub mod geom;
pub mod path;
pub mod rng;
pub mod utils;

pub use color::{hsb_to_hex, hsb_to_rgb};
pub use error::{Error, Result};
pub use geom::{
    CubicBezier, HandleType, Point, PolyCurve3, PolyQuadLine, Shell, ShellParams, Vector,
    make_shell, point, vector,
};
pub use path::{PathData, PathOp};
pub use rng::Rng;
