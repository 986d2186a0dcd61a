//! Renderer-agnostic path op log.
//!
//! `PathData` never validates op order: a path may start with a `LineTo`, or stay empty and
//! still be serialized, since an empty path can be addressed as a clip or reference target
//! before it acquires geometry.

use crate::geom::Point;
use crate::utils::fmt_pair_into;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    /// Cubic segment from the current point: two control points, then the end point.
    CurveTo(Point, Point, Point),
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    ops: Vec<PathOp>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.ops.clear();
        self
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.ops.push(PathOp::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.ops.push(PathOp::LineTo(p));
        self
    }

    /// Appends one `LineTo` per point.
    pub fn poly_to(&mut self, points: impl IntoIterator<Item = Point>) -> &mut Self {
        self.ops.extend(points.into_iter().map(PathOp::LineTo));
        self
    }

    pub fn quad_to(&mut self, c: Point, end: Point) -> &mut Self {
        self.ops.push(PathOp::QuadTo(c, end));
        self
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.ops.push(PathOp::CurveTo(c1, c2, end));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.ops.push(PathOp::Close);
        self
    }

    /// Serializes to SVG path-data text (`M x y L x y C ... Z`).
    pub fn to_d_string(&self) -> String {
        let mut out = String::new();
        self.write_d(&mut out);
        out
    }

    pub fn write_d(&self, out: &mut String) {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match *op {
                PathOp::MoveTo(p) => {
                    out.push('M');
                    fmt_pair_into(out, p.x, p.y);
                }
                PathOp::LineTo(p) => {
                    out.push('L');
                    fmt_pair_into(out, p.x, p.y);
                }
                PathOp::QuadTo(c, p) => {
                    out.push('Q');
                    fmt_pair_into(out, c.x, c.y);
                    out.push(' ');
                    fmt_pair_into(out, p.x, p.y);
                }
                PathOp::CurveTo(c1, c2, p) => {
                    out.push('C');
                    fmt_pair_into(out, c1.x, c1.y);
                    out.push(' ');
                    fmt_pair_into(out, c2.x, c2.y);
                    out.push(' ');
                    fmt_pair_into(out, p.x, p.y);
                }
                PathOp::Close => out.push('Z'),
            }
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_d_string())
    }
}
