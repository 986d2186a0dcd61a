use crate::gradient::GradientId;
use crate::scene::{ClipId, Scene};
use crate::util::{push_attr, push_num_attr};
use meadow_core::utils::fmt_num_into;
use meadow_core::{PathData, Point, point};
use rustc_hash::FxHashSet;
use std::fmt;

/// Index of a shape inside its owning [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u32);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(String),
    Gradient(GradientId),
}

impl From<&str> for Paint {
    fn from(value: &str) -> Self {
        Paint::Color(value.to_string())
    }
}

impl From<String> for Paint {
    fn from(value: String) -> Self {
        Paint::Color(value)
    }
}

impl From<GradientId> for Paint {
    fn from(value: GradientId) -> Self {
        Paint::Gradient(value)
    }
}

/// Presentation attributes shared by every shape variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub class: Option<String>,
    pub transform: String,
    pub fill: Option<Paint>,
    /// Filter id, serialized as `url(#id)`.
    pub filter: Option<String>,
    pub opacity: Option<f64>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f64>,
    pub clip: Option<ClipId>,
    /// Raw attribute text appended verbatim after the typed attributes.
    pub attr_extra: String,
}

impl Style {
    fn push_transform(&mut self, op: &str, args: &[f64]) {
        if !self.transform.is_empty() {
            self.transform.push(' ');
        }
        self.transform.push_str(op);
        self.transform.push('(');
        for (i, &v) in args.iter().enumerate() {
            if i > 0 {
                self.transform.push(' ');
            }
            fmt_num_into(&mut self.transform, v);
        }
        self.transform.push(')');
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_transform("translate", &[x, y]);
        self
    }

    /// Rotation in degrees, optionally about `(cx, cy)`.
    pub fn rotate(&mut self, deg: f64, center: Option<(f64, f64)>) -> &mut Self {
        match center {
            Some((cx, cy)) => self.push_transform("rotate", &[deg, cx, cy]),
            None => self.push_transform("rotate", &[deg]),
        }
        self
    }

    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_transform("scale", &[x, y]);
        self
    }

    /// Serializes `name` (if any) followed by every set attribute, each prefixed by a space.
    pub(crate) fn write_attrs(&self, out: &mut String, name: Option<&str>, scene: &Scene) {
        if let Some(name) = name {
            push_attr(out, "id", name);
        }
        if let Some(class) = &self.class {
            push_attr(out, "class", class);
        }
        if !self.transform.is_empty() {
            push_attr(out, "transform", &self.transform);
        }
        if let Some(fill) = &self.fill {
            push_attr(out, "fill", &paint_value(fill, scene));
        }
        if let Some(filter) = &self.filter {
            push_attr(out, "filter", &format!("url(#{filter})"));
        }
        if let Some(opacity) = self.opacity {
            push_num_attr(out, "fill-opacity", opacity);
        }
        if let Some(stroke) = &self.stroke {
            push_attr(out, "stroke", &paint_value(stroke, scene));
        }
        if let Some(width) = self.stroke_width {
            push_num_attr(out, "stroke-width", width);
        }
        if let (Some(opacity), Some(_)) = (self.opacity, &self.stroke) {
            push_num_attr(out, "stroke-opacity", opacity);
        }
        if let Some(clip) = self.clip.and_then(|c| scene.clip(c)) {
            push_attr(out, "clip-path", &format!("url(#{})", clip.name()));
        }
        if !self.attr_extra.is_empty() {
            if !self.attr_extra.starts_with(' ') {
                out.push(' ');
            }
            out.push_str(&self.attr_extra);
        }
    }
}

fn paint_value(paint: &Paint, scene: &Scene) -> String {
    match paint {
        Paint::Color(c) => c.clone(),
        Paint::Gradient(id) => match scene.gradient(*id) {
            Some(g) => format!("url(#{})", g.name()),
            None => "none".to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    /// Straight-edged polygon, closed unless `closed` is false.
    Polygon {
        points: Vec<Point>,
        closed: bool,
    },
    /// Disjoint segments drawn as one path.
    LineSegments(Vec<(Point, Point)>),
    Line {
        from: Point,
        to: Point,
        /// Marker id for `marker-end`.
        marker_end: Option<String>,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
    },
    Path(PathData),
    Group(Vec<ShapeId>),
    /// `<use>` of another shape in the same scene.
    Reference(ShapeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) name: String,
    pub style: Style,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            kind,
        }
    }

    pub fn group() -> Self {
        Self::new(ShapeKind::Group(Vec::new()))
    }

    pub fn path(data: PathData) -> Self {
        Self::new(ShapeKind::Path(data))
    }

    /// Identity name (`SHP<n>`); empty until the shape is added to a scene.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group(_))
    }

    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.style.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<Paint>, width: f64) -> Self {
        self.style.stroke = Some(stroke.into());
        self.style.stroke_width = Some(width);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.style.filter = Some(filter.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = Some(opacity);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.style.class = Some(class.into());
        self
    }
}

/// Serializes one shape subtree. With `with_id == false` the shape's own identity attribute
/// is left out (children keep theirs).
/// Writes `id` and its subtree. `with_id` applies to every node of the subtree, so a defs copy
/// never repeats a live id. A group that is already being written higher up the subtree is
/// skipped.
pub(crate) fn write_shape(scene: &Scene, id: ShapeId, with_id: bool, out: &mut String) {
    let mut open_groups = FxHashSet::default();
    write_node(scene, id, with_id, &mut open_groups, out);
}

fn write_node(
    scene: &Scene,
    id: ShapeId,
    with_id: bool,
    open_groups: &mut FxHashSet<ShapeId>,
    out: &mut String,
) {
    let Some(shape) = scene.shape(id) else {
        return;
    };
    let name = with_id.then_some(shape.name.as_str());
    let style = &shape.style;

    match &shape.kind {
        ShapeKind::Rect {
            x,
            y,
            width,
            height,
        } => {
            out.push_str("<rect");
            push_num_attr(out, "x", *x);
            push_num_attr(out, "y", *y);
            push_num_attr(out, "width", *width);
            push_num_attr(out, "height", *height);
            style.write_attrs(out, name, scene);
            out.push_str("/>");
        }
        ShapeKind::Ellipse { cx, cy, rx, ry } => {
            out.push_str("<ellipse");
            push_num_attr(out, "cx", *cx);
            push_num_attr(out, "cy", *cy);
            push_num_attr(out, "rx", *rx);
            push_num_attr(out, "ry", *ry);
            style.write_attrs(out, name, scene);
            out.push_str("/>");
        }
        ShapeKind::Circle { cx, cy, r } => {
            out.push_str("<circle");
            push_num_attr(out, "cx", *cx);
            push_num_attr(out, "cy", *cy);
            push_num_attr(out, "r", *r);
            style.write_attrs(out, name, scene);
            out.push_str("/>");
        }
        ShapeKind::Polygon { points, closed } => {
            // Nothing to draw; an empty polygon emits no element at all.
            let Some((&first, rest)) = points.split_first() else {
                return;
            };
            let mut d = PathData::new();
            d.move_to(first).poly_to(rest.iter().copied());
            if *closed {
                d.close();
            }
            write_path_element(out, &d, style, name, scene);
        }
        ShapeKind::LineSegments(segments) => {
            if segments.is_empty() {
                return;
            }
            let mut d = PathData::new();
            for &(a, b) in segments {
                d.move_to(a).line_to(b);
            }
            write_path_element(out, &d, style, name, scene);
        }
        ShapeKind::Line {
            from,
            to,
            marker_end,
        } => {
            out.push_str("<line");
            push_num_attr(out, "x1", from.x);
            push_num_attr(out, "y1", from.y);
            push_num_attr(out, "x2", to.x);
            push_num_attr(out, "y2", to.y);
            if let Some(marker) = marker_end {
                push_attr(out, "marker-end", &format!("url(#{marker})"));
            }
            style.write_attrs(out, name, scene);
            out.push_str("/>");
        }
        ShapeKind::Text { text, x, y } => {
            out.push_str("<text");
            push_num_attr(out, "x", *x);
            push_num_attr(out, "y", *y);
            style.write_attrs(out, name, scene);
            out.push('>');
            crate::util::escape_xml_into(out, text);
            out.push_str("</text>");
        }
        ShapeKind::Path(d) => write_path_element(out, d, style, name, scene),
        ShapeKind::Group(children) => {
            if !open_groups.insert(id) {
                tracing::warn!(group = %id, "group contains itself; skipping nested copy");
                return;
            }
            out.push_str("<g");
            style.write_attrs(out, name, scene);
            out.push_str(">\n");
            for &child in children {
                write_node(scene, child, with_id, open_groups, out);
                out.push('\n');
            }
            out.push_str("</g>");
            open_groups.remove(&id);
        }
        ShapeKind::Reference(target) => {
            out.push_str("<use");
            if let Some(target) = scene.shape(*target) {
                push_attr(out, "xlink:href", &format!("#{}", target.name));
            }
            style.write_attrs(out, name, scene);
            out.push_str("/>");
        }
    }
}

fn write_path_element(
    out: &mut String,
    d: &PathData,
    style: &Style,
    name: Option<&str>,
    scene: &Scene,
) {
    out.push_str("<path d=\"");
    d.write_d(out);
    out.push('"');
    style.write_attrs(out, name, scene);
    out.push_str("/>");
}

/// Regular `n`-gon centered on `(cx, cy)`; `rot_deg` rotates the first vertex (`-90` puts it
/// at the top).
pub fn regular_polygon(n: usize, cx: f64, cy: f64, r: f64, rot_deg: f64) -> Shape {
    let step = std::f64::consts::TAU / n.max(1) as f64;
    let alpha = meadow_core::utils::deg_to_rad(rot_deg);
    let points = (0..n)
        .map(|i| {
            let a = step * i as f64 + alpha;
            point(cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    Shape::new(ShapeKind::Polygon {
        points,
        closed: true,
    })
}

/// `n` equal stripes separated by gaps of `gap_frac` stripe widths, filling the rect.
/// Adds the stripes and their group to `scene` and returns the group.
#[allow(clippy::too_many_arguments)]
pub fn striped_rect(
    scene: &mut Scene,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    n: usize,
    gap_frac: f64,
    vertical: bool,
) -> ShapeId {
    let sum = n as f64 + n.saturating_sub(1) as f64 * gap_frac;
    let d = (1.0 + gap_frac) / sum;

    let stripes = (0..n)
        .map(|i| {
            let kind = if vertical {
                ShapeKind::Rect {
                    x: x + i as f64 * d * w,
                    y,
                    width: w / sum,
                    height: h,
                }
            } else {
                ShapeKind::Rect {
                    x,
                    y: y + i as f64 * d * h,
                    width: w,
                    height: h / sum,
                }
            };
            scene.add(Shape::new(kind))
        })
        .collect();
    scene.add(Shape::new(ShapeKind::Group(stripes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::LinearGradient;

    fn render(scene: &Scene, id: ShapeId) -> String {
        let mut s = String::new();
        write_shape(scene, id, true, &mut s);
        s
    }

    #[test]
    fn style_attribute_order_is_fixed() {
        let mut scene = Scene::new();
        let g = scene.add_gradient(LinearGradient::new(0.0, 0.0, 0.0, 1.0));
        let mut shape = Shape::new(ShapeKind::Circle {
            cx: 1.0,
            cy: 2.0,
            r: 3.0,
        })
        .with_class("c")
        .with_fill(g)
        .with_filter("f1")
        .with_opacity(0.5)
        .with_stroke("black", 0.5);
        shape.style.translate(1.0, 2.0).rotate(45.0, None);
        shape.style.attr_extra = "data-x=\"1\"".to_string();
        let id = scene.add(shape);

        assert_eq!(
            render(&scene, id),
            concat!(
                r#"<circle cx="1" cy="2" r="3" id="SHP1" class="c""#,
                r#" transform="translate(1 2) rotate(45)" fill="url(#LG1)" filter="url(#f1)""#,
                r#" fill-opacity="0.5" stroke="black" stroke-width="0.5" stroke-opacity="0.5""#,
                r#" data-x="1"/>"#
            )
        );
    }

    #[test]
    fn stroke_opacity_needs_both_opacity_and_stroke() {
        let mut scene = Scene::new();
        let id = scene.add(
            Shape::new(ShapeKind::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            })
            .with_opacity(0.7),
        );
        assert!(!render(&scene, id).contains("stroke-opacity"));
    }

    #[test]
    fn empty_polygon_and_segments_emit_nothing_but_empty_path_does() {
        let mut scene = Scene::new();
        let poly = scene.add(Shape::new(ShapeKind::Polygon {
            points: Vec::new(),
            closed: true,
        }));
        let segs = scene.add(Shape::new(ShapeKind::LineSegments(Vec::new())));
        let path = scene.add(Shape::path(PathData::new()));
        assert_eq!(render(&scene, poly), "");
        assert_eq!(render(&scene, segs), "");
        assert_eq!(render(&scene, path), r#"<path d="" id="SHP3"/>"#);
    }

    #[test]
    fn text_and_line_markup() {
        let mut scene = Scene::new();
        let t = scene.add(Shape::new(ShapeKind::Text {
            text: "a < b".to_string(),
            x: 1.0,
            y: 2.0,
        }));
        let l = scene.add(Shape::new(ShapeKind::Line {
            from: point(0.0, 0.0),
            to: point(1.0, 1.0),
            marker_end: Some("arrow".to_string()),
        }));
        assert_eq!(render(&scene, t), r#"<text x="1" y="2" id="SHP1">a &lt; b</text>"#);
        assert_eq!(
            render(&scene, l),
            r#"<line x1="0" y1="0" x2="1" y2="1" marker-end="url(#arrow)" id="SHP2"/>"#
        );
    }

    #[test]
    fn regular_polygon_starts_at_the_top() {
        let Shape {
            kind: ShapeKind::Polygon { points, closed },
            ..
        } = regular_polygon(4, 0.0, 0.0, 1.0, -90.0)
        else {
            panic!("expected polygon");
        };
        assert!(closed);
        assert_eq!(points.len(), 4);
        assert!(points[0].x.abs() < 1e-12 && (points[0].y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn striped_rect_spans_the_full_width() {
        let mut scene = Scene::new();
        let g = striped_rect(&mut scene, 0.0, 0.0, 100.0, 10.0, 3, 0.5, true);
        let Some(ShapeKind::Group(children)) = scene.shape(g).map(|s| &s.kind) else {
            panic!("expected group");
        };
        assert_eq!(children.len(), 3);
        let Some(ShapeKind::Rect { x, width, .. }) = scene.shape(children[2]).map(|s| &s.kind)
        else {
            panic!("expected rect");
        };
        assert!((x + width - 100.0).abs() < 1e-9);
    }
}
