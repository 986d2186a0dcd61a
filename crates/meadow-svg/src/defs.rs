//! Shared-resource collection over a scene subtree.

use crate::gradient::GradientId;
use crate::scene::{ClipId, Scene};
use crate::shape::{Paint, ShapeId, ShapeKind};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;

/// Everything a subtree references that must be declared in `<defs>`, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defs {
    pub gradients: IndexSet<GradientId>,
    /// Targets of `<use>` elements and flattened clip leaves.
    pub shape_refs: IndexSet<ShapeId>,
    pub clips: IndexSet<ClipId>,
}

impl Defs {
    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty() && self.shape_refs.is_empty() && self.clips.is_empty()
    }
}

/// Walks `root` and records its gradients, clips and shape references into `defs`.
///
/// Shape-ref targets are walked too, so a gradient only used by a referenced shape still gets
/// declared. Insertion is keyed by id, so re-running over the same tree changes nothing.
pub fn collect_defs(scene: &Scene, root: ShapeId, defs: &mut Defs) {
    let mut visited = FxHashSet::default();
    visit(scene, root, defs, &mut visited);
}

fn visit(scene: &Scene, id: ShapeId, defs: &mut Defs, visited: &mut FxHashSet<ShapeId>) {
    if !visited.insert(id) {
        return;
    }
    let Some(shape) = scene.shape(id) else {
        return;
    };
    let style = &shape.style;

    if let Some((clip_id, clip)) = style.clip.and_then(|c| scene.clip(c).map(|clip| (c, clip))) {
        defs.clips.insert(clip_id);
        for leaf in scene.clip_leaves(clip.target()) {
            add_shape_ref(scene, leaf, defs, visited);
        }
    }

    for paint in [&style.fill, &style.stroke].into_iter().flatten() {
        if let Paint::Gradient(g) = paint {
            defs.gradients.insert(*g);
        }
    }

    match &shape.kind {
        ShapeKind::Group(children) => {
            for &child in children {
                visit(scene, child, defs, visited);
            }
        }
        ShapeKind::Reference(target) => add_shape_ref(scene, *target, defs, visited),
        ShapeKind::Rect { .. }
        | ShapeKind::Ellipse { .. }
        | ShapeKind::Circle { .. }
        | ShapeKind::Polygon { .. }
        | ShapeKind::LineSegments(_)
        | ShapeKind::Line { .. }
        | ShapeKind::Text { .. }
        | ShapeKind::Path(_) => {}
    }
}

fn add_shape_ref(
    scene: &Scene,
    target: ShapeId,
    defs: &mut Defs,
    visited: &mut FxHashSet<ShapeId>,
) {
    if scene.shape(target).is_none() {
        return;
    }
    defs.shape_refs.insert(target);
    visit(scene, target, defs, visited);
}
