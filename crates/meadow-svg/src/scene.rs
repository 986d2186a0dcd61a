//! Owning arena for shapes, gradients and clip paths.
//!
//! Every cross-link (group children, `<use>` targets, clip targets, gradient fills) is an id into
//! one `Scene`, so a shape can be shared by several parents without aliasing. Identity names are
//! handed out by the scene's [`Session`] when an item is added.

use crate::error::{Error, Result};
use crate::gradient::{GradientId, LinearGradient};
use crate::shape::{Shape, ShapeId, ShapeKind};
use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub(crate) u32);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip#{}", self.0)
    }
}

/// Clip container referencing exactly one target shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPath {
    name: String,
    target: ShapeId,
}

impl ClipPath {
    /// Identity name (`CC<n>`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> ShapeId {
        self.target
    }
}

/// Identity counters for one generation session. All counters start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    next_shape: u32,
    next_gradient: u32,
    next_clip: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            next_shape: 1,
            next_gradient: 1,
            next_clip: 1,
        }
    }
}

impl Session {
    fn shape_name(&mut self) -> String {
        let n = self.next_shape;
        self.next_shape += 1;
        format!("SHP{n}")
    }

    fn gradient_name(&mut self) -> String {
        let n = self.next_gradient;
        self.next_gradient += 1;
        format!("LG{n}")
    }

    fn clip_name(&mut self) -> String {
        let n = self.next_clip;
        self.next_clip += 1;
        format!("CC{n}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    gradients: Vec<LinearGradient>,
    clips: Vec<ClipPath>,
    session: Session,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every item and starts a fresh identity session. Old ids become dangling and
    /// resolve to nothing.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.gradients.clear();
        self.clips.clear();
        self.session = Session::default();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Adds a shape, assigning its identity name.
    pub fn add(&mut self, mut shape: Shape) -> ShapeId {
        shape.name = self.session.shape_name();
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        id
    }

    pub fn add_gradient(&mut self, mut gradient: LinearGradient) -> GradientId {
        gradient.name = self.session.gradient_name();
        let id = GradientId(self.gradients.len() as u32);
        self.gradients.push(gradient);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index())
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.index())
    }

    pub fn gradient(&self, id: GradientId) -> Option<&LinearGradient> {
        self.gradients.get(id.0 as usize)
    }

    pub fn clip(&self, id: ClipId) -> Option<&ClipPath> {
        self.clips.get(id.0 as usize)
    }

    /// Appends `child` to `group`'s children.
    pub fn push_child(&mut self, group: ShapeId, child: ShapeId) -> Result<()> {
        if self.shape(child).is_none() {
            return Err(Error::UnknownShape(child));
        }
        if self.reaches(child, group) {
            return Err(Error::Cycle { group, child });
        }
        let parent = self
            .shapes
            .get_mut(group.index())
            .ok_or(Error::UnknownShape(group))?;
        match &mut parent.kind {
            ShapeKind::Group(children) => {
                children.push(child);
                Ok(())
            }
            _ => Err(Error::NotAGroup(group)),
        }
    }

    /// Clips `shape` to `target` through a new clip container, replacing any prior clip.
    /// `None` removes the clip.
    pub fn set_clip(&mut self, shape: ShapeId, target: Option<ShapeId>) -> Result<Option<ClipId>> {
        if self.shape(shape).is_none() {
            return Err(Error::UnknownShape(shape));
        }
        let clip = match target {
            Some(target) => {
                if self.shape(target).is_none() {
                    return Err(Error::UnknownShape(target));
                }
                let id = ClipId(self.clips.len() as u32);
                let name = self.session.clip_name();
                self.clips.push(ClipPath { name, target });
                Some(id)
            }
            None => None,
        };
        if let Some(s) = self.shapes.get_mut(shape.index()) {
            s.style.clip = clip;
        }
        Ok(clip)
    }

    /// Whether `to` is `from` or lies inside `from`'s group tree.
    pub fn reaches(&self, from: ShapeId, to: ShapeId) -> bool {
        let mut seen = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(ShapeKind::Group(children)) = self.shape(id).map(|s| &s.kind) {
                stack.extend(children.iter().copied());
            }
        }
        false
    }

    /// Non-group shapes reachable from `target`, in pre-order. A non-group target yields
    /// itself.
    pub fn clip_leaves(&self, target: ShapeId) -> Vec<ShapeId> {
        let mut leaves = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_leaves(target, &mut seen, &mut leaves);
        leaves
    }

    fn collect_leaves(
        &self,
        id: ShapeId,
        seen: &mut FxHashSet<ShapeId>,
        leaves: &mut Vec<ShapeId>,
    ) {
        let Some(shape) = self.shape(id) else {
            return;
        };
        match &shape.kind {
            ShapeKind::Group(children) => {
                if !seen.insert(id) {
                    return;
                }
                for &child in children {
                    self.collect_leaves(child, seen, leaves);
                }
            }
            _ => leaves.push(id),
        }
    }
}
