use crate::defs::{Defs, collect_defs};
use crate::error::{Error, Result};
use crate::scene::Scene;
use crate::shape::{Shape, ShapeId, Style, write_shape};
use crate::util::{push_attr, push_num_attr};

/// A canvas with a root group, serialized as one standalone `<svg>` document.
#[derive(Debug, Clone)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub id: Option<String>,
    /// Raw markup copied to the top of `<defs>` (filters, hand-written gradients).
    pub defs_extra: Option<String>,
    /// Raw attribute text for the `<svg>` element.
    pub attr_extra: Option<String>,
    scene: Scene,
    root: ShapeId,
}

impl Document {
    pub fn new(width: f64, height: f64) -> Self {
        let mut scene = Scene::new();
        let root = scene.add(Shape::group());
        Self {
            width,
            height,
            id: None,
            defs_extra: None,
            attr_extra: None,
            scene,
            root,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn root(&self) -> ShapeId {
        self.root
    }

    /// Adds `shape` to the scene and appends it to the root group.
    pub fn add(&mut self, shape: Shape) -> Result<ShapeId> {
        self.add_to(self.root, shape)
    }

    /// Adds `shape` to the scene and appends it to `parent`.
    pub fn add_to(&mut self, parent: ShapeId, shape: Shape) -> Result<ShapeId> {
        if !self.scene.shape(parent).is_some_and(Shape::is_group) {
            return Err(Error::NotAGroup(parent));
        }
        let id = self.scene.add(shape);
        self.scene.push_child(parent, id)?;
        Ok(id)
    }

    pub fn root_style_mut(&mut self) -> Result<&mut Style> {
        let root = self.root;
        self.scene
            .shape_mut(root)
            .map(|s| &mut s.style)
            .ok_or(Error::UnknownShape(root))
    }

    /// Starts a new generation session: every shape, gradient and clip is dropped, identity
    /// counters restart, and a fresh root group is created. Canvas settings are kept.
    pub fn reset(&mut self) {
        self.scene.clear();
        self.root = self.scene.add(Shape::group());
    }

    pub fn collect_defs(&self) -> Defs {
        let mut defs = Defs::default();
        collect_defs(&self.scene, self.root, &mut defs);
        defs
    }

    /// Serializes the whole document: `<defs>` (raw extras, gradients, shape-ref targets
    /// without their ids, clip paths) followed by the root group.
    pub fn to_svg(&self) -> String {
        let defs = self.collect_defs();
        tracing::trace!(
            shapes = self.scene.len(),
            gradients = defs.gradients.len(),
            shape_refs = defs.shape_refs.len(),
            clips = defs.clips.len(),
            "serializing document"
        );

        let mut out = String::with_capacity(256 + self.scene.len() * 160);
        out.push_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#,
        );
        push_num_attr(&mut out, "width", self.width);
        push_num_attr(&mut out, "height", self.height);
        if let Some(id) = &self.id {
            push_attr(&mut out, "id", id);
        }
        if let Some(extra) = self.attr_extra.as_deref().filter(|s| !s.is_empty()) {
            out.push(' ');
            out.push_str(extra);
        }
        out.push_str(">\n<defs>\n");

        if let Some(extra) = &self.defs_extra {
            out.push_str(extra);
            out.push('\n');
        }
        for gradient in defs.gradients.iter().filter_map(|&g| self.scene.gradient(g)) {
            gradient.write_svg(&mut out);
            out.push('\n');
        }
        for &target in &defs.shape_refs {
            write_shape(&self.scene, target, false, &mut out);
            out.push('\n');
        }
        out.push('\n');
        for clip in defs.clips.iter().filter_map(|&c| self.scene.clip(c)) {
            out.push_str("<clipPath");
            push_attr(&mut out, "id", clip.name());
            out.push_str(">\n");
            for leaf in self.scene.clip_leaves(clip.target()) {
                if let Some(shape) = self.scene.shape(leaf) {
                    out.push_str("<use");
                    push_attr(&mut out, "xlink:href", &format!("#{}", shape.name()));
                    out.push_str("/>");
                }
            }
            out.push_str("\n</clipPath>\n");
        }
        out.push_str("</defs>\n");

        write_shape(&self.scene, self.root, true, &mut out);
        out.push_str("\n</svg>");
        out
    }
}
