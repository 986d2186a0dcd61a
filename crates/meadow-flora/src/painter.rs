use crate::config::Quality;
use crate::error::Result;
use crate::species::PSpec;
use indexmap::IndexMap;
use meadow_core::Rng;
use meadow_svg::{Document, GradientId, Shape, ShapeId};

/// Counts of what one painter emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub twigs: usize,
    pub leaves: usize,
    pub petals: usize,
    pub flowers: usize,
    /// Deepest twig recursion reached, counting the main stem as depth 1.
    pub max_depth: u32,
}

/// Drawing context for one frame: the target document, the shared random source and the
/// quality setting.
///
/// The document must not be reset while a painter borrows it; gradient ids cached here belong
/// to the current session.
pub struct Painter<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) rng: &'a mut Rng,
    pub(crate) quality: Quality,
    twig_gradients: IndexMap<(String, String), GradientId>,
    pub(crate) stats: GenerationStats,
}

impl<'a> Painter<'a> {
    pub fn new(doc: &'a mut Document, rng: &'a mut Rng, quality: Quality) -> Self {
        Self {
            doc,
            rng,
            quality,
            twig_gradients: IndexMap::new(),
            stats: GenerationStats::default(),
        }
    }

    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    pub fn rng(&mut self) -> &mut Rng {
        self.rng
    }

    pub(crate) fn add(&mut self, shape: Shape) -> Result<ShapeId> {
        Ok(self.doc.add(shape)?)
    }

    /// The species' stem gradient, registered once per document session.
    pub(crate) fn twig_gradient(&mut self, spec: &PSpec) -> GradientId {
        let key = (spec.leaf_color.clone(), spec.leaf_color_dark.clone());
        if let Some(&id) = self.twig_gradients.get(&key) {
            return id;
        }
        let id = self.doc.scene_mut().add_gradient(spec.twig_gradient());
        self.twig_gradients.insert(key, id);
        id
    }
}
