//! Whole-picture frame sequence.
//!
//! A picture is painted as a stack of independent SVG frames: the background, one frame per
//! plant (back rows first), and the grass strip last. Every frame starts a fresh document
//! session, so each one is a self-contained document.

use crate::background::{filter_defs, make_background, make_grass};
use crate::config::{MeadowConfig, Quality};
use crate::error::Result;
use crate::painter::{GenerationStats, Painter};
use crate::plant::make_plant;
use crate::species::PSpec;
use meadow_core::{Rng, point};
use meadow_svg::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Background,
    Plant,
    Grass,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub kind: FrameKind,
    pub svg: String,
    pub stats: GenerationStats,
}

/// Height range of near-row plants, as fractions of the canvas height.
const NEAR_HEIGHT: (f64, f64) = (0.75, 0.25);
const FAR_HEIGHT: (f64, f64) = (0.3, 0.4);

fn sample_species(rng: &mut Rng, canvas_height: f64, (base, span): (f64, f64)) -> PSpec {
    let height = canvas_height * (base + rng.next_double() * span);
    PSpec::sample(rng, height)
}

struct Composer<'a> {
    doc: Document,
    rng: &'a mut Rng,
    quality: Quality,
    width: f64,
    height: f64,
    frames: Vec<Frame>,
}

impl Composer<'_> {
    fn frame(
        &mut self,
        kind: FrameKind,
        paint: impl FnOnce(&mut Painter<'_>) -> Result<()>,
    ) -> Result<()> {
        self.doc.reset();
        let stats = {
            let mut painter = Painter::new(&mut self.doc, self.rng, self.quality);
            paint(&mut painter)?;
            painter.stats()
        };
        self.frames.push(Frame {
            kind,
            svg: self.doc.to_svg(),
            stats,
        });
        Ok(())
    }

    /// One row of `count` plants in shuffled horizontal slots, stepping down from `base_y`.
    /// `species` is asked for a new species before each plant and may keep the current one
    /// by returning `None`.
    fn plant_row(
        &mut self,
        count: usize,
        base_y: f64,
        mut species: impl FnMut(usize, &mut Rng) -> Option<PSpec>,
    ) -> Result<()> {
        let dx = self.width / count as f64;
        let mut slots: Vec<usize> = (0..count).collect();
        self.rng.shuffle(&mut slots);

        let mut current: Option<PSpec> = None;
        for (i, &slot) in slots.iter().enumerate() {
            if let Some(spec) = species(i, &mut *self.rng) {
                current = Some(spec);
            }
            let Some(spec) = current.as_ref() else {
                continue;
            };
            let x = slot as f64 * dx + (1.0 + self.rng.next_double()) * dx / 2.0;
            let y = base_y + (i as f64 / count as f64) * self.height * 0.1;
            self.frame(FrameKind::Plant, |p| make_plant(p, spec, point(x, y)))?;
        }
        Ok(())
    }
}

/// Generates the full frame sequence for one picture.
pub fn compose(config: &MeadowConfig, rng: &mut Rng) -> Result<Vec<Frame>> {
    config.validate()?;
    let (width, height) = (config.width, config.height);

    let mut doc = Document::new(width, height);
    doc.defs_extra = Some(filter_defs(height));
    let mut c = Composer {
        doc,
        rng,
        quality: config.quality(),
        width,
        height,
        frames: Vec::new(),
    };

    c.frame(FrameKind::Background, |p| make_background(p, width, height))?;

    let count_scale = width / height * 2.0 / 3.0;
    let near = ((c.rng.next_int(7, 12) as f64 * count_scale).floor() as usize).max(1);
    let far = ((c.rng.next_int(15, 23) as f64 * count_scale).floor() as usize).max(1);
    tracing::debug!(near, far, "composing rows");

    if c.rng.chance(0.5) {
        // One species per row.
        let spec = sample_species(c.rng, height, NEAR_HEIGHT);
        let mut first = Some(spec);
        c.plant_row(near, height * 0.85, |_, _| first.take())?;

        let spec = sample_species(c.rng, height, FAR_HEIGHT);
        let mut first = Some(spec);
        c.plant_row(far, height * 0.9, |_, _| first.take())?;
    } else {
        // Mixed rows: a new species every few plants.
        c.plant_row(near, height * 0.85, |i, rng| {
            (i % 3 == 0).then(|| sample_species(rng, height, NEAR_HEIGHT))
        })?;
        c.plant_row(far, height * 0.9, |i, rng| {
            (i % 2 == 0).then(|| sample_species(rng, height, FAR_HEIGHT))
        })?;
    }

    let blades = config.grass_blades;
    c.frame(FrameKind::Grass, |p| make_grass(p, width, height, blades))?;

    tracing::debug!(frames = c.frames.len(), "picture composed");
    Ok(c.frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> MeadowConfig {
        MeadowConfig {
            width: 300.0,
            height: 200.0,
            seed: Some(seed),
            smooth: false,
            grass_blades: 20,
        }
    }

    #[test]
    fn frames_start_with_background_and_end_with_grass() {
        let config = small_config(4);
        let frames = compose(&config, &mut config.rng()).unwrap();
        assert!(frames.len() >= 4);
        assert_eq!(frames[0].kind, FrameKind::Background);
        assert_eq!(frames.last().map(|f| f.kind), Some(FrameKind::Grass));
        assert!(
            frames[1..frames.len() - 1]
                .iter()
                .all(|f| f.kind == FrameKind::Plant)
        );
    }

    #[test]
    fn every_frame_is_a_fresh_session() {
        let config = small_config(8);
        let frames = compose(&config, &mut config.rng()).unwrap();
        for frame in &frames {
            assert!(frame.svg.contains("<g id=\"SHP1\""));
            assert!(frame.svg.contains("<filter id=\"f1\""));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MeadowConfig {
            width: -1.0,
            ..MeadowConfig::default()
        };
        assert!(compose(&config, &mut Rng::new(1)).is_err());
    }
}
