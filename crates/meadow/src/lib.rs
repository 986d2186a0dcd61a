#![forbid(unsafe_code)]

//! `meadow` paints seeded, procedurally generated meadows: sky and clouds, rows of sampled plant
//! species, and a grass strip, each as a self-contained SVG frame.
//!
//! # Features
//!
//! - `raster`: composite the frame stack into PNG/JPG via pure-Rust SVG rasterization
//!   (`meadow::render::raster`)

pub use meadow_core;
pub use meadow_flora::*;
pub use meadow_svg;

/// Generates the frames for `config`, seeding from `config.seed` (or process entropy).
pub fn generate(config: &MeadowConfig) -> Result<Vec<Frame>> {
    tracing::debug!(
        width = config.width,
        height = config.height,
        seed = ?config.seed,
        quality = ?config.quality(),
        "generating picture"
    );
    let mut rng = config.rng();
    compose(config, &mut rng)
}

/// Generates the frames and returns the one at `index`, if the picture has that many.
pub fn generate_frame(config: &MeadowConfig, index: usize) -> Result<Option<Frame>> {
    let mut frames = generate(config)?;
    if index >= frames.len() {
        return Ok(None);
    }
    Ok(Some(frames.swap_remove(index)))
}

#[cfg(feature = "raster")]
pub mod render {
    pub mod raster;
}
