#![forbid(unsafe_code)]

//! Procedural meadow generator for `meadow` (headless).
//!
//! Species are sampled once ([`PSpec::sample`]) and then grown into plants by recursive twig
//! expansion ([`make_plant`]). [`compose`] paints a whole picture as a sequence of independent
//! SVG frames: background, plants back to front, grass.
//!
//! All randomness flows through one explicitly passed [`meadow_core::Rng`], so a seed and a
//! config fully determine the output.

pub mod background;
pub mod compose;
pub mod config;
pub mod error;
pub mod flower;
pub mod painter;
pub mod plant;
pub mod species;

pub use background::{filter_defs, make_background, make_grass};
pub use compose::{Frame, FrameKind, compose};
pub use config::{MeadowConfig, Quality};
pub use error::{Error, Result};
pub use flower::{make_arrangement, make_flower, make_petal};
pub use painter::{GenerationStats, Painter};
pub use plant::{make_leaf, make_plant, make_twig};
pub use species::{
    BouquetParams, FlowerArrangement, GroundLeaves, PSpec, SpikeParams, TipAngle,
    symmetric_angles,
};
