//! Species sampling.
//!
//! A [`PSpec`] is drawn once from the shared [`Rng`] and then only read. The draw order in
//! [`PSpec::sample`] is part of the output contract: changing it changes every picture for a
//! given seed.

use meadow_core::utils::deg_to_rad;
use meadow_core::{Rng, hsb_to_hex};
use meadow_svg::LinearGradient;
use serde::Serialize;
use std::f64::consts::PI;

/// Weights of a single stem against a clump of several.
const STEM_COUNT_WEIGHTS: [f64; 2] = [4.0, 1.0];

const ARRANGEMENTS: [FlowerArrangement; 3] = [
    FlowerArrangement::Simple,
    FlowerArrangement::Spike,
    FlowerArrangement::Bouquet,
];
const ARRANGEMENT_WEIGHTS: [f64; 3] = [4.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerArrangement {
    /// One flower at each branch tip.
    Simple,
    /// Pairs of flowers along a short spike.
    Spike,
    /// A fan of stalks from the tip, each ending in a flower unless hairy.
    Bouquet,
}

/// How the last segment of a branch is angled, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipAngle {
    /// Deviates from the branch's middle segment by up to this much.
    Relative(i32),
    /// Points within this much of straight up, whatever the branch does.
    Absolute(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundLeaves {
    pub count: u32,
    /// Maximum lean from vertical, in degrees.
    pub max_a0: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpikeParams {
    pub segment: f64,
    /// Angle between the spike and each flower, radians.
    pub flower_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BouquetParams {
    pub segment: f64,
    pub count: u32,
    pub spread: f64,
    /// Hairy bouquets draw only stalks, in the flower color.
    pub hairy: bool,
    /// 0 for straight stalks, up to 1 for curly ones.
    pub curly: f64,
    pub angles: Vec<f64>,
}

/// Every sampled parameter of one plant species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PSpec {
    /// Main stem segment lengths; branches scale these down.
    pub stem_lengths: [f64; 3],
    /// Spread of the main stems, degrees.
    pub stem_max_a0: i32,
    pub num_stems: u32,
    /// Range of the angle between a branch and its parent, degrees.
    pub branch_a0: [i32; 2],
    /// Maximum deviation of a branch's middle segment, degrees.
    pub branch_a1_rel: i32,
    pub branch_tip: TipAngle,
    pub branch_max_level: u32,

    /// Leaves growing straight from the ground instead of along the stems.
    pub ground_leaves: Option<GroundLeaves>,
    pub leaf_angle: [i32; 2],
    pub leaf_density: f64,
    pub leaf_color: String,
    pub leaf_color_dark: String,
    pub leaf_lengths: [f64; 3],
    /// Base, middle and tip width. The base is only non-zero for ground leaves.
    pub leaf_widths: [f64; 3],

    pub flower_color: String,
    pub flower_color_dark: String,
    pub flower_lengths: [f64; 3],
    pub flower_widths: [f64; 2],
    pub flower_round: bool,
    pub flower_spread: f64,
    pub flower_num_petals: u32,
    /// Emit the middle petal last (on top) instead of first.
    pub flower_petal_order: bool,
    pub flower_petal_angles: Vec<f64>,
    pub flower_scale: f64,
    pub arrangement: FlowerArrangement,
    pub spike: SpikeParams,
    pub bouquet: BouquetParams,
}

impl PSpec {
    /// Samples a species for plants about `height` pixels tall.
    pub fn sample(rng: &mut Rng, height: f64) -> Self {
        let h = height;
        let is_ground_leaf = rng.chance(0.25);

        let leaf_val = rng.next_double() * 0.4 + 0.3;
        let leaf_hue = 0.2 + rng.next_double() * 0.2;
        let leaf_color = hsb_to_hex(leaf_hue, 1.0, leaf_val);
        let leaf_color_dark = hsb_to_hex(leaf_hue, 1.0, leaf_val * 0.3);

        let (ground_leaves, leaf_lengths, leaf_widths) = if is_ground_leaf {
            let count = rng.next_int(6, 30) as u32;
            let max_a0 = rng.next_int(20, 80);
            let lengths = [
                rng.next_int(h * 0.04, h * 0.3) as f64,
                rng.next_int(h * 0.04, h * 0.3) as f64,
                rng.next_int(h * 0.04, h * 0.3) as f64,
            ];
            let widths = [
                rng.next_int(1, h / 60.0) as f64,
                rng.next_int(h / 100.0, h / 20.0) as f64,
                rng.next_int(h / 120.0, h / 10.0) as f64,
            ];
            (Some(GroundLeaves { count, max_a0 }), lengths, widths)
        } else {
            let lengths = [
                rng.next_int(h * 0.015, h * 0.1) as f64,
                rng.next_int(h * 0.015, h * 0.1) as f64,
                rng.next_int(h * 0.015, h * 0.1) as f64,
            ];
            let widths = [
                0.0,
                rng.next_int(h * 0.005, h * 0.035) as f64,
                rng.next_int(h * 0.005, h * 0.045) as f64,
            ];
            (None, lengths, widths)
        };
        let leaf_len: f64 = leaf_lengths.iter().sum();

        let m = rng.next_int(5, 60);
        let leaf_angle = [m, m + rng.next_int(0, 30)];
        let leaf_density = 0.03 + 0.03 * rng.next_double();

        let mut stem_lengths = [
            rng.next_int(h / 15.0, h / 3.0) as f64,
            rng.next_int(h / 15.0, h / 3.0) as f64,
            rng.next_int(h / 15.0, h / 3.0) as f64,
        ];
        let stem_len: f64 = stem_lengths.iter().sum();
        if stem_len < leaf_len * 1.2 {
            let k = leaf_len * 1.2 / stem_len;
            for r in &mut stem_lengths {
                *r *= k;
            }
        }

        let many = rng.next_int(3, 10) as u32;
        let num_stems = rng.pick_weighted_of([1, many], STEM_COUNT_WEIGHTS);
        let mut stem_max_a0 = rng.next_int(20, 60);

        let m = rng.next_int(5, 60);
        let branch_a0 = [m, m + rng.next_int(1, 60)];
        let mut branch_a1_rel = rng.next_int(10, 60);
        let branch_tip = if rng.chance(0.5) {
            TipAngle::Relative(rng.next_int(10, 60))
        } else {
            TipAngle::Absolute(rng.next_int(1, 60))
        };

        if num_stems == 1 {
            stem_max_a0 = rng.next_int(1, 5);
            branch_a1_rel = rng.next_int(0, 10);
        }

        let branch_max_level = 1 + u32::from(rng.chance(0.2));

        let flower_hue = loop {
            let hue = rng.next_double();
            if !(hue > 0.2 && hue < 0.4) {
                break hue;
            }
        };
        let (flower_sat, flower_val) = if rng.chance(0.2) {
            // Whitish.
            (rng.next_double() * 0.4, 0.8 + rng.next_double() * 0.2)
        } else {
            (rng.next_double() * 0.4 + 0.6, rng.next_double() * 0.2 + 0.8)
        };
        let flower_color = hsb_to_hex(flower_hue, flower_sat, flower_val);
        let flower_color_dark = hsb_to_hex(
            flower_hue,
            flower_sat,
            flower_val * (0.4 + rng.next_double() * 0.4),
        );

        let arrangement = rng.pick_weighted_of(ARRANGEMENTS, ARRANGEMENT_WEIGHTS);

        let spike = SpikeParams {
            segment: rng.next_int(h * 0.02, h * 0.04) as f64,
            flower_angle: deg_to_rad(rng.next_int(10, 120) as f64),
        };

        let segment = rng.next_int(h * 0.01, h * 0.02) as f64;
        let count = rng.next_int(5, 15) as u32;
        let spread = PI / 6.0 + rng.next_double() * PI / 2.0;
        let hairy = rng.chance(0.2);
        let curly = rng.next_double();
        let reverse = rng.chance(0.5);
        let bouquet = BouquetParams {
            segment,
            count,
            spread,
            hairy,
            curly,
            angles: symmetric_angles(count, spread, reverse),
        };

        let flower_lengths = [
            rng.next_int(2, 15) as f64,
            rng.next_int(2, 15) as f64,
            rng.next_int(2, 15) as f64,
        ];
        let flower_widths = [rng.next_int(2, 20) as f64, rng.next_int(2, 20) as f64];
        let flower_round = rng.chance(0.3);

        let mut flower_num_petals = rng.next_int(1, 8) as u32;
        if arrangement != FlowerArrangement::Simple {
            flower_num_petals = rng.next_int(1, 3) as u32;
        }

        let mut flower_spread = PI * (0.3 + 0.7 * rng.next_double());
        if flower_num_petals < 4 && flower_spread > PI / 2.0 {
            flower_spread /= 2.0;
        }

        let flower_petal_order = rng.chance(0.5);
        let flower_petal_angles =
            symmetric_angles(flower_num_petals, flower_spread, flower_petal_order);
        let flower_scale = if arrangement == FlowerArrangement::Simple {
            1.0
        } else {
            0.5
        };

        tracing::debug!(
            height = h,
            ground_leaf = is_ground_leaf,
            num_stems,
            branch_max_level,
            ?arrangement,
            petals = flower_num_petals,
            "sampled species"
        );

        PSpec {
            stem_lengths,
            stem_max_a0,
            num_stems,
            branch_a0,
            branch_a1_rel,
            branch_tip,
            branch_max_level,
            ground_leaves,
            leaf_angle,
            leaf_density,
            leaf_color,
            leaf_color_dark,
            leaf_lengths,
            leaf_widths,
            flower_color,
            flower_color_dark,
            flower_lengths,
            flower_widths,
            flower_round,
            flower_spread,
            flower_num_petals,
            flower_petal_order,
            flower_petal_angles,
            flower_scale,
            arrangement,
            spike,
            bouquet,
        }
    }

    /// Vertical stem gradient from the leaf color down to its dark shade.
    pub fn twig_gradient(&self) -> LinearGradient {
        LinearGradient::new(0.0, 0.0, 0.0, 1.0)
            .with_stop(0.0, self.leaf_color.clone())
            .with_stop(1.0, self.leaf_color_dark.clone())
    }
}

/// `n` angles spread symmetrically around 0 within `spread`: mirrored `(+a, -a)` pairs, plus a
/// trailing 0 for odd `n`. `reverse` flips the emission order.
pub fn symmetric_angles(n: u32, spread: f64, reverse: bool) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let half = n / 2;
    let da = spread / n as f64;
    let offset = if n % 2 == 1 { da } else { da / 2.0 };

    let mut angles = Vec::with_capacity(n as usize);
    for i in (0..half).rev() {
        let a = spread / 2.0 - i as f64 * da - offset;
        angles.push(a);
        angles.push(-a);
    }
    if n % 2 == 1 {
        angles.push(0.0);
    }
    if reverse {
        angles.reverse();
    }
    angles
}

/// `n` evenly spaced angles in degrees from a random offset, ordered by their sine so leaves
/// facing away are emitted first.
pub fn ground_leaf_angles(rng: &mut Rng, n: u32) -> Vec<f64> {
    let offset = rng.next_int(0, 30) as f64;
    let mut angles: Vec<f64> = (0..n)
        .map(|i| offset + i as f64 * 360.0 / n as f64)
        .collect();
    angles.sort_by(|a, b| deg_to_rad(*a).sin().total_cmp(&deg_to_rad(*b).sin()));
    angles
}
