//! Petals, flowers and flower arrangements.

use crate::error::Result;
use crate::painter::Painter;
use crate::plant::paint_shaded;
use crate::species::{FlowerArrangement, PSpec};
use meadow_core::utils::deg_to_rad;
use meadow_core::{CubicBezier, Point, ShellParams, make_shell};
use meadow_svg::Shape;
use std::f64::consts::PI;

const PETAL_SHADE_FILTER: &str = "blur_2";

/// Spike flower pairs are placed at `t = 0, 0.2, …, 1`.
const SPIKE_SAMPLES: u32 = 6;

/// Emits one petal pointing along `dir`.
///
/// `bend` curls the petal sideways (`-1..1` across the flower), `width_scale` narrows petals
/// seen edge-on, `flower_scale` shrinks the whole petal.
pub fn make_petal(
    painter: &mut Painter<'_>,
    spec: &PSpec,
    dir: f64,
    origin: Point,
    width_scale: f64,
    bend: f64,
    flower_scale: f64,
) -> Result<()> {
    painter.stats.petals += 1;

    let [l0, l1, l2] = spec.flower_lengths;
    let [w0, w1] = spec.flower_widths;
    let shell = make_shell(&ShellParams {
        lengths: [l0 * flower_scale, l1 * flower_scale, l2 * flower_scale],
        angles: [dir, dir - bend * PI / 6.0, dir - bend * PI / 2.0],
        origin,
        widths: [
            0.0,
            w0 * width_scale * flower_scale,
            w1 * width_scale * flower_scale,
        ],
        smooth_top: spec.flower_round,
    });

    let rng = &mut *painter.rng;
    let mut shade = shell.outline.clone();
    for p in shade.points_mut() {
        p.x += rng.next_double() * l0 * 0.5 * flower_scale;
        p.y += (0.5 + rng.next_double()) * l0 * flower_scale;
    }

    paint_shaded(
        painter,
        &shell.outline,
        &spec.flower_color,
        &shade,
        &spec.flower_color_dark,
        PETAL_SHADE_FILTER,
    )
}

/// Emits one flower: a petal per sampled petal angle, fanned around `dir`.
pub fn make_flower(
    painter: &mut Painter<'_>,
    spec: &PSpec,
    dir: f64,
    origin: Point,
    scale: f64,
) -> Result<()> {
    painter.stats.flowers += 1;
    for &angle in &spec.flower_petal_angles {
        make_petal(
            painter,
            spec,
            dir + angle,
            origin,
            angle.cos(),
            angle * 2.0 / spec.flower_spread,
            spec.flower_scale * scale,
        )?;
    }
    Ok(())
}

/// Emits the species' flower arrangement at a branch tip whose last segment points along
/// `tip_deg`.
pub fn make_arrangement(
    painter: &mut Painter<'_>,
    spec: &PSpec,
    tip_deg: f64,
    tip: Point,
) -> Result<()> {
    match spec.arrangement {
        FlowerArrangement::Simple => make_flower(painter, spec, deg_to_rad(tip_deg), tip, 1.0),
        FlowerArrangement::Spike => make_spike(painter, spec, tip_deg, tip),
        FlowerArrangement::Bouquet => make_bouquet(painter, spec, tip_deg, tip),
    }
}

fn make_spike(painter: &mut Painter<'_>, spec: &PSpec, tip_deg: f64, tip: Point) -> Result<()> {
    let r = spec.spike.segment;
    let a1 = tip_deg - 60.0 + painter.rng.next_double() * 120.0;
    let a2 = tip_deg - 60.0 + painter.rng.next_double() * 120.0;
    let spine = make_shell(&ShellParams {
        lengths: [r, r, r],
        angles: [deg_to_rad(tip_deg), deg_to_rad(a1), deg_to_rad(a2)],
        origin: tip,
        widths: [0.0; 3],
        smooth_top: false,
    })
    .spine;
    painter.add(stalk(&spine, spec.leaf_color.as_str()))?;

    let side = spec.spike.flower_angle;
    for i in 0..SPIKE_SAMPLES {
        let t = i as f64 * 0.2;
        let at = spine.eval(t);
        let heading = spine.heading(t);
        let scale = (1.0 - t) * 0.5 + 0.5;
        make_flower(painter, spec, heading + side, at, scale)?;
        make_flower(painter, spec, heading - side, at, scale)?;
    }
    Ok(())
}

fn make_bouquet(painter: &mut Painter<'_>, spec: &PSpec, tip_deg: f64, tip: Point) -> Result<()> {
    let bouquet = &spec.bouquet;
    let r = bouquet.segment;
    let stroke = if bouquet.hairy {
        &spec.flower_color
    } else {
        &spec.leaf_color_dark
    };

    for &angle in &bouquet.angles {
        let base = deg_to_rad(tip_deg) + angle;
        let end = base + deg_to_rad(-60.0 + painter.rng.next_double() * 120.0) * bouquet.curly;
        let middle = base + deg_to_rad(-60.0 + painter.rng.next_double() * 120.0) * bouquet.curly;
        let spine = make_shell(&ShellParams {
            lengths: [r, r, r],
            angles: [base, middle, end],
            origin: tip,
            widths: [0.0; 3],
            smooth_top: false,
        })
        .spine;
        painter.add(stalk(&spine, stroke.as_str()))?;

        if !bouquet.hairy {
            make_flower(painter, spec, end, spine.p3, 1.0)?;
        }
    }
    Ok(())
}

/// Unfilled 1px stroke along a spine.
fn stalk(spine: &CubicBezier, color: &str) -> Shape {
    Shape::path(spine.to_path())
        .with_stroke(color, 1.0)
        .with_fill("none")
}
