//! Stems, branches and leaves.

use crate::error::Result;
use crate::flower::make_arrangement;
use crate::painter::Painter;
use crate::species::{PSpec, TipAngle, ground_leaf_angles};
use meadow_core::utils::deg_to_rad;
use meadow_core::{Point, PolyCurve3, ShellParams, make_shell};
use meadow_svg::Shape;
use std::f64::consts::{PI, TAU};

const LEAF_SHADE_FILTER: &str = "f1";

/// Branch points sampled along a parent twig, as fractions of its spine.
const BRANCH_STEPS: std::ops::Range<u32> = 3..9;

/// Emits one plant rooted at `origin`: every main stem with its branches, leaves and flowers,
/// then the ground leaves if the species has them.
pub fn make_plant(painter: &mut Painter<'_>, spec: &PSpec, origin: Point) -> Result<()> {
    for _ in 0..spec.num_stems {
        let a0 = painter
            .rng
            .next_int(-spec.stem_max_a0, spec.stem_max_a0 + 1);
        let scale = 0.7 + painter.rng.next_double() * 0.3;
        make_twig(
            painter,
            spec,
            scale,
            a0 as f64,
            origin,
            0,
            spec.branch_max_level,
        )?;
    }

    if let Some(ground) = spec.ground_leaves {
        let angles = ground_leaf_angles(&mut *painter.rng, ground.count);
        for angle in angles {
            let z = deg_to_rad(angle);
            let cos_z = z.cos();
            let a0 = cos_z * ground.max_a0 as f64;
            // Unused; drawn so the random sequence stays fixed.
            let _scale = 0.8 + 0.2 * painter.rng.next_double();
            let w_scale = 0.2 + 0.8 * z.sin();
            make_leaf(painter, spec, deg_to_rad(a0), origin, w_scale, cos_z)?;
        }
    }
    Ok(())
}

/// Emits one twig and, recursively, its branches.
///
/// `a0_deg` is the absolute base angle in degrees (0 = up). Children are spawned while
/// `level < max_level`; the flower arrangement goes on twigs at `max_level` only. The twig's
/// own path is added after its leaves and children so it paints over their bases.
pub fn make_twig(
    painter: &mut Painter<'_>,
    spec: &PSpec,
    scale: f64,
    a0_deg: f64,
    origin: Point,
    level: u32,
    max_level: u32,
) -> Result<()> {
    tracing::trace!(level, scale, a0_deg, "twig");
    painter.stats.twigs += 1;
    painter.stats.max_depth = painter.stats.max_depth.max(level + 1);

    let t2 = painter.rng.next_double() * 0.3 + 0.7;
    let rel = spec.branch_a1_rel;
    let a1_deg = a0_deg + painter.rng.next_int(-rel, rel + 1) as f64;
    let a2_deg = match spec.branch_tip {
        TipAngle::Relative(rel) => a1_deg + painter.rng.next_int(-rel, rel + 1) as f64,
        TipAngle::Absolute(abs) => painter.rng.next_int(-abs, abs + 1) as f64,
    };

    let [r1, r2, r3] = spec.stem_lengths;
    let shell = make_shell(&ShellParams {
        lengths: [r1 * scale, r2 * scale, r3 * scale],
        angles: [deg_to_rad(a0_deg), deg_to_rad(a1_deg), deg_to_rad(a2_deg)],
        origin,
        widths: [5.0 * scale * t2, 3.0 * scale * t2, 2.0 * scale * t2],
        smooth_top: false,
    });
    let spine = shell.spine;
    let gradient = painter.twig_gradient(spec);
    let twig_path = Shape::path(shell.outline.to_path())
        .with_stroke("black", 0.5)
        .with_fill(gradient);

    if spec.ground_leaves.is_none() {
        let dt = spec.leaf_density / scale;
        let mut t = if level == 0 { 0.2 } else { 0.1 };
        let mut phase = painter.rng.next_double() * PI;
        while t < 0.7 {
            let at = spine.eval(t);
            phase = (phase + 1.0) % TAU;
            let w_scale = phase.cos();
            let [lo, hi] = spec.leaf_angle;
            let lean = deg_to_rad(painter.rng.next_int(lo, hi) as f64);
            let dir = spine.heading(t) + phase.sin() * lean;
            make_leaf(painter, spec, dir, at, w_scale, 1.0)?;
            t += dt;
        }
    }

    if level < max_level {
        let mut side = 1.0;
        for step in BRANCH_STEPS {
            let t = step as f64 / 10.0;
            let at = spine.eval(t);
            let heading_deg = spine.heading(t).to_degrees();
            let [lo, hi] = spec.branch_a0;
            let a_child = heading_deg + painter.rng.next_int(lo, hi) as f64 * side;
            make_twig(
                painter,
                spec,
                scale * (1.0 - t),
                a_child,
                at,
                level + 1,
                max_level,
            )?;
            side = -side;
        }
    }

    painter.add(twig_path)?;

    if level == max_level {
        make_arrangement(painter, spec, a2_deg, spine.p3)?;
    }
    Ok(())
}

/// Emits one leaf: the base outline plus its clipped dark shade.
///
/// `angle_scale` scales how far the leaf may curl away from `dir` (ground leaves curl less
/// when seen edge-on).
pub fn make_leaf(
    painter: &mut Painter<'_>,
    spec: &PSpec,
    dir: f64,
    origin: Point,
    width_scale: f64,
    angle_scale: f64,
) -> Result<()> {
    painter.stats.leaves += 1;

    let rng = &mut *painter.rng;
    let dir1 = dir + PI / 6.0 * rng.next_double() * rng.pick_of([-1.0, 1.0]) * angle_scale;
    let dir2 = dir + PI / 3.0 * rng.next_double() * rng.pick_of([-1.0, 1.0]) * angle_scale;
    let [w0, w1, w2] = spec.leaf_widths;
    let shell = make_shell(&ShellParams {
        lengths: spec.leaf_lengths,
        angles: [dir, dir1, dir2],
        origin,
        widths: [w0 * width_scale, w1 * width_scale, w2 * width_scale],
        smooth_top: false,
    });

    let r1 = spec.leaf_lengths[0];
    let mut shade = shell.outline.clone();
    {
        let p = shade.points_mut();
        p[3].x += (rng.next_double() * 2.0 - 1.0) * r1 * 0.7;
        p[3].y += (0.8 + rng.next_double()) * r1 * 0.5;

        p[2].x += (rng.next_double() * 2.0 - 1.5) * r1 * 0.5;
        p[2].y += (0.8 + rng.next_double()) * r1 * 0.5;

        p[4].x += (rng.next_double() * 2.0 - 0.5) * r1 * 0.5;
        p[4].y += (0.8 + rng.next_double()) * r1 * 0.5;
    }

    paint_shaded(
        painter,
        &shell.outline,
        &spec.leaf_color,
        &shade,
        &spec.leaf_color_dark,
        LEAF_SHADE_FILTER,
    )
}

/// Adds `base` (filled, black outline) and `shade` (dark, clipped to `base`, blurred unless
/// the painter is in fast mode).
pub(crate) fn paint_shaded(
    painter: &mut Painter<'_>,
    base: &PolyCurve3,
    fill: &str,
    shade: &PolyCurve3,
    dark: &str,
    filter: &str,
) -> Result<()> {
    let base_id = painter.add(
        Shape::path(base.to_path())
            .with_fill(fill)
            .with_stroke("black", 0.5),
    )?;

    let mut shade_shape = Shape::path(shade.to_path()).with_fill(dark);
    if !painter.quality.is_fast() {
        shade_shape = shade_shape.with_filter(filter);
    }
    let shade_id = painter.add(shade_shape)?;
    painter.doc.scene_mut().set_clip(shade_id, Some(base_id))?;
    Ok(())
}
