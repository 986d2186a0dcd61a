//! Sky, clouds, ground gradient and the grass strip.

use crate::error::Result;
use crate::painter::Painter;
use meadow_core::{ShellParams, hsb_to_hex, make_shell, point};
use meadow_svg::{GradientId, LinearGradient, Shape, ShapeId, ShapeKind};
use std::f64::consts::PI;

/// Blur filters and the wispy-cloud gradient referenced by generated shapes. Blur radii scale
/// with the canvas height.
pub fn filter_defs(height: f64) -> String {
    let mut out = String::new();
    for (id, margin, extent_h, divisor) in [
        ("f1", 20, 140, 160.0),
        ("blur_2", 10, 120, 320.0),
        ("blur_20", 20, 170, 100.0),
    ] {
        let extent_w = 100 + 2 * margin;
        out.push_str(&format!(
            "<filter id=\"{id}\" x=\"-{margin}%\" y=\"-{margin}%\" width=\"{extent_w}%\" height=\"{extent_h}%\">\n\
             <feGaussianBlur in=\"SourceGraphic\" stdDeviation=\"{}\"/>\n\
             </filter>\n",
            meadow_core::utils::fmt_num(height / divisor)
        ));
    }
    out.push_str(
        "<radialGradient id=\"white_cloud\" cx=\"50%\" cy=\"50%\" r=\"50%\">\n\
         <stop offset=\"0%\" stop-color=\"white\"/>\n\
         <stop offset=\"100%\" stop-color=\"white\" stop-opacity=\"0\"/>\n\
         </radialGradient>",
    );
    out
}

/// Full-canvas sky/ground gradient plus one group of clouds.
pub fn make_background(painter: &mut Painter<'_>, width: f64, height: f64) -> Result<()> {
    let ground = hsb_to_hex(0.3, 1.0, 0.2);
    let sky = LinearGradient::new(0.0, 0.0, 0.0, 1.0)
        .with_stop(0.0, "skyblue")
        .with_stop(0.5, "skyblue")
        .with_stop(0.68, "blue")
        .with_stop(0.7, "green")
        .with_stop(0.86, ground.clone())
        .with_stop(0.96, ground)
        .with_stop(1.0, "darkgreen");
    let sky = painter.doc.scene_mut().add_gradient(sky);
    painter.add(
        Shape::new(ShapeKind::Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        })
        .with_fill(sky),
    )?;

    let shine = 0.1 + painter.rng.next_double() * 0.8;
    let cloud_gradient = LinearGradient::new(0.0, 0.0, 0.0, 1.0)
        .with_stop(0.0, "white")
        .with_stop(shine, "lightgrey")
        .with_stop(1.0, "grey");
    let cloud_gradient = painter.doc.scene_mut().add_gradient(cloud_gradient);

    let clouds = painter.add(Shape::group())?;

    let n_clouds = painter.rng.next_int(1, 10).max(0) as usize;
    let mut baselines = Vec::new();
    let mut i = 0;
    // The bound is re-drawn on every check.
    while i < painter.rng.next_int(1, 3) {
        baselines.push(height * (0.05 + painter.rng.next_double() * 0.35));
        i += 1;
    }

    if painter.rng.chance(0.7) {
        let tall = 1.0 + painter.rng.next_double() * 2.0;
        let yscale = painter.rng.pick_of([1.0, tall]);
        for _ in 0..n_clouds {
            let x = width * painter.rng.next_double();
            let y = painter.rng.pick(&baselines).copied().unwrap_or(height * 0.2);
            make_puffy_cloud(painter, clouds, cloud_gradient, x, y, yscale)?;
        }
        if let Some(group) = painter.doc.scene_mut().shape_mut(clouds) {
            group.style.filter = Some("blur_20".to_string());
        }
    } else {
        for _ in 0..n_clouds {
            let x = width * painter.rng.next_double();
            let y = painter.rng.pick(&baselines).copied().unwrap_or(height * 0.2);
            make_wispy_cloud(painter, clouds, x, y)?;
        }
    }
    Ok(())
}

/// A cloud growing up and to the right of `(x, y)`: a flat baseline of wide ellipses with a
/// bumpy top of smaller ones.
fn make_puffy_cloud(
    painter: &mut Painter<'_>,
    group: ShapeId,
    gradient: GradientId,
    x: f64,
    y: f64,
    yscale: f64,
) -> Result<()> {
    const WIDTH: f64 = 200.0;

    let dx = WIDTH / 20.0;
    for i in 0..20 {
        let rng = &mut *painter.rng;
        let cx = x + i as f64 * dx + rng.next_double() * 35.0;
        let cy = y + rng.next_double() * 15.0;
        let rx = 25.0 + rng.next_double() * 50.0;
        let ry = 5.0 * yscale + rng.next_double() * 5.0 * yscale;
        add_ellipse(painter, group, cx, cy, rx, ry, gradient)?;
    }

    let dx = WIDTH * 0.7 / 30.0;
    for i in 0..30 {
        let rng = &mut *painter.rng;
        let cx = x + WIDTH * 0.1 + i as f64 * dx + rng.next_double() * 35.0;
        let cy = y - 35.0 * yscale / 2.0 + rng.next_double() * 45.0 * yscale / 2.0;
        let rx = 5.0 + rng.next_double() * 50.0;
        let ry = 5.0 + rng.next_double() * 20.0 * yscale;
        add_ellipse(painter, group, cx, cy, rx, ry, gradient)?;
    }
    Ok(())
}

fn make_wispy_cloud(painter: &mut Painter<'_>, group: ShapeId, x: f64, y: f64) -> Result<()> {
    for i in 0..20 {
        let rng = &mut *painter.rng;
        let cx = x + i as f64 * 10.0 + rng.next_double() * 35.0;
        let cy = y + rng.next_double() * 15.0;
        let rx = 25.0 + rng.next_double() * 50.0;
        let ry = 5.0 + rng.next_double() * 5.0;
        let shape = Shape::new(ShapeKind::Ellipse { cx, cy, rx, ry }).with_fill("url(#white_cloud)");
        painter.doc.add_to(group, shape)?;
    }
    Ok(())
}

fn add_ellipse(
    painter: &mut Painter<'_>,
    group: ShapeId,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    fill: GradientId,
) -> Result<()> {
    painter
        .doc
        .add_to(group, Shape::new(ShapeKind::Ellipse { cx, cy, rx, ry }).with_fill(fill))?;
    Ok(())
}

/// `blades` thin grass shells standing on the bottom edge, one color, drawn at 70% opacity.
pub fn make_grass(painter: &mut Painter<'_>, width: f64, height: f64, blades: u32) -> Result<()> {
    let color = hsb_to_hex(0.3, 1.0, 0.25);
    let gw = width / f64::from(blades.max(1));
    let gl = height * 0.005;

    for i in 0..blades {
        let rng = &mut *painter.rng;
        let lengths = [
            gl * rng.range(1.0, 8.0),
            gl * rng.range(1.0, 8.0),
            gl * rng.range(1.0, 8.0),
        ];
        let a1 = rng.next_double() * PI / 6.0 * rng.pick_of([1.0, -1.0]);
        let a2 = rng.next_double() * PI / 6.0 * rng.pick_of([1.0, -1.0]);
        let shell = make_shell(&ShellParams {
            lengths,
            angles: [0.0, a1, a2],
            origin: point(gw * f64::from(i), height),
            widths: [gw * 1.2, gw * 0.6, gw * 0.5],
            smooth_top: false,
        });
        painter.add(Shape::path(shell.outline.to_path()).with_fill(color.as_str()))?;
    }

    painter.doc.root_style_mut()?.opacity = Some(0.7);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quality;
    use meadow_core::Rng;
    use meadow_svg::Document;

    #[test]
    fn filter_defs_scale_with_height() {
        let defs = filter_defs(800.0);
        assert!(defs.contains("<filter id=\"f1\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\">"));
        assert!(defs.contains("stdDeviation=\"5\""));
        assert!(defs.contains("stdDeviation=\"2.5\""));
        assert!(defs.contains("stdDeviation=\"8\""));
        assert!(defs.contains("<filter id=\"blur_20\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"170%\">"));
        assert!(defs.contains("id=\"white_cloud\""));
    }

    #[test]
    fn background_has_sky_rect_and_cloud_group() {
        let mut doc = Document::new(400.0, 300.0);
        let mut rng = Rng::new(5);
        {
            let mut painter = Painter::new(&mut doc, &mut rng, Quality::Fast);
            make_background(&mut painter, 400.0, 300.0).unwrap();
        }
        let svg = doc.to_svg();
        let xml = roxmltree::Document::parse(&svg).unwrap();
        let rect = xml.descendants().find(|n| n.has_tag_name("rect")).unwrap();
        assert_eq!(rect.attribute("width"), Some("400"));
        assert_eq!(rect.attribute("fill"), Some("url(#LG1)"));
        let ellipses = xml.descendants().filter(|n| n.has_tag_name("ellipse")).count();
        assert!(ellipses >= 20);
    }

    #[test]
    fn grass_emits_one_blade_per_column() {
        let mut doc = Document::new(300.0, 200.0);
        let mut rng = Rng::new(9);
        {
            let mut painter = Painter::new(&mut doc, &mut rng, Quality::Fast);
            make_grass(&mut painter, 300.0, 200.0, 30).unwrap();
        }
        let svg = doc.to_svg();
        assert_eq!(svg.matches("<path ").count(), 30);
        assert!(svg.contains("fill-opacity=\"0.7\""));
        assert!(!svg.contains("<linearGradient"));
    }
}
