use meadow_core::{Point, Rng, point};
use meadow_flora::{
    FlowerArrangement, FrameKind, GenerationStats, MeadowConfig, PSpec, Painter, Quality,
    compose, make_plant, symmetric_angles,
};
use meadow_svg::Document;
use proptest::prelude::*;

fn single_stem_spec(seed: u64, max_level: u32) -> PSpec {
    let mut spec = PSpec::sample(&mut Rng::new(seed), 600.0);
    spec.num_stems = 1;
    spec.branch_max_level = max_level;
    spec.arrangement = FlowerArrangement::Simple;
    spec.ground_leaves = None;
    spec.leaf_widths[0] = 0.0;
    spec
}

fn paint(spec: &PSpec, seed: u64, quality: Quality) -> (String, GenerationStats) {
    paint_at(spec, seed, quality, point(400.0, 550.0))
}

fn paint_at(spec: &PSpec, seed: u64, quality: Quality, origin: Point) -> (String, GenerationStats) {
    let mut doc = Document::new(800.0, 600.0);
    let mut rng = Rng::new(seed);
    let stats = {
        let mut painter = Painter::new(&mut doc, &mut rng, quality);
        make_plant(&mut painter, spec, origin).unwrap();
        painter.stats()
    };
    (doc.to_svg(), stats)
}

fn count_tags(node: roxmltree::Node<'_, '_>, tag: &str) -> usize {
    node.descendants().filter(|n| n.has_tag_name(tag)).count()
}

#[test]
fn recursion_depth_matches_max_level() {
    for max_level in [1, 2] {
        let spec = single_stem_spec(99, max_level);
        let (_, stats) = paint(&spec, 1, Quality::Fast);
        assert_eq!(stats.max_depth, max_level + 1);
        // Six branches per expanded twig.
        let expected_twigs = (0..=max_level).map(|l| 6usize.pow(l)).sum::<usize>();
        assert_eq!(stats.twigs, expected_twigs);
    }
}

#[test]
fn single_stem_scenario_emits_expected_structure() {
    let spec = single_stem_spec(12345, 1);
    let (svg, stats) = paint(&spec, 12345, Quality::Fast);
    let xml = roxmltree::Document::parse(&svg).unwrap();

    // One flower per twig at the deepest level.
    assert_eq!(stats.flowers, 6);
    assert_eq!(stats.petals, stats.flowers * spec.flower_num_petals as usize);

    let defs = xml
        .descendants()
        .find(|n| n.has_tag_name("defs"))
        .unwrap();
    assert_eq!(count_tags(defs, "linearGradient"), 1);
    assert_eq!(count_tags(defs, "clipPath"), stats.leaves + stats.petals);

    let root = xml
        .root_element()
        .children()
        .find(|n| n.has_tag_name("g"))
        .unwrap();
    assert_eq!(root.attribute("id"), Some("SHP1"));
    assert_eq!(
        count_tags(root, "path"),
        stats.twigs + 2 * (stats.leaves + stats.petals)
    );

    // Fast quality never references the shade filters.
    assert!(!svg.contains("url(#f1)"));
    assert!(!svg.contains("url(#blur_2)"));
}

#[test]
fn seed_12345_single_stem_plant_at_100_100() {
    let spec = single_stem_spec(12345, 1);
    let (svg, stats) = paint_at(&spec, 12345, Quality::Fast, point(100.0, 100.0));
    let (again, _) = paint_at(&spec, 12345, Quality::Fast, point(100.0, 100.0));
    assert_eq!(svg, again);

    assert_eq!(stats.twigs, 7);
    assert_eq!(stats.max_depth, 2);
    assert_eq!(stats.flowers, 6);
    assert_eq!(stats.leaves, 42);
    assert_eq!(stats.petals, 12);

    let xml = roxmltree::Document::parse(&svg).unwrap();
    let defs = xml
        .descendants()
        .find(|n| n.has_tag_name("defs"))
        .unwrap();
    assert_eq!(count_tags(defs, "linearGradient"), 1);
    assert_eq!(count_tags(defs, "clipPath"), 54);

    let root = xml
        .root_element()
        .children()
        .find(|n| n.has_tag_name("g"))
        .unwrap();
    let twig_paths = root
        .descendants()
        .filter(|n| n.has_tag_name("path") && n.attribute("fill") == Some("url(#LG1)"))
        .count();
    assert_eq!(twig_paths, 7);
}

#[test]
fn smooth_quality_blurs_shades() {
    let spec = single_stem_spec(12345, 1);
    let (svg, stats) = paint(&spec, 12345, Quality::Smooth);
    assert!(stats.leaves > 0);
    assert_eq!(svg.matches("filter=\"url(#f1)\"").count(), stats.leaves);
    assert_eq!(svg.matches("filter=\"url(#blur_2)\"").count(), stats.petals);
}

#[test]
fn clip_paths_point_at_emitted_shapes() {
    let spec = single_stem_spec(5, 1);
    let (svg, _) = paint(&spec, 5, Quality::Fast);
    let xml = roxmltree::Document::parse(&svg).unwrap();
    let ids: std::collections::HashSet<&str> = xml
        .descendants()
        .filter_map(|n| n.attribute("id"))
        .collect();
    for clip in xml.descendants().filter(|n| n.has_tag_name("clipPath")) {
        let target = clip
            .children()
            .find(|n| n.has_tag_name("use"))
            .and_then(|u| u.attribute(("http://www.w3.org/1999/xlink", "href")))
            .unwrap();
        assert!(ids.contains(target.trim_start_matches('#')), "{target}");
    }
}

#[test]
fn composition_is_deterministic_per_seed() {
    let config = MeadowConfig {
        width: 400.0,
        height: 300.0,
        seed: Some(2024),
        grass_blades: 40,
        ..MeadowConfig::default()
    };
    let a = compose(&config, &mut config.rng()).unwrap();
    let b = compose(&config, &mut config.rng()).unwrap();
    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.iter().zip(&b) {
        assert_eq!(fa.kind, fb.kind);
        assert_eq!(fa.svg, fb.svg);
    }

    let other = MeadowConfig {
        seed: Some(2025),
        ..config
    };
    let c = compose(&other, &mut other.rng()).unwrap();
    assert_ne!(
        a.iter().map(|f| &f.svg).collect::<Vec<_>>(),
        c.iter().map(|f| &f.svg).collect::<Vec<_>>()
    );
}

#[test]
fn every_frame_parses_as_xml() {
    let config = MeadowConfig {
        width: 300.0,
        height: 300.0,
        seed: Some(31),
        smooth: true,
        grass_blades: 10,
    };
    let frames = compose(&config, &mut config.rng()).unwrap();
    let plants = frames.iter().filter(|f| f.kind == FrameKind::Plant).count();
    assert!(plants >= 2);
    for frame in &frames {
        let xml = roxmltree::Document::parse(&frame.svg).unwrap();
        assert_eq!(xml.root_element().attribute("width"), Some("300"));
    }
}

proptest! {
    #[test]
    fn symmetric_angles_are_mirrored_and_bounded(
        n in 0u32..40,
        spread in 0.01f64..6.0,
        reverse in any::<bool>(),
    ) {
        let angles = symmetric_angles(n, spread, reverse);
        prop_assert_eq!(angles.len(), n as usize);
        for &a in &angles {
            prop_assert!(a.abs() <= spread / 2.0 + 1e-12);
            prop_assert!(angles.iter().any(|&b| (a + b).abs() < 1e-12));
        }
        let zeros = angles.iter().filter(|a| **a == 0.0).count();
        prop_assert_eq!(zeros, (n % 2) as usize);
    }
}
