use meadow::{FrameKind, MeadowConfig, generate, generate_frame};

fn config(seed: u64) -> MeadowConfig {
    MeadowConfig {
        width: 320.0,
        height: 240.0,
        seed: Some(seed),
        grass_blades: 24,
        ..MeadowConfig::default()
    }
}

#[test]
fn generate_is_seeded_by_config() {
    let a = generate(&config(12345)).unwrap();
    let b = generate(&config(12345)).unwrap();
    assert_eq!(
        a.iter().map(|f| f.svg.as_str()).collect::<Vec<_>>(),
        b.iter().map(|f| f.svg.as_str()).collect::<Vec<_>>()
    );
}

#[test]
fn generate_frame_picks_one_frame() {
    let all = generate(&config(3)).unwrap();
    let background = generate_frame(&config(3), 0).unwrap().unwrap();
    assert_eq!(background.kind, FrameKind::Background);
    assert_eq!(background.svg, all[0].svg);
    assert!(generate_frame(&config(3), all.len()).unwrap().is_none());
}

#[test]
fn frames_are_standalone_svg_documents() {
    for frame in generate(&config(77)).unwrap() {
        let xml = roxmltree::Document::parse(&frame.svg).unwrap();
        let root = xml.root_element();
        assert!(root.has_tag_name("svg"));
        assert_eq!(root.attribute("height"), Some("240"));
        assert_eq!(
            root.children().filter(|n| n.has_tag_name("defs")).count(),
            1
        );
    }
}

#[cfg(feature = "raster")]
mod raster {
    use super::config;
    use meadow::render::raster::{RasterOptions, render_jpeg, render_png};

    #[test]
    fn render_png_produces_png_signature() {
        let bytes = render_png(&config(5), &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn render_jpeg_produces_jpeg_signature() {
        let options = RasterOptions {
            scale: 0.5,
            threads: 1,
            ..RasterOptions::default()
        };
        let bytes = render_jpeg(&config(5), &options).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
    }
}
