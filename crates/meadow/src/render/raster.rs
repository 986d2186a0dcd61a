#![forbid(unsafe_code)]

//! Raster compositing of the frame stack.
//!
//! Frames are rasterized independently (in parallel when possible) and painted onto one canvas
//! strictly in submission order through a [`DrawQueue`].

use crate::{Frame, MeadowConfig};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Generate(#[from] meadow_flora::Error),
    #[error("nothing to composite")]
    NoFrames,
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color for JPG rendering")]
    JpegBackground,
    #[error("JPG rendering requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("frame ticket {0} is unknown or already completed")]
    UnknownTicket(usize),
    #[error("{outstanding} of {submitted} frames were never completed")]
    FramesOutstanding { outstanding: usize, submitted: usize },
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
    pub jpeg_quality: u8,
    /// Rasterizer threads; 0 uses the available parallelism.
    pub threads: usize,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
            threads: 0,
        }
    }
}

/// Position of a frame in the paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(usize);

impl Ticket {
    pub fn index(self) -> usize {
        self.0
    }
}

/// In-order painter for frames that finish rasterizing in any order.
///
/// Every [`submit`](Self::submit) reserves the next slot. A completed frame is painted as soon
/// as all earlier slots are painted; until then it is buffered.
pub struct DrawQueue {
    canvas: tiny_skia::Pixmap,
    submitted: usize,
    painted: usize,
    pending: BTreeMap<usize, tiny_skia::Pixmap>,
}

impl DrawQueue {
    pub fn new(width: u32, height: u32, background: Option<tiny_skia::Color>) -> Result<Self> {
        let mut canvas = tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc)?;
        if let Some(color) = background {
            canvas.fill(color);
        }
        Ok(Self {
            canvas,
            submitted: 0,
            painted: 0,
            pending: BTreeMap::new(),
        })
    }

    pub fn submit(&mut self) -> Ticket {
        let ticket = Ticket(self.submitted);
        self.submitted += 1;
        ticket
    }

    /// Hands over the raster for `ticket` and paints every frame that is now unblocked.
    /// Returns how many frames were painted by this call.
    pub fn complete(&mut self, ticket: Ticket, frame: tiny_skia::Pixmap) -> Result<usize> {
        let i = ticket.0;
        if i >= self.submitted || i < self.painted || self.pending.contains_key(&i) {
            return Err(RasterError::UnknownTicket(i));
        }
        self.pending.insert(i, frame);

        let mut count = 0;
        while let Some(frame) = self.pending.remove(&self.painted) {
            self.canvas.draw_pixmap(
                0,
                0,
                frame.as_ref(),
                &tiny_skia::PixmapPaint::default(),
                tiny_skia::Transform::identity(),
                None,
            );
            self.painted += 1;
            count += 1;
            tracing::debug!(painted = self.painted, total = self.submitted, "painted frame");
        }
        Ok(count)
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn painted(&self) -> usize {
        self.painted
    }

    pub fn canvas(&self) -> &tiny_skia::Pixmap {
        &self.canvas
    }

    /// Returns the canvas once every submitted frame is painted.
    pub fn finish(self) -> Result<tiny_skia::Pixmap> {
        if self.painted < self.submitted {
            return Err(RasterError::FramesOutstanding {
                outstanding: self.submitted - self.painted,
                submitted: self.submitted,
            });
        }
        Ok(self.canvas)
    }
}

fn parse_tree(svg: &str) -> Result<usvg::Tree> {
    usvg::Tree::from_str(svg, &usvg::Options::default()).map_err(|_| RasterError::SvgParse)
}

fn pixel_size(tree: &usvg::Tree, scale: f32) -> (u32, u32) {
    let size = tree.size();
    let w = (size.width() * scale).ceil().max(1.0) as u32;
    let h = (size.height() * scale).ceil().max(1.0) as u32;
    (w, h)
}

/// Rasterizes one self-contained SVG document onto a transparent pixmap of its own size.
pub fn svg_to_pixmap(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap> {
    let tree = parse_tree(svg)?;
    let (w, h) = pixel_size(&tree, scale);
    let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or(RasterError::PixmapAlloc)?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn worker_count(requested: usize, jobs: usize) -> usize {
    let available = if requested == 0 {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        requested
    };
    available.clamp(1, jobs.max(1))
}

/// Rasterizes `frames` on scoped worker threads and paints them in slice order. The canvas
/// takes the size of the first frame.
pub fn composite_frames<S>(frames: &[S], options: &RasterOptions) -> Result<tiny_skia::Pixmap>
where
    S: AsRef<str> + Sync,
{
    let first = frames.first().ok_or(RasterError::NoFrames)?;
    let (width, height) = pixel_size(&parse_tree(first.as_ref())?, options.scale);
    let background = match options.background.as_deref() {
        Some(bg) => Some(parse_tiny_skia_color(bg).ok_or(RasterError::JpegBackground)?),
        None => None,
    };

    let mut queue = DrawQueue::new(width, height, background)?;
    let tickets: Vec<Ticket> = frames.iter().map(|_| queue.submit()).collect();
    let workers = worker_count(options.threads, frames.len());
    tracing::debug!(frames = frames.len(), workers, width, height, "compositing");

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Result<tiny_skia::Pixmap>)>();
    std::thread::scope(|s| -> Result<()> {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            s.spawn(move || {
                loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    let Some(svg) = frames.get(i) else {
                        break;
                    };
                    if tx.send((i, svg_to_pixmap(svg.as_ref(), options.scale))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for (i, raster) in rx {
            queue.complete(tickets[i], raster?)?;
        }
        Ok(())
    })?;

    queue.finish()
}

fn frame_markup(frames: &[Frame]) -> Vec<&str> {
    frames.iter().map(|f| f.svg.as_str()).collect()
}

pub fn frames_to_png(frames: &[Frame], options: &RasterOptions) -> Result<Vec<u8>> {
    let canvas = composite_frames(&frame_markup(frames), options)?;
    canvas.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn frames_to_jpeg(frames: &[Frame], options: &RasterOptions) -> Result<Vec<u8>> {
    let bg = options.background.as_deref().unwrap_or("white");
    let Some(color) = parse_tiny_skia_color(bg) else {
        return Err(RasterError::JpegBackground);
    };
    if color.alpha() != 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }

    let options = RasterOptions {
        background: Some(bg.to_string()),
        ..options.clone()
    };
    let canvas = composite_frames(&frame_markup(frames), &options)?;
    let (w, h) = (canvas.width(), canvas.height());

    // The canvas starts opaque, so alpha is always 255 and premultiplication is a no-op.
    let rgba = canvas.data();
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }

    let mut out = Vec::new();
    let mut enc =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

/// Generates the picture for `config` and composites it to PNG.
pub fn render_png(config: &MeadowConfig, options: &RasterOptions) -> Result<Vec<u8>> {
    let frames = crate::generate(config)?;
    frames_to_png(&frames, options)
}

/// Generates the picture for `config` and composites it to JPG.
pub fn render_jpeg(config: &MeadowConfig, options: &RasterOptions) -> Result<Vec<u8>> {
    let frames = crate::generate(config)?;
    frames_to_jpeg(&frames, options)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        6 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}
