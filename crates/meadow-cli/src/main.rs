use meadow::meadow_core::Rng;
use meadow::render::raster::{RasterError, RasterOptions, frames_to_jpeg, frames_to_png};
use meadow::{MeadowConfig, PSpec};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Meadow(meadow::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    NoSuchFrame { index: usize, frames: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Meadow(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoSuchFrame { index, frames } => {
                write!(f, "frame {index} out of range (picture has {frames} frames)")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<meadow::Error> for CliError {
    fn from(value: meadow::Error) -> Self {
        Self::Meadow(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Species,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    config: Option<String>,
    seed: Option<u64>,
    width: Option<f64>,
    height: Option<f64>,
    smooth: bool,
    grass: Option<u32>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    threads: usize,
    frame: Option<usize>,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "meadow-cli\n\
\n\
USAGE:\n\
  meadow-cli [render] [--config <file.json>] [--seed <n>] [--width <w>] [--height <h>] [--smooth] [--grass <n>] [--format svg|png|jpg] [--scale <n>] [--background <css-color>] [--threads <n>] [--frame <i>] [--out <path>]\n\
  meadow-cli species [--seed <n>] [--height <h>] [--pretty]\n\
\n\
NOTES:\n\
  - Flags override values from --config; a missing seed is drawn from process entropy.\n\
  - SVG: --frame <i> prints one frame to stdout (or --out <file>); without --frame, --out names\n\
    a directory that receives every frame as frame-NNN.svg.\n\
  - PNG/JPG composite all frames; output defaults to ./out.png or ./out.jpg, '-' for stdout.\n\
  - species prints the sampled plant species as JSON.\n\
  - Set RUST_LOG (e.g. RUST_LOG=meadow_flora=debug) for diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or(CliError::Usage(usage()))
}

fn parse_value<T: FromStr>(raw: &str) -> Result<T, CliError> {
    raw.trim().parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "species" => args.command = Command::Species,
            "--smooth" => args.smooth = true,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(next_value(&mut it)?.to_string()),
            "--seed" => args.seed = Some(parse_value(next_value(&mut it)?)?),
            "--width" => args.width = Some(parse_value(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_value(next_value(&mut it)?)?),
            "--grass" => args.grass = Some(parse_value(next_value(&mut it)?)?),
            "--threads" => args.threads = parse_value(next_value(&mut it)?)?,
            "--frame" => args.frame = Some(parse_value(next_value(&mut it)?)?),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = parse_value(next_value(&mut it)?)?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => args.out = Some(next_value(&mut it)?.to_string()),
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn load_config(args: &Args) -> Result<MeadowConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => MeadowConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => MeadowConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(grass) = args.grass {
        config.grass_blades = grass;
    }
    config.smooth |= args.smooth;
    config.validate()?;
    Ok(config)
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn write_frame_dir(dir: &Path, frames: &[meadow::Frame]) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)?;
    for (i, frame) in frames.iter().enumerate() {
        let path: PathBuf = dir.join(format!("frame-{i:03}.svg"));
        std::fs::write(path, &frame.svg)?;
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Species => {
            let mut rng = args.seed.map_or_else(Rng::from_entropy, Rng::new);
            let height = args.height.unwrap_or(MeadowConfig::default().height);
            if !(height.is_finite() && height > 0.0) {
                return Err(CliError::Usage(usage()));
            }
            let spec = PSpec::sample(&mut rng, height);
            let stdout = std::io::stdout().lock();
            if args.pretty {
                serde_json::to_writer_pretty(stdout, &spec)?;
            } else {
                serde_json::to_writer(stdout, &spec)?;
            }
            println!();
            Ok(())
        }
        Command::Render => {
            let config = load_config(&args)?;
            let frames = meadow::generate(&config)?;
            tracing::info!(frames = frames.len(), seed = ?config.seed, "generated picture");

            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                threads: args.threads,
                ..RasterOptions::default()
            };
            match args.render_format {
                RenderFormat::Svg => match (args.frame, args.out.as_deref()) {
                    (Some(index), out) => {
                        let frame = frames.get(index).ok_or(CliError::NoSuchFrame {
                            index,
                            frames: frames.len(),
                        })?;
                        match out {
                            None | Some("-") => print!("{}", frame.svg),
                            Some(path) => std::fs::write(path, &frame.svg)?,
                        }
                    }
                    (None, Some(dir)) => write_frame_dir(Path::new(dir), &frames)?,
                    (None, None) => return Err(CliError::Usage(usage())),
                },
                RenderFormat::Png => {
                    let bytes = frames_to_png(&frames, &raster)?;
                    write_bytes(&bytes, args.out.as_deref().unwrap_or("out.png"))?;
                }
                RenderFormat::Jpeg => {
                    let bytes = frames_to_jpeg(&frames, &raster)?;
                    write_bytes(&bytes, args.out.as_deref().unwrap_or("out.jpg"))?;
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
