use std::path::{Path, PathBuf};
use std::str::FromStr;

use puzzlet::{Challenge, Direction, GenerateOptions};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const MIN_DIMENSION: u32 = 128;
const MAX_DIMENSION: u32 = 2048;
const DEFAULT_WIDTH: u32 = 280;
const DEFAULT_HEIGHT: u32 = 150;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Image(image::ImageError),
    Engine(puzzlet::Error),
    Json(serde_json::Error),
    DimensionOutOfRange(u32),
    EmptyPool(PathBuf),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Image(err) => write!(f, "image error: {err}"),
            CliError::Engine(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::DimensionOutOfRange(value) => write!(
                f,
                "dimension {value} is outside the supported {MIN_DIMENSION}..={MAX_DIMENSION} range"
            ),
            CliError::EmptyPool(dir) => {
                write!(f, "no .jpg/.jpeg/.png images found in {}", dir.display())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<image::ImageError> for CliError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

impl From<puzzlet::Error> for CliError {
    fn from(value: puzzlet::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug)]
struct Args {
    width: u32,
    height: u32,
    direction: Direction,
    seed: Option<u64>,
    drift: bool,
    rotate: bool,
    out_dir: PathBuf,
    pretty: bool,
    input: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            direction: Direction::default(),
            seed: None,
            drift: true,
            rotate: true,
            out_dir: PathBuf::from("."),
            pretty: false,
            input: None,
        }
    }
}

fn usage() -> &'static str {
    "puzzlet-cli\n\
\n\
USAGE:\n\
  puzzlet-cli generate [OPTIONS] <image-or-directory>\n\
\n\
OPTIONS:\n\
  --width <n>        canvas width in pixels, 128..=2048 (default 280)\n\
  --height <n>       canvas height in pixels, 128..=2048 (default 150)\n\
  --direction <d>    left-to-right | right-to-left | top-to-bottom | bottom-to-top\n\
                     (also ltr/rtl/ttb/btt; default left-to-right)\n\
  --seed <n>         seed the RNG for reproducible output\n\
  --no-drift         disable anchor/radius jitter\n\
  --no-rotate        disable random whole-outline rotation\n\
  --out-dir <path>   where background.png and slider.png are written (default .)\n\
  --pretty           pretty-print the challenge JSON\n\
\n\
NOTES:\n\
  - A directory input picks one .jpg/.jpeg/.png from it at random.\n\
  - The challenge JSON (including slideOffset) is printed to stdout.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut saw_generate = false;

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "generate" if !saw_generate => saw_generate = true,
            "--width" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.width = value.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--height" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.height = value.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--direction" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.direction =
                    Direction::from_str(value).map_err(|_| CliError::Usage(usage()))?;
            }
            "--seed" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(value.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--no-drift" => args.drift = false,
            "--no-rotate" => args.rotate = false,
            "--out-dir" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out_dir = PathBuf::from(value);
            }
            "--pretty" => args.pretty = true,
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(PathBuf::from(path));
            }
        }
    }

    if !saw_generate || args.input.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn check_dimension(value: u32) -> Result<u32, CliError> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::DimensionOutOfRange(value))
    }
}

/// Picks one image from a directory pool. Entries are sorted first so a fixed
/// seed selects the same file on every platform.
fn pick_from_pool(dir: &Path, rng: &mut StdRng) -> Result<PathBuf, CliError> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("jpg" | "jpeg" | "png")) {
            images.push(path);
        }
    }
    images.sort();
    images
        .choose(rng)
        .cloned()
        .ok_or_else(|| CliError::EmptyPool(dir.to_path_buf()))
}

fn run(args: Args) -> Result<(), CliError> {
    let width = check_dimension(args.width)?;
    let height = check_dimension(args.height)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let Some(input) = args.input else {
        return Err(CliError::Usage(usage()));
    };
    let source_path = if input.is_dir() {
        pick_from_pool(&input, &mut rng)?
    } else {
        input
    };
    let source = image::open(&source_path)?;

    let options = GenerateOptions {
        drift: args.drift,
        rotate: args.rotate,
    };
    let assets = puzzlet::generate_assets_with_rng(
        &source,
        args.direction,
        width,
        height,
        &options,
        &mut rng,
    )?;

    std::fs::create_dir_all(&args.out_dir)?;
    std::fs::write(args.out_dir.join("background.png"), &assets.background_png)?;
    std::fs::write(args.out_dir.join("slider.png"), &assets.slider_png)?;

    let challenge = Challenge::from_assets(args.direction, width, height, &assets);
    let json = if args.pretty {
        serde_json::to_string_pretty(&challenge)?
    } else {
        serde_json::to_string(&challenge)?
    };
    println!("{json}");
    Ok(())
}

fn main() {
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
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
