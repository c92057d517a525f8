use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pixelform_core::codec::{open_image, save_image, DecodeOptions, EncodeOptions, StdFs};
use pixelform_core::{blur, flip, resize, rotate, sharpen, PixelBuffer, ResampleKernel, Rgba};

/// Flags shared by every command that writes an image.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output file; format is taken from the extension
    #[arg(short, long)]
    output: PathBuf,

    /// JPEG quality, 1-100
    #[arg(long, default_value_t = 95)]
    quality: u8,
}

#[derive(Parser)]
#[command(name = "pixelform")]
#[command(about = "Resize, rotate, flip and filter raster images")]
#[command(version)]
struct Cli {
    /// Input file (JPEG, PNG, GIF, BMP or TIFF)
    input: PathBuf,

    /// Apply the EXIF orientation tag before transforming
    #[arg(long, global = true)]
    auto_orient: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize to the given dimensions; pass 0 for one axis to keep aspect
    Resize {
        width: u32,
        height: u32,
        /// Resampling kernel: nearest, box, linear, cubic or lanczos
        #[arg(long, default_value = "lanczos")]
        kernel: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Rotate counter-clockwise by an arbitrary angle in degrees
    Rotate {
        angle: f64,
        /// Background fill for exposed corners, as R,G,B[,A]
        #[arg(long, default_value = "0,0,0,255", value_parser = parse_rgba)]
        background: Rgba,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Mirror across an axis: h (horizontal) or v (vertical)
    Flip {
        axis: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Gaussian blur with the given sigma
    Blur {
        sigma: f64,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Sharpen with a fixed 3x3 kernel
    Sharpen {
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Normalize to EXIF orientation 1 and re-encode
    Orient {
        #[command(flatten)]
        out: OutputArgs,
    },
}

fn parse_rgba(s: &str) -> Result<Rgba, String> {
    let parts: Vec<u8> = s
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok(Rgba { r: *r, g: *g, b: *b, a: 255 }),
        [r, g, b, a] => Ok(Rgba { r: *r, g: *g, b: *b, a: *a }),
        _ => Err(format!("expected R,G,B or R,G,B,A, got {s:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pixelform: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let fs = StdFs;
    let decode_opts = DecodeOptions::new().auto_orientation(cli.auto_orient);
    let img = open_image(&fs, &cli.input, &decode_opts)?;

    let (result, out) = match &cli.command {
        Command::Resize { width, height, kernel, out } => {
            let kernel = ResampleKernel::from_name(kernel)?;
            (resize(&img, *width, *height, kernel)?, out)
        }
        Command::Rotate { angle, background, out } => {
            (rotate(&img, *angle, *background), out)
        }
        Command::Flip { axis, out } => {
            let flipped = match axis.as_str() {
                "h" => flip::flip_h(&img),
                "v" => flip::flip_v(&img),
                other => return Err(format!("unknown flip axis {other:?}, expected h or v").into()),
            };
            (flipped, out)
        }
        Command::Blur { sigma, out } => (blur(&img, *sigma), out),
        Command::Sharpen { out } => (sharpen(&img), out),
        Command::Orient { out } => {
            // `--auto-orient` already normalized during decode; without it,
            // read the tag from the file here.
            let normalized = if cli.auto_orient {
                img.clone()
            } else {
                orient_from_file(&cli.input, &img)?
            };
            (normalized, out)
        }
    };

    let encode_opts = EncodeOptions::new().jpeg_quality(out.quality);
    save_image(&fs, &out.output, &result, &encode_opts)?;
    Ok(())
}

fn orient_from_file(
    path: &std::path::Path,
    img: &PixelBuffer,
) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let orientation = pixelform_core::codec::read_orientation(&bytes)?;
    Ok(orientation.apply(img))
}
