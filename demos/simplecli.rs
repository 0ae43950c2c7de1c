#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use image::DynamicImage;
use levelette::{BitDepth, ImagePipeline, QuantizeMethod};

#[derive(Copy, Clone, ValueEnum)]
enum CliMethod {
    UniformGray,
    UniformColor,
    AdaptiveGray,
    AdaptiveColor,
}

impl From<CliMethod> for QuantizeMethod {
    fn from(value: CliMethod) -> Self {
        match value {
            CliMethod::UniformGray => QuantizeMethod::UNIFORM_GRAY,
            CliMethod::UniformColor => QuantizeMethod::UNIFORM_COLOR,
            CliMethod::AdaptiveGray => QuantizeMethod::ADAPTIVE_GRAY,
            CliMethod::AdaptiveColor => QuantizeMethod::ADAPTIVE_COLOR,
        }
    }
}

impl Display for CliMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", QuantizeMethod::from(*self))
    }
}

/// Reduces the bit depth of an image with each quantizer and writes the results as PNGs.
#[derive(Parser)]
pub struct Options {
    /// Number of bits to keep per channel (1 to 8).
    #[arg(short, long, default_value_t = BitDepth::default(), value_parser = parse_bit_depth)]
    bits: BitDepth,

    /// Only run the given quantizers (all of them by default).
    #[arg(short, long, value_enum)]
    method: Vec<CliMethod>,

    /// Number of threads: 0 uses all cores, 1 runs single-threaded.
    #[arg(short, long, default_value_t = 0)]
    threads: u8,

    /// Print how long each step took.
    #[arg(long)]
    verbose: bool,

    input: PathBuf,

    output_dir: PathBuf,
}

fn parse_bit_depth(s: &str) -> Result<BitDepth, String> {
    let value: u8 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() -> ExitCode {
    let Options { bits, method, threads, verbose, input, output_dir } = Options::parse();

    macro_rules! log {
        ($name: expr, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                println!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let image = match log!("read image", image::open(&input)) {
        Ok(image) => image.into_rgb8(),
        Err(e) => {
            eprintln!("failed to load {}: {e}", input.display());
            return ExitCode::FAILURE;
        }
    };

    if image.width() == 0 || image.height() == 0 {
        eprintln!("{} is empty", input.display());
        return ExitCode::FAILURE;
    }

    let mut pipeline = match ImagePipeline::try_from(&image) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{}: {e}", input.display());
            return ExitCode::FAILURE;
        }
    };
    pipeline.bit_depth(bits);

    let methods = if method.is_empty() {
        QuantizeMethod::ALL.to_vec()
    } else {
        method.into_iter().map(QuantizeMethod::from).collect()
    };

    let pool = match threads {
        0 | 1 => None,
        t => match rayon::ThreadPoolBuilder::new().num_threads(t.into()).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                eprintln!("failed to build thread pool: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("failed to create {}: {e}", output_dir.display());
        return ExitCode::FAILURE;
    }

    let original = output_dir.join("original.png");
    if let Err(e) = log!("write original", image.save(&original)) {
        eprintln!("failed to write {}: {e}", original.display());
        return ExitCode::FAILURE;
    }

    for method in methods {
        pipeline.quantize_method(method);

        let quantized: DynamicImage = log!(
            method,
            match (threads, &pool) {
                (1, _) => pipeline.quantized_image(),
                (_, Some(pool)) => pool.install(|| pipeline.quantized_image_par()),
                (_, None) => pipeline.quantized_image_par(),
            }
        );

        let path = output_dir.join(format!("{method}.png"));
        if let Err(e) = log!("write image", quantized.save(&path)) {
            eprintln!("failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
