//! A library for reducing the bit depth (number of intensity levels per channel) of images.
//!
//! `levelette` provides four quantizers along two axes:
//! - [`uniform`] quantizers use a fixed step of `256 / 2^bits` between levels.
//! - [`adaptive`] quantizers derive the step from each channel's observed `min`/`max` range.
//!
//! Each of these can output a grayscale image (after [`luma`] conversion)
//! or a color image where the red, green, and blue channels are quantized independently.
//!
//! # Features
//! To reduce dependencies and compile times, `levelette` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes a builder struct that serves as the high-level API (more details below).
//! - `threads`: exposes parallel versions of every quantizer via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`ImagePipeline`].
//! Here is an example:
//! ```no_run
//! # use levelette::{ImagePipeline, BitDepth, QuantizeMethod};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//!
//! let quantized = ImagePipeline::try_from(&img)?
//!     .bit_depth(BitDepth::try_from(3)?) // keep 8 levels per channel
//!     .quantize_method(QuantizeMethod::ADAPTIVE_COLOR)
//!     .quantized_image_par(); // run in parallel to get a DynamicImage
//!
//! quantized.save("quantized.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Low-Level API
//! The functions in [`uniform`] and [`adaptive`] operate on a [`ColorSlice`] directly
//! and return one output pixel per input pixel:
//! ```
//! # use levelette::{uniform, BitDepth, ColorSlice};
//! # use palette::Srgb;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pixels = vec![Srgb::new(10, 100, 200); 4];
//! let quantized = uniform::color(ColorSlice::try_from(pixels.as_slice())?, BitDepth::MIN);
//! assert_eq!(quantized, vec![Srgb::new(0, 128, 128); 4]);
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod traits;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod adaptive;
pub mod luma;
pub mod range;
pub mod uniform;

pub use traits::*;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The smallest supported number of bits per channel (two levels).
pub const MIN_BITS: u8 = 1;

/// The largest supported number of bits per channel (the full 8-bit range).
pub const MAX_BITS: u8 = 8;
