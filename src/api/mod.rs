//! Contains the types and functions for the high level pipeline builder API.

mod image_pipeline;
mod quantize_method;

pub use image_pipeline::{ImagePipeline, Quantized};
pub use quantize_method::{ColorMode, QuantizeMethod, ThresholdMode};
