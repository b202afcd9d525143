//! Dynamic range processing
//!
//! Currently a single smoothed downward compressor.

pub mod compressor;

pub use compressor::{smooth_compress, smooth_compress_with_gain, target_gain, CompressorConfig};
