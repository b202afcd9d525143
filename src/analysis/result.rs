//! Enhancement result types

use serde::{Deserialize, Serialize};

/// Output of a full pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    /// Enhanced mono samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz (same as the input)
    pub sample_rate: u32,

    /// Run statistics
    pub metadata: EnhancementMetadata,
}

/// Statistics and provenance for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementMetadata {
    /// Input length in samples
    pub input_samples: usize,

    /// Output length in samples (may exceed the input by less than one frame)
    pub output_samples: usize,

    /// Output duration in seconds
    pub duration_seconds: f32,

    /// Wall-clock time for the whole pipeline
    pub processing_time_ms: f32,

    /// Per-stage wall-clock times
    pub stage_times: StageTimes,

    /// Input RMS level (dBFS)
    pub input_rms_db: f32,

    /// Output RMS level (dBFS)
    pub output_rms_db: f32,

    /// Input peak level (dBFS)
    pub input_peak_db: f32,

    /// Output peak level (dBFS)
    pub output_peak_db: f32,

    /// Mean magnitude of the estimated noise profile (dBFS)
    pub noise_floor_db: f32,

    /// Frames averaged into the noise profile
    pub noise_frames_used: usize,

    /// Deepest compressor gain reduction (dB, >= 0)
    pub max_gain_reduction_db: f32,

    /// Number of EQ bands applied
    pub eq_bands: usize,

    /// Crate version that produced the result
    pub algorithm_version: String,
}

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    /// Spectral denoiser
    pub denoise_ms: f32,
    /// Compressor
    pub compress_ms: f32,
    /// Equalizer
    pub eq_ms: f32,
}
