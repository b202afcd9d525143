//! # VoxClean DSP
//!
//! A three-stage enhancement chain for mono speech recordings.
//!
//! ## Features
//!
//! - **Spectral Denoiser**: STFT spectral subtraction against a noise profile taken
//!   from the opening frames, with a spectral floor against musical noise
//! - **Dynamic Compressor**: per-sample gain reduction above a threshold with
//!   asymmetric attack/release smoothing
//! - **Parametric EQ**: additive resonant boosts (250 Hz warmth, 3 kHz clarity)
//!
//! ## Quick Start
//!
//! ```no_run
//! use voxclean_dsp::{enhance_audio, EnhancementConfig};
//!
//! // Mono, f32, normalized
//! let samples: Vec<f32> = vec![0.0; 44100];
//! let sample_rate = 44100;
//!
//! let result = enhance_audio(&samples, sample_rate, &EnhancementConfig::default())?;
//!
//! println!("{} samples, output RMS {:.1} dBFS", result.samples.len(), result.metadata.output_rms_db);
//! # Ok::<(), voxclean_dsp::EnhanceError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Spectral Denoiser → Compressor → EQ → Output
//! ```
//!
//! Each stage reads the previous stage's whole buffer and produces a new one. The
//! sample rate is carried through unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod denoise;
pub mod dynamics;
pub mod eq;
pub mod error;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{EnhancementMetadata, EnhancementResult, StageTimes};
pub use config::EnhancementConfig;
pub use denoise::{soft_denoise, DenoiseConfig, SpectralDenoiser};
pub use dynamics::{smooth_compress, CompressorConfig};
pub use eq::{apply_eq, EqBand, EqConfig};
pub use error::EnhanceError;

use analysis::levels::{amplitude_to_db, gain_to_db, peak, rms};
use std::time::Instant;

/// Main enhancement function
///
/// Runs denoise → compress → EQ over the whole buffer.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Stage parameters
///
/// # Returns
///
/// `EnhancementResult` with the enhanced buffer, its sample rate and run metadata.
/// The buffer may be longer than the input by less than one 1024-sample frame.
///
/// # Errors
///
/// The first stage error is returned unchanged:
/// - `InsufficientSamples` if the input is shorter than one analysis frame
/// - `InvalidParameter` for out-of-range denoiser/compressor settings or a zero sample rate
/// - `InvalidBandConfiguration` for a bad EQ band
///
/// # Example
///
/// ```
/// use voxclean_dsp::{enhance_audio, EnhancementConfig};
///
/// let silence = vec![0.0f32; 44100];
/// let result = enhance_audio(&silence, 44100, &EnhancementConfig::default())?;
/// assert_eq!(result.sample_rate, 44100);
/// assert!(result.samples.iter().all(|s| s.is_finite()));
/// # Ok::<(), voxclean_dsp::EnhanceError>(())
/// ```
pub fn enhance_audio(
    samples: &[f32],
    sample_rate: u32,
    config: &EnhancementConfig,
) -> Result<EnhancementResult, EnhanceError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting enhancement: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if sample_rate == 0 {
        return Err(EnhanceError::invalid_parameter("sample_rate", "must be > 0"));
    }
    config.validate(sample_rate)?;

    // Stage 1: spectral denoise
    let stage_start = Instant::now();
    let denoiser = SpectralDenoiser::new(config.denoise.clone())?;
    let (denoised, noise_profile) = denoiser.process_with_profile(samples, sample_rate)?;
    let denoise_ms = elapsed_ms(stage_start);

    // Stage 2: compression
    let stage_start = Instant::now();
    let (compressed, min_gain) =
        dynamics::compressor::smooth_compress_with_min_gain(&denoised, &config.compressor)?;
    drop(denoised);
    let compress_ms = elapsed_ms(stage_start);

    // Stage 3: EQ
    let stage_start = Instant::now();
    let enhanced = apply_eq(&compressed, sample_rate, &config.eq)?;
    drop(compressed);
    let eq_ms = elapsed_ms(stage_start);

    let processing_time_ms = elapsed_ms(start_time);

    let metadata = EnhancementMetadata {
        input_samples: samples.len(),
        output_samples: enhanced.len(),
        duration_seconds: enhanced.len() as f32 / sample_rate as f32,
        processing_time_ms,
        stage_times: StageTimes {
            denoise_ms,
            compress_ms,
            eq_ms,
        },
        input_rms_db: amplitude_to_db(rms(samples)),
        output_rms_db: amplitude_to_db(rms(&enhanced)),
        input_peak_db: amplitude_to_db(peak(samples)),
        output_peak_db: amplitude_to_db(peak(&enhanced)),
        noise_floor_db: amplitude_to_db(noise_profile.mean_magnitude()),
        noise_frames_used: noise_profile.frames_used(),
        max_gain_reduction_db: -gain_to_db(min_gain).min(0.0),
        eq_bands: config.eq.bands.len(),
        algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    log::debug!(
        "Enhancement done in {:.2} ms: {} -> {} samples, RMS {:.1} -> {:.1} dBFS, max reduction {:.2} dB",
        processing_time_ms,
        metadata.input_samples,
        metadata.output_samples,
        metadata.input_rms_db,
        metadata.output_rms_db,
        metadata.max_gain_reduction_db
    );

    Ok(EnhancementResult {
        samples: enhanced,
        sample_rate,
        metadata,
    })
}

/// Enhance with default parameters and return only the buffer
///
/// # Example
///
/// ```
/// let tone: Vec<f32> = (0..22050)
///     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 22050.0).sin())
///     .collect();
/// let enhanced = voxclean_dsp::process_audio(&tone, 22050)?;
/// assert!(enhanced.len() >= tone.len());
/// # Ok::<(), voxclean_dsp::EnhanceError>(())
/// ```
pub fn process_audio(samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, EnhanceError> {
    enhance_audio(samples, sample_rate, &EnhancementConfig::default()).map(|result| result.samples)
}

fn elapsed_ms(since: Instant) -> f32 {
    since.elapsed().as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sample_rate() {
        let result = enhance_audio(&[0.0f32; 4096], 0, &EnhancementConfig::default());
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidParameter { name: "sample_rate", .. })
        ));
    }

    #[test]
    fn test_invalid_config_fails_before_processing() {
        let mut config = EnhancementConfig::default();
        config.compressor.ratio = 0.0;
        // Too short for the denoiser too; the parameter check wins
        let result = enhance_audio(&[0.0f32; 16], 44100, &config);
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidParameter { name: "ratio", .. })
        ));
    }

    #[test]
    fn test_metadata_levels() {
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..sample_rate * 2)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sample_rate as f32).sin())
            .collect();
        let result = enhance_audio(&samples, sample_rate as u32, &EnhancementConfig::default()).unwrap();
        let meta = &result.metadata;

        assert_eq!(meta.input_samples, samples.len());
        assert_eq!(meta.output_samples, result.samples.len());
        assert_eq!(meta.eq_bands, 2);
        assert_eq!(meta.noise_frames_used, 20);
        assert!((meta.input_peak_db - amplitude_to_db(0.5)).abs() < 0.01);
        assert!(meta.max_gain_reduction_db >= 0.0);
        assert!(meta.output_rms_db < meta.input_rms_db);
        assert_eq!(meta.algorithm_version, env!("CARGO_PKG_VERSION"));
    }
}
