//! Smoothed downward compressor
//!
//! Algorithm, per sample `x`:
//! 1. `a = |x|`
//! 2. Target gain: `(threshold + (a - threshold) / ratio) / a` if `a > threshold`, else 1
//! 3. Gain moves toward the target by `attack` when reducing, `release` when recovering
//! 4. Output `x * gain`
//!
//! The gain recursion is a first-order IIR, so the loop is strictly sequential.

use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

/// Compressor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Threshold in linear amplitude (default: 0.1)
    pub threshold: f32,

    /// Compression ratio above threshold (default: 3.0)
    pub ratio: f32,

    /// Smoothing coefficient toward more reduction (default: 0.01)
    pub attack: f32,

    /// Smoothing coefficient toward recovery (default: 0.1)
    pub release: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            ratio: 3.0,
            attack: 0.01,
            release: 0.1,
        }
    }
}

impl CompressorConfig {
    /// Check parameter ranges
    ///
    /// `threshold >= 0`, `ratio > 0` with a finite reciprocal, `attack` and `release`
    /// in `[0, 1]`, all finite.
    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "threshold",
                format!("must be finite and >= 0, got {}", self.threshold),
            ));
        }
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "ratio",
                format!("must be finite and > 0, got {}", self.ratio),
            ));
        }
        // Subnormal ratios overflow the excess / ratio term
        if !(1.0 / self.ratio).is_finite() {
            return Err(EnhanceError::invalid_parameter(
                "ratio",
                format!("too small to divide by, got {:e}", self.ratio),
            ));
        }
        for (name, value) in [("attack", self.attack), ("release", self.release)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EnhanceError::invalid_parameter(
                    name,
                    format!("must be in [0, 1], got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Gain that maps amplitude `abs_sample` onto the `ratio:1` curve above `threshold`
#[inline]
pub fn target_gain(abs_sample: f32, threshold: f32, ratio: f32) -> f32 {
    // Strict comparison: a == threshold == 0 must not divide
    if abs_sample > threshold {
        (threshold + (abs_sample - threshold) / ratio) / abs_sample
    } else {
        1.0
    }
}

/// Compress `samples`, returning a buffer of the same length
///
/// # Example
///
/// ```
/// use voxclean_dsp::dynamics::{smooth_compress, CompressorConfig};
///
/// let loud = vec![0.8f32; 4096];
/// let out = smooth_compress(&loud, &CompressorConfig::default())?;
/// assert_eq!(out.len(), loud.len());
/// assert!(out[4095] < 0.8);
/// # Ok::<(), voxclean_dsp::EnhanceError>(())
/// ```
pub fn smooth_compress(samples: &[f32], config: &CompressorConfig) -> Result<Vec<f32>, EnhanceError> {
    compress_observed(samples, config, |_| {})
}

/// Compress `samples` and also return the gain applied to each sample
pub fn smooth_compress_with_gain(
    samples: &[f32],
    config: &CompressorConfig,
) -> Result<(Vec<f32>, Vec<f32>), EnhanceError> {
    let mut gains = Vec::with_capacity(samples.len());
    let out = compress_observed(samples, config, |g| gains.push(g))?;
    Ok((out, gains))
}

/// Compress `samples` and report the smallest gain reached (1.0 if none applied)
pub(crate) fn smooth_compress_with_min_gain(
    samples: &[f32],
    config: &CompressorConfig,
) -> Result<(Vec<f32>, f32), EnhanceError> {
    let mut min_gain = 1.0f32;
    let out = compress_observed(samples, config, |g| min_gain = min_gain.min(g))?;
    Ok((out, min_gain))
}

fn compress_observed(
    samples: &[f32],
    config: &CompressorConfig,
    mut observe: impl FnMut(f32),
) -> Result<Vec<f32>, EnhanceError> {
    config.validate()?;

    log::debug!(
        "Compressing {} samples: threshold={:.3}, ratio={:.2}, attack={:.3}, release={:.3}",
        samples.len(),
        config.threshold,
        config.ratio,
        config.attack,
        config.release
    );

    let mut out = Vec::with_capacity(samples.len());
    let mut gain = 1.0f32;

    for &sample in samples {
        let target = target_gain(sample.abs(), config.threshold, config.ratio);

        if target < gain {
            gain -= config.attack * (gain - target);
        } else {
            gain += config.release * (target - gain);
        }

        observe(gain);
        out.push(sample * gain);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompressorConfig::default();
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.ratio, 3.0);
        assert_eq!(config.attack, 0.01);
        assert_eq!(config.release, 0.1);
    }

    #[test]
    fn test_zero_input_gives_zero_output() {
        let samples = vec![0.0f32; 10_000];
        let (out, gains) = smooth_compress_with_gain(&samples, &CompressorConfig::default()).unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(gains.iter().all(|g| !g.is_nan()));
    }

    #[test]
    fn test_zero_threshold_with_silence_does_not_divide() {
        let config = CompressorConfig {
            threshold: 0.0,
            ..Default::default()
        };
        let (out, gains) = smooth_compress_with_gain(&[0.0f32; 64], &config).unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(gains.iter().all(|&g| g == 1.0));
    }

    #[test]
    fn test_constant_at_threshold_keeps_unity_gain() {
        let config = CompressorConfig::default();
        let samples = vec![config.threshold; 5000];
        let (out, gains) = smooth_compress_with_gain(&samples, &config).unwrap();
        assert!(gains.iter().all(|&g| g == 1.0), "gain must stay exactly 1.0");
        assert_eq!(out, samples);
    }

    #[test]
    fn test_steady_state_ratio() {
        let config = CompressorConfig::default();
        let amplitude = 2.0 * config.threshold;
        let samples = vec![amplitude; 10_000];
        let out = smooth_compress(&samples, &config).unwrap();

        let expected = config.threshold + (amplitude - config.threshold) / config.ratio;
        let settled = *out.last().unwrap();
        assert!(
            (settled - expected).abs() < 1e-5,
            "settled at {:.6}, expected {:.6}",
            settled,
            expected
        );
        assert!(out.iter().all(|&s| s <= amplitude));
    }

    #[test]
    fn test_release_recovers_gain() {
        let config = CompressorConfig::default();
        let mut samples = vec![0.9f32; 2000];
        samples.extend(vec![0.01f32; 2000]);
        let (_, gains) = smooth_compress_with_gain(&samples, &config).unwrap();

        assert!(gains[1999] < 0.5);
        // Release is ten times faster than attack
        assert!((gains[3999] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_attack_is_gradual() {
        let config = CompressorConfig::default();
        let (_, gains) = smooth_compress_with_gain(&[1.0f32; 3], &config).unwrap();
        let target = target_gain(1.0, 0.1, 3.0);
        assert!((gains[0] - (1.0 - 0.01 * (1.0 - target))).abs() < 1e-6);
        assert!(gains[0] > gains[1] && gains[1] > gains[2]);
    }

    #[test]
    fn test_polarity_is_preserved() {
        let samples = [0.5f32, -0.5, 0.05, -0.05];
        let out = smooth_compress(&samples, &CompressorConfig::default()).unwrap();
        for (x, y) in samples.iter().zip(&out) {
            assert_eq!(x.signum(), y.signum());
            assert!(y.abs() <= x.abs());
        }
    }

    #[test]
    fn test_min_gain_tracks_deepest_reduction() {
        let mut samples = vec![0.05f32; 100];
        samples.extend(vec![0.8f32; 1000]);
        let (_, min_gain) = smooth_compress_with_min_gain(&samples, &CompressorConfig::default()).unwrap();
        let (_, gains) = smooth_compress_with_gain(&samples, &CompressorConfig::default()).unwrap();
        let expected = gains.iter().cloned().fold(1.0f32, f32::min);
        assert_eq!(min_gain, expected);
    }

    #[test]
    fn test_invalid_parameters() {
        let samples = [0.1f32; 8];
        let cases = [
            CompressorConfig { ratio: 0.0, ..Default::default() },
            CompressorConfig { ratio: -2.0, ..Default::default() },
            CompressorConfig { ratio: 1e-40, ..Default::default() },
            CompressorConfig { threshold: -0.1, ..Default::default() },
            CompressorConfig { threshold: f32::NAN, ..Default::default() },
            CompressorConfig { attack: 1.5, ..Default::default() },
            CompressorConfig { release: -0.1, ..Default::default() },
            CompressorConfig { release: f32::NAN, ..Default::default() },
        ];
        for config in &cases {
            assert!(
                matches!(
                    smooth_compress(&samples, config),
                    Err(EnhanceError::InvalidParameter { .. })
                ),
                "expected rejection for {:?}",
                config
            );
        }
    }
}
