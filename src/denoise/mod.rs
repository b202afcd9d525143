//! Spectral noise suppression
//!
//! Estimates a stationary noise spectrum from the opening frames of the clip and
//! subtracts it bin by bin, keeping the original phase.
//!
//! # Example
//!
//! ```
//! use voxclean_dsp::denoise::{soft_denoise, DenoiseConfig};
//!
//! let samples = vec![0.0f32; 44100];
//! let cleaned = soft_denoise(&samples, 44100, &DenoiseConfig::default())?;
//! assert!(cleaned.len() >= samples.len());
//! # Ok::<(), voxclean_dsp::EnhanceError>(())
//! ```

pub mod noise_profile;
pub mod stft;
pub mod subtraction;

pub use noise_profile::NoiseProfile;
pub use stft::{HannStft, ShortTimeTransform, Spectrogram};
pub use subtraction::subtract_noise;

use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

/// Spectral denoiser parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Leading frames averaged into the noise profile (default: 20)
    pub noise_frames: usize,

    /// Over-subtraction factor (default: 1.5)
    pub alpha: f32,

    /// Spectral floor factor (default: 0.002)
    pub beta: f32,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            noise_frames: 20,
            alpha: 1.5,
            beta: 0.002,
        }
    }
}

impl DenoiseConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.noise_frames == 0 {
            return Err(EnhanceError::invalid_parameter(
                "noise_frames",
                "must be >= 1",
            ));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "alpha",
                format!("must be finite and >= 0, got {}", self.alpha),
            ));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "beta",
                format!("must be finite and >= 0, got {}", self.beta),
            ));
        }
        Ok(())
    }
}

/// Spectral subtraction denoiser over a pluggable short-time transform
#[derive(Debug)]
pub struct SpectralDenoiser<T = HannStft> {
    transform: T,
    config: DenoiseConfig,
}

impl SpectralDenoiser<HannStft> {
    /// Denoiser with the default 1024-sample Hann STFT
    pub fn new(config: DenoiseConfig) -> Result<Self, EnhanceError> {
        Self::with_transform(HannStft::default(), config)
    }
}

impl<T: ShortTimeTransform> SpectralDenoiser<T> {
    /// Denoiser over a custom transform
    pub fn with_transform(transform: T, config: DenoiseConfig) -> Result<Self, EnhanceError> {
        config.validate()?;
        Ok(Self { transform, config })
    }

    /// Parameters in use
    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Denoise `samples`
    ///
    /// Output length may exceed the input by less than one analysis frame.
    ///
    /// # Errors
    ///
    /// - `InsufficientSamples` if `samples` is shorter than one frame
    /// - `InvalidParameter` if `sample_rate` is zero
    pub fn process(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, EnhanceError> {
        self.process_with_profile(samples, sample_rate)
            .map(|(cleaned, _)| cleaned)
    }

    /// Denoise `samples` and also return the noise profile that was subtracted
    pub fn process_with_profile(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<(Vec<f32>, NoiseProfile), EnhanceError> {
        if sample_rate == 0 {
            return Err(EnhanceError::invalid_parameter(
                "sample_rate",
                "must be > 0",
            ));
        }
        if samples.len() < self.transform.frame_size() {
            return Err(EnhanceError::InsufficientSamples {
                required: self.transform.frame_size(),
                actual: samples.len(),
            });
        }

        log::debug!(
            "Spectral denoise: {} samples at {} Hz, noise_frames={}, alpha={:.3}, beta={:.4}",
            samples.len(),
            sample_rate,
            self.config.noise_frames,
            self.config.alpha,
            self.config.beta
        );

        let mut spectrogram = self.transform.forward(samples, sample_rate)?;
        let profile = NoiseProfile::estimate(&spectrogram, self.config.noise_frames)?;
        subtract_noise(
            &mut spectrogram,
            &profile,
            self.config.alpha,
            self.config.beta,
        )?;
        let cleaned = self.transform.inverse(&spectrogram)?;

        log::debug!(
            "Spectral denoise done: {} -> {} samples, mean noise magnitude {:.6}",
            samples.len(),
            cleaned.len(),
            profile.mean_magnitude()
        );

        Ok((cleaned, profile))
    }
}

/// Denoise with the default transform
///
/// # Example
///
/// ```
/// use voxclean_dsp::denoise::{soft_denoise, DenoiseConfig};
///
/// let too_short = vec![0.0f32; 100];
/// assert!(soft_denoise(&too_short, 44100, &DenoiseConfig::default()).is_err());
/// ```
pub fn soft_denoise(
    samples: &[f32],
    sample_rate: u32,
    config: &DenoiseConfig,
) -> Result<Vec<f32>, EnhanceError> {
    SpectralDenoiser::new(config.clone())?.process(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-noise (LCG), uniform in [-amplitude, amplitude]
    fn lcg_noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let unit = (state >> 8) as f32 / (1u32 << 24) as f32;
                amplitude * (2.0 * unit - 1.0)
            })
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_default_config() {
        let config = DenoiseConfig::default();
        assert_eq!(config.noise_frames, 20);
        assert_eq!(config.alpha, 1.5);
        assert_eq!(config.beta, 0.002);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = DenoiseConfig {
            noise_frames: 0,
            ..Default::default()
        };
        assert!(SpectralDenoiser::new(bad).is_err());

        let bad = DenoiseConfig {
            beta: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(EnhanceError::InvalidParameter { name: "beta", .. })
        ));
    }

    #[test]
    fn test_insufficient_samples() {
        let result = soft_denoise(&[0.1f32; 512], 44100, &DenoiseConfig::default());
        assert_eq!(
            result,
            Err(EnhanceError::InsufficientSamples {
                required: 1024,
                actual: 512
            })
        );
    }

    #[test]
    fn test_exactly_one_frame_is_enough() {
        let samples = lcg_noise(1024, 0.1, 7);
        let cleaned = soft_denoise(&samples, 16000, &DenoiseConfig::default()).unwrap();
        assert_eq!(cleaned.len(), 1024);
        assert!(cleaned.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let result = soft_denoise(&[0.0f32; 2048], 0, &DenoiseConfig::default());
        assert!(matches!(
            result,
            Err(EnhanceError::InvalidParameter { name: "sample_rate", .. })
        ));
    }

    #[test]
    fn test_silence_stays_silent() {
        let cleaned = soft_denoise(&vec![0.0f32; 44100], 44100, &DenoiseConfig::default()).unwrap();
        assert_eq!(cleaned.len(), 44544);
        assert!(cleaned.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_stationary_noise_is_attenuated() {
        let sample_rate = 16000;
        let samples = lcg_noise(sample_rate as usize * 2, 0.05, 42);
        let cleaned = soft_denoise(&samples, sample_rate, &DenoiseConfig::default()).unwrap();

        let before = rms(&samples);
        let after = rms(&cleaned[..samples.len()]);
        assert!(
            after < before * 0.7,
            "noise should be attenuated: rms {:.5} -> {:.5}",
            before,
            after
        );
    }

    #[test]
    fn test_tone_after_noise_lead_in_survives() {
        let sample_rate = 16000usize;
        let mut samples = lcg_noise(sample_rate * 2, 0.01, 3);
        // Tone starts after the noise estimation window (~20 frames of 512 hop)
        for (i, s) in samples.iter_mut().enumerate().skip(sample_rate) {
            *s += 0.4 * (2.0 * std::f32::consts::PI * 500.0 * i as f32 / sample_rate as f32).sin();
        }
        let cleaned = soft_denoise(&samples, sample_rate as u32, &DenoiseConfig::default()).unwrap();

        let tone_before = rms(&samples[sample_rate + 2048..sample_rate * 2 - 2048]);
        let tone_after = rms(&cleaned[sample_rate + 2048..sample_rate * 2 - 2048]);
        assert!(
            (tone_after - tone_before).abs() / tone_before < 0.1,
            "tone level should be preserved: {:.4} vs {:.4}",
            tone_before,
            tone_after
        );
    }

    #[test]
    fn test_custom_transform() {
        let stft = HannStft::new(512, 256).unwrap();
        let denoiser = SpectralDenoiser::with_transform(stft, DenoiseConfig::default()).unwrap();
        let (cleaned, profile) = denoiser
            .process_with_profile(&lcg_noise(4000, 0.1, 1), 8000)
            .unwrap();
        assert_eq!(profile.len(), 257);
        assert_eq!(profile.frames_used(), 17);
        assert!(cleaned.len() >= 4000 && cleaned.len() < 4000 + 512);
    }

    #[test]
    fn test_deterministic() {
        let samples = lcg_noise(8192, 0.2, 9);
        let a = soft_denoise(&samples, 22050, &DenoiseConfig::default()).unwrap();
        let b = soft_denoise(&samples, 22050, &DenoiseConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
