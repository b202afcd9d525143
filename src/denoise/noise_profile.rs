//! Stationary noise estimate from the leading frames of a spectrogram

use super::stft::Spectrogram;
use crate::error::EnhanceError;

/// Mean magnitude per frequency bin over the noise window
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseProfile {
    magnitudes: Vec<f32>,
    frames_used: usize,
}

impl NoiseProfile {
    /// Average the magnitude of the first `noise_frames` frames, per bin
    ///
    /// If the spectrogram has fewer frames than requested, every frame is used.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `noise_frames` is zero or the spectrogram is empty.
    pub fn estimate(spectrogram: &Spectrogram, noise_frames: usize) -> Result<Self, EnhanceError> {
        if noise_frames == 0 {
            return Err(EnhanceError::invalid_parameter(
                "noise_frames",
                "must be >= 1",
            ));
        }
        if spectrogram.num_frames() == 0 || spectrogram.num_bins() == 0 {
            return Err(EnhanceError::invalid_parameter(
                "spectrogram",
                "cannot estimate noise from an empty spectrogram",
            ));
        }

        let frames_used = noise_frames.min(spectrogram.num_frames());
        if frames_used < noise_frames {
            log::warn!(
                "Requested {} noise frames but only {} available, averaging all of them",
                noise_frames,
                frames_used
            );
        }

        let mut magnitudes = vec![0.0f32; spectrogram.num_bins()];
        for frame in spectrogram.frames().take(frames_used) {
            for (acc, c) in magnitudes.iter_mut().zip(frame) {
                *acc += c.norm();
            }
        }
        let inv = 1.0 / frames_used as f32;
        for m in magnitudes.iter_mut() {
            *m *= inv;
        }

        Ok(Self {
            magnitudes,
            frames_used,
        })
    }

    /// Build a profile from explicit per-bin magnitudes
    pub fn from_magnitudes(magnitudes: Vec<f32>) -> Self {
        Self {
            magnitudes,
            frames_used: 0,
        }
    }

    /// Per-bin noise magnitudes
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// True if the profile has no bins
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frames averaged into the estimate (0 for explicit profiles)
    pub fn frames_used(&self) -> usize {
        self.frames_used
    }

    /// Mean magnitude across all bins
    pub fn mean_magnitude(&self) -> f32 {
        if self.magnitudes.is_empty() {
            return 0.0;
        }
        self.magnitudes.iter().sum::<f32>() / self.magnitudes.len() as f32
    }
}
