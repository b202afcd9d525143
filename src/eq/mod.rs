//! Additive parametric boost EQ
//!
//! Each band's resonator output is scaled by the band's linear gain and added to the
//! dry signal:
//!
//! ```text
//! y = x + sum_k 10^(gain_db_k / 20) * resonator_k(x)
//! ```
//!
//! The dry path is never attenuated. A band with `gain_db = -inf` contributes nothing.
//!
//! # Example
//!
//! ```
//! use voxclean_dsp::eq::{apply_eq, EqConfig};
//!
//! let samples = vec![0.0f32; 1024];
//! let out = apply_eq(&samples, 44100, &EqConfig::default())?;
//! assert_eq!(out, samples);
//! # Ok::<(), voxclean_dsp::EnhanceError>(())
//! ```

pub mod peaking;

pub use peaking::PeakingResonator;

use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

/// One boost band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqBand {
    /// Centre frequency in Hz
    pub frequency_hz: f32,
    /// Quality factor (centre frequency / bandwidth)
    pub q: f32,
    /// Gain applied to the resonator output, in dB
    pub gain_db: f32,
}

impl EqBand {
    /// Create a band
    pub const fn new(frequency_hz: f32, q: f32, gain_db: f32) -> Self {
        Self {
            frequency_hz,
            q,
            gain_db,
        }
    }

    /// Low-mid "warmth" band: 250 Hz, Q 2, +1.5 dB
    pub const WARMTH: EqBand = EqBand::new(250.0, 2.0, 1.5);

    /// Presence "clarity" band: 3 kHz, Q 2, +2.0 dB
    pub const CLARITY: EqBand = EqBand::new(3000.0, 2.0, 2.0);

    /// `10^(gain_db / 20)`
    pub fn linear_gain(&self) -> f32 {
        10.0f32.powf(self.gain_db / 20.0)
    }

    /// Check this band against `sample_rate`; `index` is reported in the error
    pub fn validate(&self, index: usize, sample_rate: u32) -> Result<(), EnhanceError> {
        let nyquist = sample_rate as f32 / 2.0;
        let reject = |reason: String| Err(EnhanceError::InvalidBandConfiguration { index, reason });

        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return reject(format!(
                "frequency must be > 0 Hz, got {}",
                self.frequency_hz
            ));
        }
        if self.frequency_hz >= nyquist {
            return reject(format!(
                "frequency {} Hz is at or above Nyquist ({} Hz)",
                self.frequency_hz, nyquist
            ));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return reject(format!("Q must be finite and > 0, got {}", self.q));
        }
        // -inf dB mutes the band; anything that overflows the linear gain is rejected
        if !self.linear_gain().is_finite() {
            return reject(format!(
                "gain {} dB has no finite linear gain",
                self.gain_db
            ));
        }
        Ok(())
    }

    /// Design this band's resonator at `sample_rate`
    pub fn resonator(&self, index: usize, sample_rate: u32) -> Result<PeakingResonator, EnhanceError> {
        self.validate(index, sample_rate)?;
        let normalized = self.frequency_hz / (sample_rate as f32 / 2.0);
        PeakingResonator::design(normalized, self.q).map_err(|e| {
            EnhanceError::InvalidBandConfiguration {
                index,
                reason: e.to_string(),
            }
        })
    }
}

/// Ordered band list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqConfig {
    /// Bands applied in parallel and summed in this order
    pub bands: Vec<EqBand>,
}

impl Default for EqConfig {
    fn default() -> Self {
        Self {
            bands: vec![EqBand::WARMTH, EqBand::CLARITY],
        }
    }
}

impl EqConfig {
    /// Config with the given bands
    pub fn with_bands(bands: Vec<EqBand>) -> Self {
        Self { bands }
    }

    /// Check every band against `sample_rate`
    pub fn validate(&self, sample_rate: u32) -> Result<(), EnhanceError> {
        if sample_rate == 0 {
            return Err(EnhanceError::invalid_parameter("sample_rate", "must be > 0"));
        }
        self.bands
            .iter()
            .enumerate()
            .try_for_each(|(index, band)| band.validate(index, sample_rate))
    }
}

/// Add every band's boost to `samples`
///
/// All bands are validated before any filtering happens.
///
/// # Errors
///
/// - `InvalidBandConfiguration` for a band at/above Nyquist, non-positive frequency,
///   `Q <= 0` or a NaN/+inf gain
/// - `InvalidParameter` if `sample_rate` is zero
pub fn apply_eq(samples: &[f32], sample_rate: u32, config: &EqConfig) -> Result<Vec<f32>, EnhanceError> {
    config.validate(sample_rate)?;

    log::debug!(
        "Applying EQ: {} samples at {} Hz, {} bands",
        samples.len(),
        sample_rate,
        config.bands.len()
    );

    let resonators = config
        .bands
        .iter()
        .enumerate()
        .map(|(index, band)| Ok((band.resonator(index, sample_rate)?, band.linear_gain())))
        .collect::<Result<Vec<_>, EnhanceError>>()?;

    let boost = |&(resonator, gain): &(PeakingResonator, f32)| -> Vec<f32> {
        let mut filtered = resonator.filter(samples);
        for y in filtered.iter_mut() {
            *y *= gain;
        }
        filtered
    };

    #[cfg(feature = "parallel")]
    let boosts: Vec<Vec<f32>> = {
        use rayon::prelude::*;
        resonators.par_iter().map(boost).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let boosts: Vec<Vec<f32>> = resonators.iter().map(boost).collect();

    let mut out = samples.to_vec();
    for band in &boosts {
        for (y, &b) in out.iter_mut().zip(band) {
            *y += b;
        }
    }

    Ok(out)
}
