//! Magnitude-domain spectral subtraction
//!
//! For every bin and frame:
//!
//! ```text
//! |Y| = max(|X| - alpha * N[bin], beta * N[bin])
//! arg(Y) = arg(X)
//! ```
//!
//! The `beta` floor keeps over-subtracted bins from collapsing to zero, which is
//! what produces musical-noise artifacts.

use super::noise_profile::NoiseProfile;
use super::stft::Spectrogram;
use crate::error::EnhanceError;
use rustfft::num_complex::Complex;

/// Subtract `alpha * noise` from every magnitude and floor at `beta * noise`
///
/// Phase is left untouched. Frames are processed in parallel when the `parallel`
/// feature is enabled; the result does not depend on it.
///
/// # Errors
///
/// `InvalidParameter` if the profile length does not match the bin count, or if
/// `alpha`/`beta` are negative or non-finite.
pub fn subtract_noise(
    spectrogram: &mut Spectrogram,
    profile: &NoiseProfile,
    alpha: f32,
    beta: f32,
) -> Result<(), EnhanceError> {
    if profile.len() != spectrogram.num_bins() {
        return Err(EnhanceError::invalid_parameter(
            "noise_profile",
            format!(
                "has {} bins, spectrogram has {}",
                profile.len(),
                spectrogram.num_bins()
            ),
        ));
    }
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(EnhanceError::invalid_parameter(
            "alpha",
            format!("must be finite and >= 0, got {}", alpha),
        ));
    }
    if !beta.is_finite() || beta < 0.0 {
        return Err(EnhanceError::invalid_parameter(
            "beta",
            format!("must be finite and >= 0, got {}", beta),
        ));
    }
    if spectrogram.num_bins() == 0 {
        return Ok(());
    }

    let noise = profile.magnitudes();
    let num_bins = spectrogram.num_bins();
    let clean_frame = |frame: &mut [Complex<f32>]| {
        for (c, &n) in frame.iter_mut().zip(noise) {
            let (magnitude, phase) = c.to_polar();
            let cleaned = (magnitude - alpha * n).max(beta * n);
            *c = Complex::from_polar(cleaned, phase);
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        spectrogram
            .data_mut()
            .par_chunks_exact_mut(num_bins)
            .for_each(clean_frame);
    }
    #[cfg(not(feature = "parallel"))]
    {
        spectrogram
            .data_mut()
            .chunks_exact_mut(num_bins)
            .for_each(clean_frame);
    }

    Ok(())
}
