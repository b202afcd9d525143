//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::EnhanceError;

/// Convert stereo to mono by averaging: (L + R) / 2
///
/// # Arguments
///
/// * `left` - Left channel samples
/// * `right` - Right channel samples
///
/// # Returns
///
/// Mono samples
///
/// # Errors
///
/// `InvalidParameter` if the channels differ in length
pub fn stereo_to_mono(left: &[f32], right: &[f32]) -> Result<Vec<f32>, EnhanceError> {
    if left.len() != right.len() {
        return Err(EnhanceError::invalid_parameter(
            "channels",
            format!(
                "left has {} samples, right has {}",
                left.len(),
                right.len()
            ),
        ));
    }
    log::debug!("Converting stereo to mono: {} frames", left.len());
    Ok(left
        .iter()
        .zip(right)
        .map(|(&l, &r)| (l + r) * 0.5)
        .collect())
}

/// Average interleaved `channels`-channel audio down to mono
///
/// Mono input is returned unchanged.
///
/// # Errors
///
/// `InvalidParameter` if `channels` is zero or the sample count is not a whole
/// number of frames
pub fn downmix_interleaved(samples: &[f32], channels: usize) -> Result<Vec<f32>, EnhanceError> {
    if channels == 0 {
        return Err(EnhanceError::invalid_parameter("channels", "must be >= 1"));
    }
    if samples.len() % channels != 0 {
        return Err(EnhanceError::invalid_parameter(
            "channels",
            format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            ),
        ));
    }
    if channels == 1 {
        return Ok(samples.to_vec());
    }

    log::debug!(
        "Downmixing {} frames of {}-channel audio",
        samples.len() / channels,
        channels
    );

    let scale = 1.0 / channels as f32;
    Ok(samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}
