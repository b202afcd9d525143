//! Signal level measurements

/// Floor for dB conversions of silent signals
pub const SILENCE_DB: f32 = -120.0;

/// Root-mean-square amplitude (0.0 for an empty buffer)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample value (0.0 for an empty buffer)
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
}

/// Linear amplitude to dBFS, clamped at [`SILENCE_DB`]
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude <= 0.0 || !amplitude.is_finite() {
        return SILENCE_DB;
    }
    (20.0 * amplitude.log10()).max(SILENCE_DB)
}

/// Linear gain to dB without clamping
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}
