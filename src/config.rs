//! Configuration parameters for the enhancement pipeline

use crate::denoise::DenoiseConfig;
use crate::dynamics::CompressorConfig;
use crate::eq::EqConfig;
use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

/// Pipeline configuration: one block per stage
///
/// Every field has a documented default, so partial configs deserialize cleanly:
///
/// ```
/// use voxclean_dsp::EnhancementConfig;
///
/// let config = EnhancementConfig::default();
/// assert_eq!(config.denoise.noise_frames, 20);
/// assert_eq!(config.compressor.ratio, 3.0);
/// assert_eq!(config.eq.bands.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Spectral denoiser (noise_frames 20, alpha 1.5, beta 0.002)
    pub denoise: DenoiseConfig,

    /// Compressor (threshold 0.1, ratio 3, attack 0.01, release 0.1)
    pub compressor: CompressorConfig,

    /// EQ bands (250 Hz +1.5 dB, 3 kHz +2 dB, both Q 2)
    pub eq: EqConfig,
}

impl EnhancementConfig {
    /// Validate every stage for a signal at `sample_rate`
    ///
    /// Stages validate again on entry; this lets callers fail before any work.
    pub fn validate(&self, sample_rate: u32) -> Result<(), EnhanceError> {
        self.denoise.validate()?;
        self.compressor.validate()?;
        self.eq.validate(sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(EnhancementConfig::default().validate(44100).is_ok());
        assert!(EnhancementConfig::default().validate(8000).is_ok());
    }

    #[test]
    fn test_low_sample_rate_rejects_clarity_band() {
        // 3 kHz is above Nyquist at 4 kHz sampling
        assert!(matches!(
            EnhancementConfig::default().validate(4000),
            Err(EnhanceError::InvalidBandConfiguration { index: 1, .. })
        ));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let json = r#"{ "compressor": { "ratio": 4.0 }, "eq": { "bands": [] } }"#;
        let config: EnhancementConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.compressor.ratio, 4.0);
        assert_eq!(config.compressor.threshold, 0.1);
        assert_eq!(config.denoise, DenoiseConfig::default());
        assert!(config.eq.bands.is_empty());
    }
}
