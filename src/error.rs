//! Error types for the enhancement pipeline

use thiserror::Error;

/// Errors that can occur while enhancing audio
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnhanceError {
    /// Buffer is too short for a single analysis frame
    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples {
        /// Minimum number of samples the stage needs
        required: usize,
        /// Number of samples supplied
        actual: usize,
    },

    /// Out-of-range stage parameter
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    /// Bad frequency, Q or gain for an EQ band
    #[error("Invalid band configuration (band {index}): {reason}")]
    InvalidBandConfiguration {
        /// Position of the band in the band list
        index: usize,
        /// What is wrong with the band
        reason: String,
    },

    /// WAV reading or writing failed
    #[error("Audio I/O error: {0}")]
    AudioIo(String),
}

impl EnhanceError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        EnhanceError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<hound::Error> for EnhanceError {
    fn from(err: hound::Error) -> Self {
        EnhanceError::AudioIo(err.to_string())
    }
}
