//! Input preparation
//!
//! The pipeline only accepts mono audio; this module folds multi-channel input
//! down before it enters.

pub mod channel_mixer;

pub use channel_mixer::{downmix_interleaved, stereo_to_mono};
