//! Result types and level measurements
//!
//! - Enhancement result and run metadata
//! - RMS/peak/dB helpers used to populate it

pub mod levels;
pub mod result;
