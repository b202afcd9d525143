//! Audio file I/O
//!
//! WAV reading and writing using hound.

pub mod wav;

pub use wav::{decode_wav, encode_wav, enhance_wav_file, read_wav_mono, write_wav, WavFormat};
