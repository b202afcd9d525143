//! WAV ingest and export using hound
//!
//! Decoding of other containers is left to the caller. Multi-channel files are
//! averaged to mono on read.

use crate::analysis::result::EnhancementResult;
use crate::config::EnhancementConfig;
use crate::error::EnhanceError;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

/// Sample encoding for exported WAV files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavFormat {
    /// 16-bit signed PCM, clipped to [-1, 1]
    #[default]
    Pcm16,
    /// 32-bit IEEE float, written as-is
    Float32,
}

/// Read a WAV file as normalized mono samples
///
/// # Returns
///
/// `(samples, sample_rate)`
pub fn read_wav_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32), EnhanceError> {
    let path = path.as_ref();
    log::debug!("Reading WAV file: {}", path.display());
    let reader = hound::WavReader::open(path)?;
    decode_reader(reader)
}

/// Decode WAV bytes from any reader as normalized mono samples
pub fn decode_wav<R: Read>(reader: R) -> Result<(Vec<f32>, u32), EnhanceError> {
    decode_reader(hound::WavReader::new(reader)?)
}

fn decode_reader<R: Read>(mut reader: hound::WavReader<R>) -> Result<(Vec<f32>, u32), EnhanceError> {
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(EnhanceError::AudioIo(format!(
                    "unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let max_value = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    log::debug!(
        "Decoded {} samples: {} channel(s), {} Hz, {} bit {:?}",
        interleaved.len(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    let mono = downmix_interleaved(&interleaved, spec.channels as usize)?;
    Ok((mono, spec.sample_rate))
}

/// Write mono samples to a WAV file
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
    format: WavFormat,
) -> Result<(), EnhanceError> {
    let path = path.as_ref();
    log::debug!(
        "Writing {} samples at {} Hz to {} ({:?})",
        samples.len(),
        sample_rate,
        path.display(),
        format
    );
    let writer = hound::WavWriter::create(path, wav_spec(sample_rate, format))?;
    write_samples(writer, samples, format)
}

/// Encode mono samples as an in-memory WAV byte stream
pub fn encode_wav(samples: &[f32], sample_rate: u32, format: WavFormat) -> Result<Vec<u8>, EnhanceError> {
    let mut cursor = Cursor::new(Vec::new());
    let writer = hound::WavWriter::new(&mut cursor, wav_spec(sample_rate, format))?;
    write_samples(writer, samples, format)?;
    Ok(cursor.into_inner())
}

fn wav_spec(sample_rate: u32, format: WavFormat) -> hound::WavSpec {
    let (bits_per_sample, sample_format) = match format {
        WavFormat::Pcm16 => (16, hound::SampleFormat::Int),
        WavFormat::Float32 => (32, hound::SampleFormat::Float),
    };
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample,
        sample_format,
    }
}

fn write_samples<W: Write + Seek>(
    mut writer: hound::WavWriter<W>,
    samples: &[f32],
    format: WavFormat,
) -> Result<(), EnhanceError> {
    match format {
        WavFormat::Pcm16 => {
            for &s in samples {
                let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
                writer.write_sample(value)?;
            }
        }
        WavFormat::Float32 => {
            for &s in samples {
                writer.write_sample(s)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Read `input`, run the pipeline, write the result to `output` as 16-bit PCM
pub fn enhance_wav_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &EnhancementConfig,
) -> Result<EnhancementResult, EnhanceError> {
    let (samples, sample_rate) = read_wav_mono(input)?;
    let result = crate::enhance_audio(&samples, sample_rate, config)?;
    write_wav(output, &result.samples, result.sample_rate, WavFormat::Pcm16)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_pcm16() {
        let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0, 1.7];
        let bytes = encode_wav(&samples, 22050, WavFormat::Pcm16).unwrap();
        let (decoded, sample_rate) = decode_wav(Cursor::new(bytes)).unwrap();

        assert_eq!(sample_rate, 22050);
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(&decoded) {
            assert!((a.clamp(-1.0, 1.0) - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_encode_decode_float_is_lossless() {
        let samples = vec![0.123f32, -0.456, 1.5];
        let bytes = encode_wav(&samples, 48000, WavFormat::Float32).unwrap();
        let (decoded, _) = decode_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_stereo_is_averaged() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &(l, r) in &[(1.0f32, 0.0f32), (0.2, 0.4), (-1.0, -0.5)] {
                writer.write_sample(l).unwrap();
                writer.write_sample(r).unwrap();
            }
            writer.finalize().unwrap();
        }
        let (mono, _) = decode_wav(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.5).abs() < 1e-7);
        assert!((mono[1] - 0.3).abs() < 1e-7);
        assert!((mono[2] + 0.75).abs() < 1e-7);
    }

    #[test]
    fn test_garbage_is_audio_io_error() {
        let result = decode_wav(Cursor::new(b"not a wav file".to_vec()));
        assert!(matches!(result, Err(EnhanceError::AudioIo(_))));
    }
}
