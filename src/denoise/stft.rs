//! Short-time Fourier transform and its overlap-add inverse
//!
//! The denoiser only talks to [`ShortTimeTransform`], so the framing strategy can
//! be swapped without touching the subtraction code. [`HannStft`] is the default:
//!
//! 1. Pad `frame_size / 2` zeros on both ends, then zero-pad the tail to a whole hop
//! 2. Periodic Hann window, one-sided FFT, scaled by `1 / sum(window)`
//! 3. Inverse: un-scale, inverse FFT, window, overlap-add
//! 4. Divide by the summed squared window and drop the boundary padding
//!
//! The reconstructed length is `(num_frames - 1) * hop_size`, which is never shorter
//! than the input and exceeds it by less than one frame.
//!
//! # Example
//!
//! ```
//! use voxclean_dsp::denoise::stft::{HannStft, ShortTimeTransform};
//!
//! let stft = HannStft::default();
//! let samples = vec![0.25f32; 4096];
//! let spectrogram = stft.forward(&samples, 44100)?;
//! assert_eq!(spectrogram.num_bins(), 513);
//! let restored = stft.inverse(&spectrogram)?;
//! assert!(restored.len() >= samples.len());
//! # Ok::<(), voxclean_dsp::EnhanceError>(())
//! ```

use crate::error::EnhanceError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Analysis window length used by the denoiser
pub const DEFAULT_FRAME_SIZE: usize = 1024;

/// Hop between successive frames (50% overlap)
pub const DEFAULT_HOP_SIZE: usize = DEFAULT_FRAME_SIZE / 2;

/// Overlap-add normalisation below this value is left undivided
const NORM_EPSILON: f32 = 1e-10;

/// Complex time-frequency grid, indexed by (frequency bin, time frame)
///
/// Stored frame-major: all bins of frame 0, then all bins of frame 1, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    num_bins: usize,
    num_frames: usize,
    frame_size: usize,
    sample_rate: u32,
    data: Vec<Complex<f32>>,
}

impl Spectrogram {
    /// Create an all-zero spectrogram
    pub fn new(num_bins: usize, num_frames: usize, frame_size: usize, sample_rate: u32) -> Self {
        Self {
            num_bins,
            num_frames,
            frame_size,
            sample_rate,
            data: vec![Complex::new(0.0, 0.0); num_bins * num_frames],
        }
    }

    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Analysis window length that produced this spectrogram
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Sample rate of the analysed signal in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Centre frequency of `bin` in Hz
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.frame_size as f32
    }

    /// Coefficient at (`bin`, `frame`)
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, bin: usize, frame: usize) -> Complex<f32> {
        assert!(bin < self.num_bins, "bin {} out of range", bin);
        self.data[frame * self.num_bins + bin]
    }

    /// Magnitude at (`bin`, `frame`)
    pub fn magnitude(&self, bin: usize, frame: usize) -> f32 {
        self.get(bin, frame).norm()
    }

    /// All bins of one frame
    pub fn frame(&self, frame: usize) -> &[Complex<f32>] {
        let start = frame * self.num_bins;
        &self.data[start..start + self.num_bins]
    }

    /// Mutable access to all bins of one frame
    pub fn frame_mut(&mut self, frame: usize) -> &mut [Complex<f32>] {
        let start = frame * self.num_bins;
        &mut self.data[start..start + self.num_bins]
    }

    /// Iterate over frames in time order
    pub fn frames(&self) -> impl Iterator<Item = &[Complex<f32>]> {
        self.data.chunks_exact(self.num_bins.max(1))
    }

    pub(crate) fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, Complex<f32>> {
        self.data.chunks_exact_mut(self.num_bins.max(1))
    }

    pub(crate) fn data_mut(&mut self) -> &mut [Complex<f32>] {
        &mut self.data
    }
}

/// Forward/inverse short-time transform pair
pub trait ShortTimeTransform {
    /// Minimum number of input samples (one analysis frame)
    fn frame_size(&self) -> usize;

    /// Buffer to spectrogram
    fn forward(&self, samples: &[f32], sample_rate: u32) -> Result<Spectrogram, EnhanceError>;

    /// Spectrogram back to a real buffer
    fn inverse(&self, spectrogram: &Spectrogram) -> Result<Vec<f32>, EnhanceError>;
}

/// Hann-windowed STFT with boundary padding and weighted overlap-add inverse
pub struct HannStft {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    window_sum: f32,
    forward_fft: Arc<dyn Fft<f32>>,
    inverse_fft: Arc<dyn Fft<f32>>,
}

impl HannStft {
    /// Create a transform with the given frame and hop sizes
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `frame_size` is odd or smaller than 2, if `hop_size`
    /// is zero or larger than `frame_size`, or if the overlapped squared windows
    /// vanish anywhere (the hop leaves samples that cannot be reconstructed).
    pub fn new(frame_size: usize, hop_size: usize) -> Result<Self, EnhanceError> {
        if frame_size < 2 || frame_size % 2 != 0 {
            return Err(EnhanceError::invalid_parameter(
                "frame_size",
                format!("must be an even number >= 2, got {}", frame_size),
            ));
        }
        if hop_size == 0 || hop_size > frame_size {
            return Err(EnhanceError::invalid_parameter(
                "hop_size",
                format!("must be in 1..={}, got {}", frame_size, hop_size),
            ));
        }
        let stft = Self::build(frame_size, hop_size);
        if let Some(offset) = stft.unrecoverable_offset() {
            return Err(EnhanceError::invalid_parameter(
                "hop_size",
                format!(
                    "hop {} leaves no window overlap at offset {} of a {}-sample frame",
                    hop_size, offset, frame_size
                ),
            ));
        }
        Ok(stft)
    }

    /// First hop offset where the summed squared window drops to the inverse's floor
    fn unrecoverable_offset(&self) -> Option<usize> {
        (0..self.hop_size).find(|&offset| {
            let overlap: f32 = self
                .window
                .iter()
                .skip(offset)
                .step_by(self.hop_size)
                .map(|w| w * w)
                .sum();
            overlap <= NORM_EPSILON
        })
    }

    fn build(frame_size: usize, hop_size: usize) -> Self {
        // Periodic Hann
        let window: Vec<f32> = (0..frame_size)
            .map(|i| {
                0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / frame_size as f32).cos()
            })
            .collect();
        let window_sum = window.iter().sum();

        let mut planner = FftPlanner::new();
        let forward_fft = planner.plan_fft_forward(frame_size);
        let inverse_fft = planner.plan_fft_inverse(frame_size);

        Self {
            frame_size,
            hop_size,
            window,
            window_sum,
            forward_fft,
            inverse_fft,
        }
    }

    /// Hop between frames in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of frames `forward` produces for a buffer of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        let padded = len + self.frame_size;
        let span = padded - self.frame_size;
        let extra = (self.hop_size - span % self.hop_size) % self.hop_size;
        (span + extra) / self.hop_size + 1
    }

    /// Length of the buffer `inverse` produces for `num_frames` frames
    pub fn output_len(&self, num_frames: usize) -> usize {
        num_frames.saturating_sub(1) * self.hop_size
    }
}

impl Default for HannStft {
    fn default() -> Self {
        Self::build(DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE)
    }
}

impl fmt::Debug for HannStft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HannStft")
            .field("frame_size", &self.frame_size)
            .field("hop_size", &self.hop_size)
            .finish()
    }
}

impl ShortTimeTransform for HannStft {
    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn forward(&self, samples: &[f32], sample_rate: u32) -> Result<Spectrogram, EnhanceError> {
        if samples.len() < self.frame_size {
            return Err(EnhanceError::InsufficientSamples {
                required: self.frame_size,
                actual: samples.len(),
            });
        }

        let half = self.frame_size / 2;
        let num_frames = self.num_frames(samples.len());
        let num_bins = self.frame_size / 2 + 1;
        let padded_len = (num_frames - 1) * self.hop_size + self.frame_size;

        let mut padded = vec![0.0f32; padded_len];
        padded[half..half + samples.len()].copy_from_slice(samples);

        log::debug!(
            "STFT forward: {} samples, frame={}, hop={}, {} frames x {} bins",
            samples.len(),
            self.frame_size,
            self.hop_size,
            num_frames,
            num_bins
        );

        let mut spectrogram = Spectrogram::new(num_bins, num_frames, self.frame_size, sample_rate);
        let scale = 1.0 / self.window_sum;
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_size];
        let mut scratch =
            vec![Complex::new(0.0f32, 0.0); self.forward_fft.get_inplace_scratch_len()];

        for (frame_idx, bins) in spectrogram.frames_mut().enumerate() {
            let start = frame_idx * self.hop_size;
            let frame = &padded[start..start + self.frame_size];
            for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                *slot = Complex::new(x * w, 0.0);
            }

            self.forward_fft.process_with_scratch(&mut buffer, &mut scratch);

            for (out, &c) in bins.iter_mut().zip(&buffer) {
                *out = c * scale;
            }
        }

        Ok(spectrogram)
    }

    fn inverse(&self, spectrogram: &Spectrogram) -> Result<Vec<f32>, EnhanceError> {
        let num_bins = self.frame_size / 2 + 1;
        if spectrogram.frame_size() != self.frame_size || spectrogram.num_bins() != num_bins {
            return Err(EnhanceError::invalid_parameter(
                "spectrogram",
                format!(
                    "expected {} bins for frame size {}, got {} bins for frame size {}",
                    num_bins,
                    self.frame_size,
                    spectrogram.num_bins(),
                    spectrogram.frame_size()
                ),
            ));
        }
        if spectrogram.num_frames() == 0 {
            return Ok(Vec::new());
        }

        let nyquist = self.frame_size / 2;
        let full_len = (spectrogram.num_frames() - 1) * self.hop_size + self.frame_size;
        let mut output = vec![0.0f32; full_len];
        let mut norm = vec![0.0f32; full_len];

        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_size];
        let mut scratch =
            vec![Complex::new(0.0f32, 0.0); self.inverse_fft.get_inplace_scratch_len()];
        let inv_n = 1.0 / self.frame_size as f32;

        for (frame_idx, bins) in spectrogram.frames().enumerate() {
            // Rebuild the Hermitian spectrum; DC and Nyquist are real
            buffer[0] = Complex::new(bins[0].re * self.window_sum, 0.0);
            for k in 1..nyquist {
                let c = bins[k] * self.window_sum;
                buffer[k] = c;
                buffer[self.frame_size - k] = c.conj();
            }
            buffer[nyquist] = Complex::new(bins[nyquist].re * self.window_sum, 0.0);

            self.inverse_fft.process_with_scratch(&mut buffer, &mut scratch);

            let start = frame_idx * self.hop_size;
            for (i, (&c, &w)) in buffer.iter().zip(&self.window).enumerate() {
                output[start + i] += c.re * inv_n * w;
                norm[start + i] += w * w;
            }
        }

        for (sample, &n) in output.iter_mut().zip(&norm) {
            if n > NORM_EPSILON {
                *sample /= n;
            }
        }

        let half = self.frame_size / 2;
        let trimmed = output[half..full_len - half].to_vec();

        log::debug!(
            "STFT inverse: {} frames -> {} samples",
            spectrogram.num_frames(),
            trimmed.len()
        );

        Ok(trimmed)
    }
}
