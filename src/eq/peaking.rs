//! Second-order peaking resonator
//!
//! Coefficient design matches SciPy's `scipy.signal.iirpeak` (its `gb = 1/sqrt(2)`
//! term cancels out of `beta`), giving a -3 dB bandwidth of `w0 / Q`:
//!
//! ```text
//! w0   = pi * f / (fs / 2)
//! beta = tan(w0 / (2 Q))
//! g    = 1 / (1 + beta)
//! b    = (1 - g) * [1, 0, -1]
//! a    = [1, -2 g cos(w0), 2 g - 1]
//! ```
//!
//! The response is unity at the centre frequency and zero at DC and Nyquist.

use crate::error::EnhanceError;

/// Recursive filter coefficients, `a[0]` normalised to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakingResonator {
    /// Feed-forward taps
    pub b: [f32; 3],
    /// Feedback taps (`a[0] == 1`)
    pub a: [f32; 3],
}

impl PeakingResonator {
    /// Design a resonator at `normalized_freq` (fraction of Nyquist, exclusive 0..1)
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `normalized_freq` is outside (0, 1) or `q` is not a
    /// positive finite number.
    pub fn design(normalized_freq: f32, q: f32) -> Result<Self, EnhanceError> {
        if !(normalized_freq > 0.0 && normalized_freq < 1.0) {
            return Err(EnhanceError::invalid_parameter(
                "normalized_freq",
                format!("must be in (0, 1), got {}", normalized_freq),
            ));
        }
        if !q.is_finite() || q <= 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "q",
                format!("must be finite and > 0, got {}", q),
            ));
        }

        let w0 = std::f32::consts::PI * normalized_freq;
        let bandwidth = w0 / q;
        let beta = (bandwidth / 2.0).tan();
        let g = 1.0 / (1.0 + beta);

        Ok(Self {
            b: [1.0 - g, 0.0, -(1.0 - g)],
            a: [1.0, -2.0 * g * w0.cos(), 2.0 * g - 1.0],
        })
    }

    /// Filter `input` from zero initial state (direct form II transposed)
    pub fn filter(&self, input: &[f32]) -> Vec<f32> {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        let mut z1 = 0.0f32;
        let mut z2 = 0.0f32;

        input
            .iter()
            .map(|&x| {
                let y = b0 * x + z1;
                z1 = b1 * x - a1 * y + z2;
                z2 = b2 * x - a2 * y;
                y
            })
            .collect()
    }

    /// Magnitude response at `normalized_freq` (fraction of Nyquist)
    pub fn magnitude_at(&self, normalized_freq: f32) -> f32 {
        let w = std::f32::consts::PI * normalized_freq;
        let eval = |c: &[f32; 3]| {
            let re = c[0] + c[1] * w.cos() + c[2] * (2.0 * w).cos();
            let im = -(c[1] * w.sin() + c[2] * (2.0 * w).sin());
            (re * re + im * im).sqrt()
        };
        eval(&self.b) / eval(&self.a)
    }
}
