//! FFT-accelerated linear cross-correlation.
//!
//! The similarity search needs the cross-correlation of a candidate frame
//! against the previous synthesis frame at every admissible lag. For large
//! frames it is cheaper to compute all lags at once in the frequency domain
//! than to evaluate them one by one in the time domain.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Zero-valued complex number, used for FFT buffer initialization.
const COMPLEX_ZERO: Complex<f32> = Complex::new(0.0, 0.0);

/// Cross-correlation engine with a fixed transform size.
///
/// Plans its FFTs once at construction for operands of length `a_len` and
/// `b_len`, and reuses its internal complex buffers across calls, so a
/// processing loop can invoke [`cross_correlate`](Self::cross_correlate)
/// per iteration without allocating.
///
/// Output convention: the full linear cross-correlation occupies the first
/// `a_len + b_len - 1` slots of the output buffer, with
/// `out[b_len - 1 + k] = Σ_j a[k + j] * b[j]` for lag `k >= 0`.
pub struct CrossCorrelator {
    fft_size: usize,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
    a_spec: Vec<Complex<f32>>,
    b_spec: Vec<Complex<f32>>,
}

impl CrossCorrelator {
    /// Creates an engine for operands of at most `a_len` and `b_len` samples.
    pub fn new(a_len: usize, b_len: usize) -> Self {
        let fft_size = (a_len + b_len).saturating_sub(1).max(2).next_power_of_two();
        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(fft_size);
        let inv = planner.plan_fft_inverse(fft_size);
        Self {
            fft_size,
            fwd,
            inv,
            a_spec: vec![COMPLEX_ZERO; fft_size],
            b_spec: vec![COMPLEX_ZERO; fft_size],
        }
    }

    /// Transform length. The output buffer passed to
    /// [`cross_correlate`](Self::cross_correlate) must be at least this long.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Writes the linear cross-correlation of `a` and `b` into `out`.
    ///
    /// Implemented as the convolution of `a` with time-reversed `b`:
    /// forward-transform both zero-padded operands, multiply the spectra,
    /// inverse-transform, and scale by `1 / fft_size`. Slots past
    /// `a.len() + b.len() - 1` are left at whatever the transform produced
    /// and must not be read.
    pub fn cross_correlate(&mut self, a: &[f32], b: &[f32], out: &mut [f32]) {
        debug_assert!(a.len() + b.len() <= self.fft_size + 1);
        debug_assert!(out.len() >= self.fft_size);

        for slot in self.a_spec.iter_mut() {
            *slot = COMPLEX_ZERO;
        }
        for (slot, &s) in self.a_spec.iter_mut().zip(a.iter()) {
            *slot = Complex::new(s, 0.0);
        }

        for slot in self.b_spec.iter_mut() {
            *slot = COMPLEX_ZERO;
        }
        for (slot, &s) in self.b_spec.iter_mut().zip(b.iter().rev()) {
            *slot = Complex::new(s, 0.0);
        }

        self.fwd.process(&mut self.a_spec);
        self.fwd.process(&mut self.b_spec);

        for (ca, cb) in self.a_spec.iter_mut().zip(self.b_spec.iter()) {
            *ca *= *cb;
        }

        self.inv.process(&mut self.a_spec);

        let norm = 1.0 / self.fft_size as f32;
        for (o, c) in out.iter_mut().zip(self.a_spec.iter()) {
            *o = c.re * norm;
        }
    }
}
