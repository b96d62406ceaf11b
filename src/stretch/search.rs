//! Waveform-similarity search strategies.
//!
//! Both strategies answer the same question: at which shift inside the
//! search range does the candidate frame line up best with the previous
//! synthesis frame? Small problems use a direct time-domain scan; large
//! ones compute every lag at once with the FFT engine. The choice is made
//! once per configuration, not per call.

use crate::core::correlate::CrossCorrelator;

/// Transform sizes at or above this use FFT-accelerated correlation.
///
/// Direct search costs `O(max_delta * window_size)` per call; the FFT path
/// costs `O(n log n)` in the transform size but carries constant overhead
/// that only pays off once the problem is big enough.
pub const FFT_TRANSFORM_THRESHOLD: usize = 512;

/// Transform size the strategy selection is based on.
#[inline]
pub fn transform_size(window_size: usize, max_delta: usize) -> usize {
    (window_size + max_delta - 1).next_power_of_two()
}

/// A waveform-similarity search over shifts `[0, max_delta)`.
///
/// `current` must hold `window_size + max_delta` samples and `prev` exactly
/// `window_size`; the returned shift maximizes the unnormalized
/// cross-correlation `Σ_j current[shift + j] * prev[j]`. Ties break toward
/// the lowest shift, and if no candidate correlates positively the shift
/// defaults to 0. Neither input is mutated.
pub trait SimilaritySearch {
    fn best_shift(&mut self, current: &[f32], prev: &[f32]) -> usize;
}

/// Brute-force time-domain search.
pub struct DirectSearch {
    max_delta: usize,
}

impl DirectSearch {
    pub fn new(max_delta: usize) -> Self {
        Self { max_delta }
    }
}

impl SimilaritySearch for DirectSearch {
    fn best_shift(&mut self, current: &[f32], prev: &[f32]) -> usize {
        let mut best_shift = 0usize;
        let mut best_corr = 0.0f64;

        for shift in 0..self.max_delta {
            let mut corr = 0.0f64;
            for (j, &p) in prev.iter().enumerate() {
                corr += current[shift + j] as f64 * p as f64;
            }
            if corr > best_corr {
                best_corr = corr;
                best_shift = shift;
            }
        }

        best_shift
    }
}

/// FFT-accelerated search: one cross-correlation call covers every shift.
pub struct FftSearch {
    max_delta: usize,
    correlator: CrossCorrelator,
    scratch: Vec<f32>,
}

impl FftSearch {
    pub fn new(window_size: usize, max_delta: usize) -> Self {
        let correlator = CrossCorrelator::new(window_size + max_delta, window_size);
        let scratch = vec![0.0f32; correlator.fft_size()];
        Self {
            max_delta,
            correlator,
            scratch,
        }
    }
}

impl SimilaritySearch for FftSearch {
    fn best_shift(&mut self, current: &[f32], prev: &[f32]) -> usize {
        self.correlator
            .cross_correlate(current, prev, &mut self.scratch);

        // Positive lags start at index prev.len() - 1 in the correlation buffer.
        let base = prev.len() - 1;
        let mut best_shift = 0usize;
        let mut best_corr = 0.0f32;

        for shift in 0..self.max_delta {
            let corr = self.scratch[base + shift];
            if corr > best_corr {
                best_corr = corr;
                best_shift = shift;
            }
        }

        best_shift
    }
}

/// Picks the search strategy for the resolved frame parameters.
pub fn select_strategy(window_size: usize, max_delta: usize) -> Box<dyn SimilaritySearch> {
    if transform_size(window_size, max_delta) >= FFT_TRANSFORM_THRESHOLD {
        Box::new(FftSearch::new(window_size, max_delta))
    } else {
        Box::new(DirectSearch::new(max_delta))
    }
}
