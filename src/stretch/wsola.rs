//! WSOLA (Waveform Similarity Overlap-Add) time-scale modification.
//!
//! Walks the input one analysis hop at a time, searches for the shift that
//! best continues the previously synthesized frame, and overlap-adds the
//! windowed frame into the output with a per-hop gain correction.

use crate::core::types::AudioSignal;
use crate::core::window::{generate_window, window_energy, WindowType};
use crate::error::TsmError;
use crate::stretch::params::{
    resolve, Adjustments, ExplicitParams, ResolvedParams, REFERENCE_SAMPLE_RATE,
};
use crate::stretch::search::select_strategy;

/// Empirical gain correction for Hann-window overlap-add energy.
///
/// Tuned for the default Hann window; override per instance with
/// [`Wsola::with_gain_correction`] when using a different window.
pub const GAIN_CORRECTION: f32 = 0.75;

/// WSOLA time-scale modification processor.
///
/// Changes the duration of a signal without altering its pitch. A processor
/// is configured once with a stretch ratio (and optionally explicit frame
/// parameters) and can then be applied to any number of signals; parameters
/// are re-derived per call from each signal's sampling rate, so one instance
/// is safe to reuse across signals of different rates.
pub struct Wsola {
    stretch: f64,
    explicit: Option<ExplicitParams>,
    window_type: WindowType,
    gain_correction: f32,
}

impl Wsola {
    /// Creates a processor with auto-derived parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TsmError::InvalidRatio`] if `stretch` is not positive and finite.
    pub fn new(stretch: f64) -> Result<Self, TsmError> {
        validate_ratio(stretch)?;
        Ok(Self {
            stretch,
            explicit: None,
            window_type: WindowType::Hann,
            gain_correction: GAIN_CORRECTION,
        })
    }

    /// Creates a processor with explicit frame parameters.
    ///
    /// `window_size` and `hop_analysis` are clamped to their minimums;
    /// a `max_delta` of 2 or less defaults to the synthesis hop. The applied
    /// corrections are observable via [`Wsola::resolution`].
    ///
    /// # Errors
    ///
    /// Returns [`TsmError::InvalidRatio`] if `stretch` is not positive and finite.
    pub fn with_params(
        stretch: f64,
        window_size: usize,
        hop_analysis: usize,
        max_delta: usize,
    ) -> Result<Self, TsmError> {
        validate_ratio(stretch)?;
        Ok(Self {
            stretch,
            explicit: Some(ExplicitParams {
                window_size,
                hop_analysis,
                max_delta,
            }),
            window_type: WindowType::Hann,
            gain_correction: GAIN_CORRECTION,
        })
    }

    /// Sets the synthesis window type.
    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Overrides the overlap-add gain correction factor.
    pub fn with_gain_correction(mut self, factor: f32) -> Self {
        self.gain_correction = factor;
        self
    }

    /// Returns the configured stretch ratio.
    #[inline]
    pub fn stretch_ratio(&self) -> f64 {
        self.stretch
    }

    /// Parameter resolution at the 22050 Hz reference rate.
    pub fn resolution(&self) -> (ResolvedParams, Adjustments) {
        resolve(self.stretch, self.explicit, REFERENCE_SAMPLE_RATE)
    }

    /// Parameter resolution for a signal of the given sampling rate.
    ///
    /// Auto-derived parameters are rescaled by `sample_rate / 22050`;
    /// explicit parameters are used unchanged. Pure: repeated calls with the
    /// same rate return the same resolution.
    pub fn params_for_rate(&self, sample_rate: u32) -> (ResolvedParams, Adjustments) {
        resolve(self.stretch, self.explicit, sample_rate)
    }

    /// Applies time-scale modification and returns the stretched signal.
    ///
    /// The output keeps the input's sampling rate and has length
    /// `ceil(stretch * (input_len + window_size))`; samples past the last
    /// synthesized frame are zero. Inputs too short to supply even one
    /// frame-plus-search-plus-hop produce an all-zero output of that same
    /// allocated length.
    pub fn apply_to(&self, signal: &AudioSignal) -> AudioSignal {
        let (params, _) = self.params_for_rate(signal.sample_rate);
        let ResolvedParams {
            window_size,
            hop_analysis,
            hop_synthesis,
            max_delta,
        } = params;

        let input = &signal.samples;
        let output_len = (self.stretch * (input.len() + window_size) as f64).ceil() as usize;
        let mut output = vec![0.0f32; output_len];

        let window = generate_window(self.window_type, window_size);
        let energy = window_energy(&window);
        let gain = if energy > f32::EPSILON {
            hop_synthesis as f32 / energy * self.gain_correction
        } else {
            0.0
        };

        let mut search = select_strategy(window_size, max_delta);

        // Scratch frames, allocated once and overwritten every iteration.
        let mut current = vec![0.0f32; window_size + max_delta];
        let mut prev = vec![0.0f32; window_size];

        let half_delta = max_delta / 2;
        let mut pos_analysis = 0usize;
        let mut pos_synthesis = 0usize;

        while pos_analysis + window_size + max_delta + hop_synthesis < input.len() {
            // Near the signal start there is no room to search backward:
            // take the frame at the cursor and skip the search.
            let shift = if pos_analysis > half_delta {
                let start = pos_analysis - half_delta;
                current.copy_from_slice(&input[start..start + window_size + max_delta]);
                search.best_shift(&current, &prev)
            } else {
                current.copy_from_slice(&input[pos_analysis..pos_analysis + window_size + max_delta]);
                0
            };

            let writable = window_size.min(output_len.saturating_sub(pos_synthesis));
            for j in 0..writable {
                output[pos_synthesis + j] += current[shift + j] * window[j];
            }

            // Each hop range [pos_synthesis, pos_synthesis + hop_synthesis)
            // is disjoint from every other iteration's, so the correction
            // touches each output sample exactly once.
            let corrected = hop_synthesis.min(output_len.saturating_sub(pos_synthesis));
            for j in 0..corrected {
                output[pos_synthesis + j] *= gain;
            }

            // The slice that becomes temporally adjacent to the next
            // synthesized block is the correlation reference for the next
            // search.
            let prev_start = (pos_analysis + shift + hop_synthesis).saturating_sub(half_delta);
            prev.copy_from_slice(&input[prev_start..prev_start + window_size]);

            pos_analysis += hop_analysis;
            pos_synthesis += hop_synthesis;
        }

        AudioSignal::new(output, signal.sample_rate)
    }
}

fn validate_ratio(stretch: f64) -> Result<(), TsmError> {
    if !stretch.is_finite() || stretch <= 0.0 {
        return Err(TsmError::InvalidRatio(format!(
            "must be positive and finite, got {}",
            stretch
        )));
    }
    Ok(())
}
