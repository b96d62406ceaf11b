//! Derivation of WSOLA frame parameters from the stretch ratio.
//!
//! Window size, analysis hop, and search range are tuned per stretch-ratio
//! tier against a 22050 Hz reference rate, then rescaled when the processed
//! signal uses a different rate. Out-of-range caller values are clamped to
//! safe minimums rather than rejected; every clamp is reported in
//! [`Adjustments`] so callers and tests can observe what happened.

use serde::{Deserialize, Serialize};

/// Sampling rate the preset table is tuned for.
pub const REFERENCE_SAMPLE_RATE: u32 = 22050;

/// Smallest usable analysis window.
pub const MIN_WINDOW_SIZE: usize = 32;

/// Smallest usable analysis hop.
pub const MIN_HOP_ANALYSIS: usize = 10;

/// Concrete integer parameters driving the synthesis loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedParams {
    /// Analysis/synthesis frame length in samples.
    pub window_size: usize,
    /// Frame advance on the input timeline.
    pub hop_analysis: usize,
    /// Frame advance on the output timeline: `trunc(hop_analysis * stretch)`.
    pub hop_synthesis: usize,
    /// Bound on the similarity search range.
    pub max_delta: usize,
}

/// Record of the silent corrections applied while resolving parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    /// `window_size` was raised to [`MIN_WINDOW_SIZE`].
    pub window_clamped: bool,
    /// `hop_analysis` was raised to [`MIN_HOP_ANALYSIS`].
    pub hop_clamped: bool,
    /// `max_delta` was not usable as supplied and defaulted to `hop_synthesis`.
    pub delta_defaulted: bool,
    /// Auto-derived parameters were rescaled for a non-reference sampling rate.
    pub rate_rescaled: bool,
}

/// Caller-supplied sizes, each subject to the clamping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplicitParams {
    pub window_size: usize,
    pub hop_analysis: usize,
    /// Values of 2 or less mean "default to the synthesis hop".
    pub max_delta: usize,
}

/// Preset window size and analysis hop for a stretch-ratio tier,
/// tuned for the 22050 Hz reference rate.
fn preset_for(stretch: f64) -> (usize, usize) {
    if stretch > 1.5 {
        (1024, 128)
    } else if stretch > 1.1 {
        (1536, 256)
    } else if stretch > 0.6 {
        (1536, 690)
    } else {
        (1024, 896)
    }
}

/// Synthesis hop for a given analysis hop, truncated with a floor of one
/// sample so extreme compression ratios cannot stall the output cursor.
#[inline]
fn synthesis_hop(hop_analysis: usize, stretch: f64) -> usize {
    ((hop_analysis as f64 * stretch) as usize).max(1)
}

/// Resolves concrete loop parameters for a stretch ratio and sampling rate.
///
/// With `explicit` parameters the supplied sizes are clamped and used as-is
/// regardless of the sampling rate. Without them, the preset tier for the
/// ratio is selected and, if `sample_rate` differs from
/// [`REFERENCE_SAMPLE_RATE`], all sizes are rescaled by
/// `sample_rate / 22050` (truncating) and the synthesis hop is recomputed.
///
/// Pure: no hidden state, no mutation; calling twice with the same inputs
/// yields identical results.
pub fn resolve(
    stretch: f64,
    explicit: Option<ExplicitParams>,
    sample_rate: u32,
) -> (ResolvedParams, Adjustments) {
    let mut adj = Adjustments::default();

    if let Some(supplied) = explicit {
        let window_size = supplied.window_size.max(MIN_WINDOW_SIZE);
        adj.window_clamped = window_size != supplied.window_size;

        let hop_analysis = supplied.hop_analysis.max(MIN_HOP_ANALYSIS);
        adj.hop_clamped = hop_analysis != supplied.hop_analysis;

        let hop_synthesis = synthesis_hop(hop_analysis, stretch);
        let max_delta = if supplied.max_delta > 2 {
            supplied.max_delta
        } else {
            adj.delta_defaulted = true;
            hop_synthesis
        };

        return (
            ResolvedParams {
                window_size,
                hop_analysis,
                hop_synthesis,
                max_delta,
            },
            adj,
        );
    }

    let (mut window_size, mut hop_analysis) = preset_for(stretch);
    let mut hop_synthesis = synthesis_hop(hop_analysis, stretch);
    let mut max_delta = hop_synthesis;

    if sample_rate != REFERENCE_SAMPLE_RATE {
        let factor = sample_rate as f64 / REFERENCE_SAMPLE_RATE as f64;
        window_size = ((window_size as f64 * factor) as usize).max(MIN_WINDOW_SIZE);
        hop_analysis = ((hop_analysis as f64 * factor) as usize).max(MIN_HOP_ANALYSIS);
        max_delta = ((max_delta as f64 * factor) as usize).max(1);
        hop_synthesis = synthesis_hop(hop_analysis, stretch);
        adj.rate_rescaled = true;
    }

    (
        ResolvedParams {
            window_size,
            hop_analysis,
            hop_synthesis,
            max_delta,
        },
        adj,
    )
}
