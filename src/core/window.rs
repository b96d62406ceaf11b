//! Window functions for overlap-add synthesis.
//!
//! WSOLA defaults to a Hann window; Blackman-Harris is available for callers
//! that prefer stronger sidelobe suppression at the cost of a wider main lobe.

use std::f64::consts::PI;

/// Blackman-Harris window coefficients (4-term).
const BH_A0: f64 = 0.35875;
const BH_A1: f64 = 0.48829;
const BH_A2: f64 = 0.14128;
const BH_A3: f64 = 0.01168;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Hann,
    BlackmanHarris,
}

/// Generates a window of the given type and size. All values lie in [0, 1].
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f32> {
    match window_type {
        WindowType::Hann => hann_window(size),
        WindowType::BlackmanHarris => blackman_harris_window(size),
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f32>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Generates a Hann window.
#[inline]
fn hann_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / (n - 1.0);
            (0.5 * (1.0 - x.cos())) as f32
        })
        .collect()
}

/// Generates a Blackman-Harris window.
#[inline]
fn blackman_harris_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64 / (n - 1.0);
            let w = BH_A0 - BH_A1 * (2.0 * PI * x).cos() + BH_A2 * (4.0 * PI * x).cos()
                - BH_A3 * (6.0 * PI * x).cos();
            // The 4-term expansion dips a hair below zero at the edges.
            w.max(0.0) as f32
        })
        .collect()
}

/// Sum of squared window values. Used for overlap-add gain calibration.
#[inline]
pub fn window_energy(window: &[f32]) -> f32 {
    window.iter().map(|&w| w * w).sum()
}
