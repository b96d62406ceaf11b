#![allow(dead_code)]

use std::f32::consts::PI;

/// Mono sine wave generator.
pub fn gen_sine(freq_hz: f32, sample_rate: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Linearly increasing ramp: x[i] = i.
pub fn gen_ramp(n: usize) -> Vec<f32> {
    (0..n).map(|i| i as f32).collect()
}

/// Deterministic pseudo-random sequence in [-1, 1] from a fixed seed
/// (linear congruential generator).
pub fn gen_noise(seed: u32, n: usize) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            ((state >> 16) & 0x7fff) as f32 / 16383.5 - 1.0
        })
        .collect()
}

/// Root mean square of a slice.
pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = signal.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Largest absolute sample-to-sample difference within the slice.
pub fn max_jump(signal: &[f32]) -> f32 {
    signal
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f32::max)
}

/// Length of the signal with trailing zeros stripped.
pub fn trimmed_len(signal: &[f32]) -> usize {
    signal
        .iter()
        .rposition(|&s| s != 0.0)
        .map(|i| i + 1)
        .unwrap_or(0)
}
