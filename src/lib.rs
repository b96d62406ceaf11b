#![forbid(unsafe_code)]
//! Pure Rust time-scale modification using WSOLA.
//!
//! `wsola` changes the duration of audio without altering its pitch using
//! the Waveform-Similarity Overlap-Add technique: frames are taken from the
//! input at the analysis hop, aligned against the previously synthesized
//! frame by cross-correlation, and overlap-added into the output at the
//! synthesis hop. Frame sizes are derived from the stretch ratio and the
//! signal's sampling rate, or can be supplied explicitly.
//!
//! # Quick Start
//!
//! ```
//! use wsola::{AudioSignal, Wsola};
//!
//! // 1 second of 440 Hz sine at 22.05 kHz
//! let samples: Vec<f32> = (0..22050)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22050.0).sin())
//!     .collect();
//! let signal = AudioSignal::new(samples, 22050);
//!
//! let slower = Wsola::new(1.5).unwrap().apply_to(&signal);
//! assert!(slower.len() > signal.len()); // ~1.5x longer
//! assert_eq!(slower.sample_rate, 22050);
//! ```
//!
//! # Explicit parameters
//!
//! ```
//! use wsola::{AudioSignal, Wsola};
//!
//! let wsola = Wsola::with_params(2.0, 512, 128, 0).unwrap();
//! let (params, adjustments) = wsola.resolution();
//! assert_eq!(params.hop_synthesis, 256);
//! assert!(adjustments.delta_defaulted); // max_delta 0 fell back to hop_synthesis
//! ```

pub mod core;
pub mod error;
pub mod io;
pub mod stretch;

pub use self::core::types::{AudioSignal, Sample};
pub use self::core::window::WindowType;
pub use error::TsmError;
pub use stretch::params::{Adjustments, ResolvedParams};
pub use stretch::wsola::{Wsola, GAIN_CORRECTION};

/// Validates that input contains only finite samples.
///
/// Returns `Ok(false)` if input is empty (caller should return an empty
/// output), `Ok(true)` if input is valid, or `Err` if it contains NaN/Inf.
#[inline]
fn validate_input(input: &[f32]) -> Result<bool, TsmError> {
    if input.is_empty() {
        return Ok(false);
    }
    if input.iter().any(|s| !s.is_finite()) {
        return Err(TsmError::NonFiniteInput);
    }
    Ok(true)
}

/// Stretches raw samples by the given ratio.
///
/// One-shot entry point for callers holding a plain sample slice. Empty
/// input yields empty output; otherwise the result has the allocated
/// WSOLA output length (`ceil(ratio * (len + window_size))`, zero-padded
/// tail included).
///
/// # Errors
///
/// Returns [`TsmError::InvalidRatio`] for a non-positive or non-finite
/// ratio, and [`TsmError::NonFiniteInput`] if any sample is NaN/Inf.
pub fn stretch(input: &[f32], sample_rate: u32, ratio: f64) -> Result<Vec<f32>, TsmError> {
    if !validate_input(input)? {
        return Ok(vec![]);
    }
    let signal = AudioSignal::new(input.to_vec(), sample_rate);
    Ok(Wsola::new(ratio)?.apply_to(&signal).samples)
}

/// Stretches an [`AudioSignal`] and returns a new signal.
///
/// # Errors
///
/// Same conditions as [`stretch`].
pub fn stretch_signal(signal: &AudioSignal, ratio: f64) -> Result<AudioSignal, TsmError> {
    if !validate_input(&signal.samples)? {
        return Ok(AudioSignal::new(vec![], signal.sample_rate));
    }
    Ok(Wsola::new(ratio)?.apply_to(signal))
}

/// Reads a WAV file, stretches it, and writes the result as 32-bit float WAV.
///
/// The sampling rate is taken from the input file; multi-channel input is
/// downmixed to mono before processing.
///
/// # Errors
///
/// Returns [`TsmError::IoError`] if the files cannot be read or written,
/// [`TsmError::InvalidFormat`] for malformed WAV data, and the
/// [`stretch_signal`] errors for bad ratios or samples.
pub fn stretch_wav_file(
    input_path: &str,
    output_path: &str,
    ratio: f64,
) -> Result<AudioSignal, TsmError> {
    let signal = io::wav::read_wav_file(input_path)?;
    let result = stretch_signal(&signal, ratio)?;
    io::wav::write_wav_file_float(output_path, &result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    // Compile-time assertion that the key public types are Send + Sync,
    // so processing can run on a dedicated thread.
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<AudioSignal>();
            assert_send_sync::<Wsola>();
            assert_send_sync::<TsmError>();
        }
        let _ = check;
    };

    fn sine(freq: f32, sample_rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_stretch_empty() {
        let output = stretch(&[], 22050, 1.5).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_stretch_sine_lengthens() {
        let input = sine(440.0, 22050, 22050);
        let output = stretch(&input, 22050, 1.5).unwrap();
        let len_ratio = output.len() as f64 / input.len() as f64;
        assert!(
            (len_ratio - 1.5).abs() < 0.2,
            "length ratio {} too far from 1.5",
            len_ratio
        );
    }

    #[test]
    fn test_stretch_invalid_ratio() {
        let input = sine(440.0, 22050, 4000);
        assert!(stretch(&input, 22050, 0.0).is_err());
        assert!(stretch(&input, 22050, -2.0).is_err());
        assert!(stretch(&input, 22050, f64::NAN).is_err());
    }

    #[test]
    fn test_stretch_rejects_non_finite_samples() {
        let mut input = sine(440.0, 22050, 4000);
        input[100] = f32::NAN;
        assert!(matches!(
            stretch(&input, 22050, 1.5),
            Err(TsmError::NonFiniteInput)
        ));
        input[100] = f32::INFINITY;
        assert!(matches!(
            stretch(&input, 22050, 1.5),
            Err(TsmError::NonFiniteInput)
        ));
    }

    #[test]
    fn test_stretch_signal_keeps_rate() {
        let signal = AudioSignal::new(sine(440.0, 48000, 48000), 48000);
        let output = stretch_signal(&signal, 0.8).unwrap();
        assert_eq!(output.sample_rate, 48000);
        assert!(!output.is_empty());
    }

    #[test]
    fn test_stretch_wav_file_roundtrip() {
        let dir = std::env::temp_dir();
        let in_path = dir.join("wsola_test_in.wav");
        let out_path = dir.join("wsola_test_out.wav");

        let signal = AudioSignal::new(sine(440.0, 22050, 22050), 22050);
        io::wav::write_wav_file_float(in_path.to_str().unwrap(), &signal).unwrap();

        let result =
            stretch_wav_file(in_path.to_str().unwrap(), out_path.to_str().unwrap(), 1.5).unwrap();
        assert!(!result.is_empty());

        let reloaded = io::wav::read_wav_file(out_path.to_str().unwrap()).unwrap();
        assert_eq!(reloaded.samples.len(), result.samples.len());
        assert_eq!(reloaded.sample_rate, 22050);

        let _ = std::fs::remove_file(&in_path);
        let _ = std::fs::remove_file(&out_path);
    }

    #[test]
    fn test_stretch_wav_file_missing_input() {
        let result = stretch_wav_file("/nonexistent/input.wav", "/tmp/wsola_out.wav", 1.5);
        assert!(result.is_err());
    }
}
