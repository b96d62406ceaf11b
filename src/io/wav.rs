//! Minimal WAV reading and writing.
//!
//! Supports 16-bit PCM and 32-bit float files. The processing core is mono,
//! so multi-channel files are downmixed (channel average) on read; writers
//! always produce mono output.

use crate::core::types::AudioSignal;
use crate::error::TsmError;

/// WAV audio format codes.
const WAV_FORMAT_PCM: u16 = 1;
const WAV_FORMAT_IEEE_FLOAT: u16 = 3;

#[inline]
fn read_u16_le(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

#[inline]
fn read_u32_le(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

fn format_err(msg: &str) -> TsmError {
    TsmError::InvalidFormat(msg.to_string())
}

/// Parses a WAV byte stream into a mono [`AudioSignal`].
pub fn read_wav(data: &[u8]) -> Result<AudioSignal, TsmError> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(format_err("not a RIFF/WAVE stream"));
    }

    let mut format_code = 0u16;
    let mut num_channels = 0u16;
    let mut sample_rate = 0u32;
    let mut bits_per_sample = 0u16;
    let mut audio_data: Option<&[u8]> = None;

    let mut cursor = 12;
    while cursor + 8 <= data.len() {
        let chunk_id = &data[cursor..cursor + 4];
        let chunk_size = read_u32_le(data, cursor + 4) as usize;
        let body_start = cursor + 8;
        let body_end = (body_start + chunk_size).min(data.len());

        if chunk_id == b"fmt " {
            if body_end - body_start < 16 {
                return Err(format_err("fmt chunk too short"));
            }
            format_code = read_u16_le(data, body_start);
            num_channels = read_u16_le(data, body_start + 2);
            sample_rate = read_u32_le(data, body_start + 4);
            bits_per_sample = read_u16_le(data, body_start + 14);
        } else if chunk_id == b"data" {
            audio_data = Some(&data[body_start..body_end]);
        }

        // Chunks are word-aligned
        cursor = body_start + chunk_size + (chunk_size & 1);
    }

    let audio_data = audio_data.ok_or_else(|| format_err("missing data chunk"))?;
    if num_channels == 0 {
        return Err(format_err("fmt chunk missing or zero channels"));
    }
    if sample_rate == 0 {
        return Err(format_err("zero sample rate"));
    }

    let interleaved: Vec<f32> = match (format_code, bits_per_sample) {
        (WAV_FORMAT_PCM, 16) => audio_data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect(),
        (WAV_FORMAT_IEEE_FLOAT, 32) => audio_data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        _ => {
            return Err(format_err(&format!(
                "unsupported format: code {} at {} bits",
                format_code, bits_per_sample
            )))
        }
    };

    Ok(AudioSignal::new(
        downmix(&interleaved, num_channels as usize),
        sample_rate,
    ))
}

/// Averages interleaved channels into a mono signal.
fn downmix(interleaved: &[f32], num_channels: usize) -> Vec<f32> {
    if num_channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(num_channels)
        .map(|frame| frame.iter().sum::<f32>() / num_channels as f32)
        .collect()
}

/// Reads a WAV file into a mono [`AudioSignal`].
pub fn read_wav_file(path: &str) -> Result<AudioSignal, TsmError> {
    let data = std::fs::read(path)?;
    read_wav(&data)
}

fn wav_header(
    format_code: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data_len: usize,
) -> Vec<u8> {
    let block_align = bits_per_sample / 8; // mono
    let byte_rate = sample_rate * block_align as u32;

    let mut out = Vec::with_capacity(44 + data_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&format_code.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    out
}

/// Encodes a signal as a 32-bit float mono WAV byte stream.
pub fn write_wav_float(signal: &AudioSignal) -> Vec<u8> {
    let data_len = signal.samples.len() * 4;
    let mut out = wav_header(WAV_FORMAT_IEEE_FLOAT, signal.sample_rate, 32, data_len);
    for &s in &signal.samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Encodes a signal as a 16-bit PCM mono WAV byte stream. Samples are
/// clamped to [-1.0, 1.0] before quantization.
pub fn write_wav_pcm16(signal: &AudioSignal) -> Vec<u8> {
    let data_len = signal.samples.len() * 2;
    let mut out = wav_header(WAV_FORMAT_PCM, signal.sample_rate, 16, data_len);
    for &s in &signal.samples {
        let q = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        out.extend_from_slice(&q.to_le_bytes());
    }
    out
}

/// Writes a signal to a 32-bit float mono WAV file.
pub fn write_wav_file_float(path: &str, signal: &AudioSignal) -> Result<(), TsmError> {
    std::fs::write(path, write_wav_float(signal))?;
    Ok(())
}

/// Writes a signal to a 16-bit PCM mono WAV file.
pub fn write_wav_file_pcm16(path: &str, signal: &AudioSignal) -> Result<(), TsmError> {
    std::fs::write(path, write_wav_pcm16(signal))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_roundtrip() {
        let sig = AudioSignal::new(vec![0.0, 0.5, -0.5, 1.0, -1.0], 22050);
        let bytes = write_wav_float(&sig);
        let back = read_wav(&bytes).unwrap();
        assert_eq!(back.sample_rate, 22050);
        assert_eq!(back.samples, sig.samples);
    }

    #[test]
    fn test_pcm16_roundtrip_within_quantization() {
        let sig = AudioSignal::new(vec![0.0, 0.25, -0.75, 0.999], 44100);
        let bytes = write_wav_pcm16(&sig);
        let back = read_wav(&bytes).unwrap();
        assert_eq!(back.sample_rate, 44100);
        for (a, b) in sig.samples.iter().zip(back.samples.iter()) {
            assert!((a - b).abs() < 1.0 / 16384.0, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_stereo_is_downmixed() {
        // Hand-build a two-channel float WAV: frames (0.2, 0.4) and (-0.6, 0.6)
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36u32 + 16).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&48000u32.to_le_bytes());
        bytes.extend_from_slice(&(48000u32 * 8).to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&32u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        for s in [0.2f32, 0.4, -0.6, 0.6] {
            bytes.extend_from_slice(&s.to_le_bytes());
        }

        let sig = read_wav(&bytes).unwrap();
        assert_eq!(sig.sample_rate, 48000);
        assert_eq!(sig.len(), 2);
        assert!((sig.samples[0] - 0.3).abs() < 1e-6);
        assert!((sig.samples[1] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(read_wav(b"not a wav").is_err());
        assert!(read_wav(b"RIFFxxxxWAVE").is_err()); // headers but no chunks
    }

    #[test]
    fn test_rejects_unsupported_bit_depth() {
        let sig = AudioSignal::new(vec![0.1, 0.2], 22050);
        let mut bytes = write_wav_pcm16(&sig);
        // Corrupt bits-per-sample to 24
        bytes[34] = 24;
        assert!(read_wav(&bytes).is_err());
    }
}
