//! Decoded drum samples, ready to be summed straight into an output buffer.

use std::path::Path;
use std::sync::Arc;

use crate::error::{AudioError, Result};

/// Interleaved layout the output device expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputFormat {
    pub channels:    u16,
    pub sample_rate: u32,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat { channels: 2, sample_rate: 44_100 }
    }
}

/// A sample converted to an [`OutputFormat`]: interleaved `f32` in
/// `[-1, 1]`.  Cloning is cheap; the data is shared.
#[derive(Clone, Debug)]
pub struct Sound {
    name:    String,
    format:  OutputFormat,
    samples: Arc<[f32]>,
}

impl Sound {
    pub fn from_samples(name: impl Into<String>, format: OutputFormat, samples: Vec<f32>) -> Self {
        Sound { name: name.into(), format, samples: samples.into() }
    }

    /// Decode `path` and convert it to `format`.
    pub fn load(name: &str, path: &Path, format: OutputFormat) -> Result<Self> {
        if !path.is_file() {
            return Err(AudioError::MissingAsset { zone: name.to_owned(), path: path.to_owned() });
        }

        let decode_err = |source| AudioError::Decode {
            zone: name.to_owned(),
            path: path.to_owned(),
            source,
        };

        let reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();
        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(decode_err)?
            }
        };

        if raw.len() < spec.channels.max(1) as usize {
            return Err(AudioError::EmptyAsset { zone: name.to_owned(), path: path.to_owned() });
        }

        let remixed   = remix(&raw, spec.channels, format.channels);
        let resampled = resample(&remixed, format.channels, spec.sample_rate, format.sample_rate);
        Ok(Sound::from_samples(name, format, resampled))
    }

    pub fn name(&self)    -> &str         { &self.name }
    pub fn format(&self)  -> OutputFormat { self.format }
    pub fn samples(&self) -> &Arc<[f32]>  { &self.samples }

    /// Length in frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Format conversion
// ════════════════════════════════════════════════════════════════════════════

/// Change the channel count of interleaved audio.
///
/// Matching channels are copied; extra output channels get the mono mix; a
/// narrower output takes the mono mix on every channel.
pub fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    let (from, to) = (from.max(1) as usize, to.max(1) as usize);
    if from == to {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        let mono = frame.iter().sum::<f32>() / from as f32;
        for c in 0..to {
            out.push(if to > from && c < from { frame[c] } else { mono });
        }
    }
    out
}

/// Linear-interpolation resampler for interleaved audio.
pub fn resample(samples: &[f32], channels: u16, from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ch = channels.max(1) as usize;
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let in_frames = samples.len() / ch;
    if in_frames == 0 {
        return Vec::new();
    }
    let out_frames = (in_frames as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;
    let step = from_rate as f64 / to_rate as f64;

    let mut out = Vec::with_capacity(out_frames * ch);
    for i in 0..out_frames {
        let pos  = i as f64 * step;
        let i0   = (pos.floor() as usize).min(in_frames - 1);
        let i1   = (i0 + 1).min(in_frames - 1);
        let frac = (pos - i0 as f64) as f32;
        for c in 0..ch {
            let a = samples[i0 * ch + c];
            let b = samples[i1 * ch + c];
            out.push(a + (b - a) * frac);
        }
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, rate: u32, data: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate:     rate,
            bits_per_sample: 16,
            sample_format:   hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(path, spec).unwrap();
        for &s in data { w.write_sample(s).unwrap(); }
        w.finalize().unwrap();
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        assert_eq!(remix(&[0.5, -0.25], 1, 2), vec![0.5, 0.5, -0.25, -0.25]);
    }

    #[test]
    fn stereo_to_mono_averages() {
        assert_eq!(remix(&[1.0, 0.0, 0.5, 0.5], 2, 1), vec![0.5, 0.5]);
    }

    #[test]
    fn upsample_doubles_length() {
        let out = resample(&[0.0, 1.0], 1, 22_050, 44_100);
        assert_eq!(out, vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn same_rate_is_identity() {
        assert_eq!(resample(&[0.1, 0.2, 0.3], 1, 48_000, 48_000), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn load_int16_mono_into_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.wav");
        write_wav(&path, 1, 44_100, &[16_384, -32_768, 0]);

        let fmt = OutputFormat { channels: 2, sample_rate: 44_100 };
        let s = Sound::load("A", &path, fmt).unwrap();
        assert_eq!(s.frames(), 3);
        assert_eq!(&s.samples()[..], &[0.5, 0.5, -1.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_file_names_zone_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C.wav");
        let err = Sound::load("C", &path, OutputFormat::default()).unwrap_err();
        match &err {
            AudioError::MissingAsset { zone, path: p } => {
                assert_eq!(zone, "C");
                assert_eq!(p, &path);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("C.wav"));
    }

    #[test]
    fn garbage_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("B.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();
        let err = Sound::load("B", &path, OutputFormat::default()).unwrap_err();
        assert!(matches!(err, AudioError::Decode { ref zone, .. } if zone == "B"));
    }

    #[test]
    fn empty_wav_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("E.wav");
        write_wav(&path, 1, 44_100, &[]);
        let err = Sound::load("E", &path, OutputFormat::default()).unwrap_err();
        assert!(matches!(err, AudioError::EmptyAsset { .. }));
    }
}
