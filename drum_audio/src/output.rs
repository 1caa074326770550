//! `cpal` backend: the default output device driving a [`Mixer`].

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::{error, info};

use crate::error::{AudioError, Result};
use crate::mixer::Mixer;
use crate::sample::{OutputFormat, Sound};
use crate::sink::{AudioSink, ChannelSink};

/// An open output stream.  Dropping it stops playback and releases the
/// device.
pub struct CpalOutput {
    sink:    ChannelSink,
    device:  String,
    // Dropped last, after the sender.
    _stream: cpal::Stream,
}

impl CpalOutput {
    /// Open the default output device with its default configuration.
    ///
    /// `queue_depth` bounds the number of plays waiting for the next
    /// callback; `max_voices` caps simultaneous voices.
    pub fn open(queue_depth: usize, max_voices: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoOutputDevice)?;
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config = supported.config();
        let format = OutputFormat {
            channels:    config.channels,
            sample_rate: config.sample_rate.0,
        };

        let (sink, rx) = ChannelSink::new(format, queue_depth);
        let mixer = Mixer::new(rx, max_voices);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
            other => return Err(AudioError::UnsupportedFormat(format!("{other:?}"))),
        };
        stream.play().map_err(|e| AudioError::Stream(e.to_string()))?;

        info!(
            device = %name,
            channels = format.channels,
            sample_rate = format.sample_rate,
            ?sample_format,
            "audio output open"
        );

        Ok(CpalOutput { sink, device: name, _stream: stream })
    }

    pub fn device_name(&self) -> &str {
        &self.device
    }
}

impl AudioSink for CpalOutput {
    fn format(&self) -> OutputFormat {
        self.sink.format()
    }

    fn play(&mut self, sound: &Sound, gain: f32) {
        self.sink.play(sound, gain);
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        info!(device = %self.device, "audio output closed");
    }
}

/// Frames rendered per mixer pass inside the callback.
const CHUNK_FRAMES: usize = 512;

fn build_stream<T>(device: &cpal::Device, config: &cpal::StreamConfig, mut mixer: Mixer) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    // Sized once here; the callback never allocates.
    let mut scratch = vec![0.0f32; CHUNK_FRAMES * config.channels.max(1) as usize];
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                render_chunked(&mut mixer, &mut scratch, data);
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

/// Fill `data` through the fixed `scratch` buffer, one chunk at a time.
/// `scratch.len()` must be a whole number of frames.
fn render_chunked<T>(mixer: &mut Mixer, scratch: &mut [f32], data: &mut [T])
where
    T: SizedSample + FromSample<f32>,
{
    for chunk in data.chunks_mut(scratch.len().max(1)) {
        let buf = &mut scratch[..chunk.len()];
        mixer.render(buf);
        for (out, &s) in chunk.iter_mut().zip(buf.iter()) {
            *out = T::from_sample(s);
        }
    }
}
