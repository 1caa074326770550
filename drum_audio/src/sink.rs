//! The playback seam between the frame loop and an audio backend.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{trace, warn};

use crate::mixer::Voice;
use crate::sample::{OutputFormat, Sound};

/// Fire-and-forget playback.  `play` must return without waiting for the
/// sound to finish, and concurrent plays must mix independently.
pub trait AudioSink {
    /// Format sounds must be converted to before they are played here.
    fn format(&self) -> OutputFormat;

    /// Start `sound` at `gain` (`[0, 1]`).
    fn play(&mut self, sound: &Sound, gain: f32);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn format(&self) -> OutputFormat {
        (**self).format()
    }

    fn play(&mut self, sound: &Sound, gain: f32) {
        (**self).play(sound, gain)
    }
}

// ── null backend (no device wanted, or none found) ────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink {
    pub format: OutputFormat,
}

impl AudioSink for NullSink {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn play(&mut self, sound: &Sound, gain: f32) {
        trace!(sound = sound.name(), gain, "null sink: play dropped");
    }
}

// ── channel backend (feeds a Mixer on another thread) ─────────────────────

/// Sends voices to a [`crate::Mixer`].  A full queue drops the play rather
/// than stalling the caller.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx:     Sender<Voice>,
    format: OutputFormat,
}

impl ChannelSink {
    pub fn new(format: OutputFormat, queue_depth: usize) -> (Self, Receiver<Voice>) {
        let (tx, rx) = bounded(queue_depth.max(1));
        (ChannelSink { tx, format }, rx)
    }
}

impl AudioSink for ChannelSink {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn play(&mut self, sound: &Sound, gain: f32) {
        if sound.format() != self.format {
            warn!(sound = sound.name(), "sound was loaded for a different output format");
        }
        match self.tx.try_send(Voice::new(sound.samples().clone(), gain)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(sound = sound.name(), "voice queue full; play dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(sound = sound.name(), "audio output gone; play dropped");
            }
        }
    }
}
