//! Polyphonic summing mixer, run from inside the output callback.
//!
//! The frame loop never touches the mixer directly: it sends [`Voice`]s over
//! a bounded channel and returns immediately.  Each callback drains the
//! channel, sums every live voice into the buffer and drops finished ones.

use std::sync::Arc;

use crossbeam_channel::Receiver;

/// One playing instance of a sound.
#[derive(Clone, Debug)]
pub struct Voice {
    samples: Arc<[f32]>,
    gain:    f32,
    cursor:  usize,
}

impl Voice {
    pub fn new(samples: Arc<[f32]>, gain: f32) -> Self {
        Voice { samples, gain: gain.clamp(0.0, 1.0), cursor: 0 }
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.samples.len()
    }

    /// Add this voice into `out`, advancing the cursor.
    fn mix_into(&mut self, out: &mut [f32]) {
        let rest = &self.samples[self.cursor..];
        let n = rest.len().min(out.len());
        for (o, s) in out[..n].iter_mut().zip(rest) {
            *o += s * self.gain;
        }
        self.cursor += n;
    }
}

pub struct Mixer {
    incoming:   Receiver<Voice>,
    voices:     Vec<Voice>,
    max_voices: usize,
}

impl Mixer {
    pub fn new(incoming: Receiver<Voice>, max_voices: usize) -> Self {
        let max_voices = max_voices.max(1);
        Mixer { incoming, voices: Vec::with_capacity(max_voices), max_voices }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Fill `out` (interleaved) with the sum of all live voices, hard
    /// clipped to `[-1, 1]`.
    pub fn render(&mut self, out: &mut [f32]) {
        while let Ok(voice) = self.incoming.try_recv() {
            if self.voices.len() == self.max_voices {
                // oldest voice goes first
                self.voices.remove(0);
            }
            self.voices.push(voice);
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            voice.mix_into(out);
        }
        self.voices.retain(|v| !v.is_done());

        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
