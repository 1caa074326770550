//! # drum_audio
//!
//! Everything between a detected strike and a speaker.
//!
//! * [`SoundBank`]: loads one WAV per zone (`<dir>/<zone>.wav`) up front,
//!   converted to the output device's channel count and sample rate.  A
//!   missing file fails the whole load and names the zone.
//! * [`AudioSink`]: the `play(sound, gain)` seam.  Plays never block and
//!   overlap freely.
//! * [`CpalOutput`]: the real sink: a [`Mixer`] running inside the default
//!   output device's callback, fed over a bounded channel.
//! * [`NullSink`]: discards everything; used when no device is wanted.
//!
//! ```rust,no_run
//! use drum_audio::{AudioSink, CpalOutput, SoundBank};
//!
//! let mut out = CpalOutput::open(64, 32)?;
//! let bank = SoundBank::load("sounds".as_ref(), ["A", "B"], out.format())?;
//! out.play(bank.get("A").unwrap(), 0.8);
//! # Ok::<(), drum_audio::AudioError>(())
//! ```

pub mod bank;
pub mod error;
pub mod mixer;
pub mod output;
pub mod sample;
pub mod sink;

pub use bank::SoundBank;
pub use error::AudioError;
pub use mixer::{Mixer, Voice};
pub use output::CpalOutput;
pub use sample::{OutputFormat, Sound};
pub use sink::{AudioSink, ChannelSink, NullSink};
