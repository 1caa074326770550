//! Error types for sound loading and playback.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    /// The zone's sound file does not exist.
    #[error("sound for zone `{zone}` not found at {}", .path.display())]
    MissingAsset { zone: String, path: PathBuf },

    /// The file exists but is not a readable WAV.
    #[error("could not decode sound for zone `{zone}` at {}: {source}", .path.display())]
    Decode {
        zone:   String,
        path:   PathBuf,
        #[source]
        source: hound::Error,
    },

    /// The WAV decoded to zero frames.
    #[error("sound for zone `{zone}` at {} is empty", .path.display())]
    EmptyAsset { zone: String, path: PathBuf },

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("unsupported output sample format {0}")]
    UnsupportedFormat(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;
