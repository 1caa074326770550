//! Error types for the application crate.

use std::path::PathBuf;

use drum_audio::AudioError;
use drum_core::ConfigError;
use thiserror::Error;

/// The hand-landmark extractor failed.  Always fatal for the run.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("failed to start landmark extractor `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  std::io::Error,
    },

    #[error("landmark extractor did not signal ready, got {0:?}")]
    NotReady(String),

    #[error("landmark extractor closed its output")]
    Closed,

    #[error("landmark extractor I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed landmark message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("landmark extractor reported: {0}")]
    Extractor(String),
}

/// Anything that can stop the drummer from starting or keep running.
#[derive(Error, Debug)]
pub enum DrummerError {
    #[error("cannot read settings file {}: {source}", .path.display())]
    SettingsRead {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", .path.display())]
    SettingsParse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid kit: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error("capture device error: {0}")]
    Capture(String),

    #[error("display error: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, DrummerError>;
