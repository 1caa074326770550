//! # air_drummer
//!
//! A drum kit played in the air: hand landmarks from a camera feed become
//! velocity-scaled drum hits, with a live overlay of the kit.
//!
//! ## Frame → sound
//!
//! | Stage | Module | Does |
//! |---|---|---|
//! | Capture | [`capture`] | Next frame from the webcam (or blank synthetic frames) |
//! | Tracking | [`tracking`] | Hand landmarks for the frame, in pixels |
//! | Detection | [`session`] | Per-hand speed, zone hit-test, cooldown, gain |
//! | Playback | `drum_audio` | Fire-and-forget sample playback at the strike gain |
//! | Overlay | [`visualizer`] | Zones, struck zones filled white, hand markers and `VEL N` |
//!
//! ## Feature flags
//!
//! * (default) **Simulation mode**: blank frames, the mouse pointer over
//!   the window is the hand.
//! * `camera` **Webcam mode**: frames from OpenCV `videoio`.  Pair it with
//!   a `subprocess` hand source running a landmark model.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod tracking;
pub mod visualizer;

pub use error::{DrummerError, TrackingError};
