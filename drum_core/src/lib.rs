//! # drum_core
//!
//! The hit-detection engine behind the air drummer: noisy per-frame hand
//! positions go in, discrete debounced strikes come out.
//!
//! | Piece | Job |
//! |---|---|
//! | [`VelocityTracker`] | per-hand previous position → speed in pixels/frame |
//! | [`ZoneMap`] | validated, ordered set of circular drum zones |
//! | [`CooldownLedger`] | per-zone last trigger, monotonic |
//! | [`HitDetector`] | spatial + velocity + cooldown gating, strike gain |
//!
//! No I/O happens here: frames, landmark extraction and audio live in the
//! sibling crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use drum_core::{DetectorParams, HitDetector, VelocityTracker, ZoneMap};
//! use glam::Vec2;
//!
//! let mut detector = HitDetector::new(ZoneMap::reference_kit(), DetectorParams::default());
//! let mut tracker  = VelocityTracker::new();
//!
//! let now = Instant::now();
//! tracker.update(0, Vec2::new(100.0, 400.0));                 // first sighting → 0
//! let speed = tracker.update(0, Vec2::new(100.0, 100.0));     // 300 px in one frame
//! let strike = detector.detect(Vec2::new(100.0, 100.0), speed, now).unwrap();
//! assert_eq!(strike.zone, "A");
//! assert_eq!(strike.gain, 1.0);
//! ```

pub mod cooldown;
pub mod detector;
pub mod error;
pub mod hand;
pub mod velocity;
pub mod zone;

pub use cooldown::CooldownLedger;
pub use detector::{DetectorParams, HitDetector, Strike};
pub use error::ConfigError;
pub use hand::{landmarks, Hand};
pub use velocity::VelocityTracker;
pub use zone::{Rgb, Zone, ZoneMap};
