//! `drummer.toml`: every tunable of a session.
//!
//! All sections are optional; a missing section or key falls back to the
//! reference kit.  Values are validated once, when the zone map and
//! detector parameters are built from them.
//!
//! ```toml
//! [detection]
//! velocity_threshold  = 125.0   # px/frame
//! velocity_normalizer = 200.0   # px/frame for full volume
//! cooldown_ms         = 100
//!
//! [tracking]
//! reference_landmark = 12       # middle fingertip
//! max_hands          = 2
//! min_confidence     = 0.8
//! mirror             = true
//!
//! [tracking.source]
//! kind    = "subprocess"        # or "pointer", "replay"
//! command = ["python3", "hand_detect.py"]
//!
//! [audio]
//! sounds_dir = "sounds"
//!
//! [[zones]]
//! name   = "A"
//! center = [100, 100]
//! radius = 60.0
//! color  = [255, 0, 0]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use drum_core::zone::reference_zones;
use drum_core::{landmarks, ConfigError, DetectorParams, Zone, ZoneMap};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{DrummerError, Result};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub tracking:  TrackingConfig,
    pub capture:   CaptureConfig,
    pub audio:     AudioConfig,
    pub logging:   LogConfig,
    /// Enumeration order is the overlap tie-break order.
    pub zones:     Vec<Zone>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            detection: DetectionConfig::default(),
            tracking:  TrackingConfig::default(),
            capture:   CaptureConfig::default(),
            audio:     AudioConfig::default(),
            logging:   LogConfig::default(),
            zones:     reference_zones(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DrummerError::SettingsRead {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| DrummerError::SettingsParse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn zone_map(&self) -> std::result::Result<ZoneMap, ConfigError> {
        ZoneMap::new(self.zones.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    pub velocity_threshold:  f32,
    pub velocity_normalizer: f32,
    pub cooldown_ms:         u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let p = DetectorParams::default();
        DetectionConfig {
            velocity_threshold:  p.velocity_threshold(),
            velocity_normalizer: p.velocity_normalizer(),
            cooldown_ms:         p.cooldown().as_millis() as u64,
        }
    }
}

impl DetectionConfig {
    pub fn params(&self) -> std::result::Result<DetectorParams, ConfigError> {
        DetectorParams::new(
            self.velocity_threshold,
            self.velocity_normalizer,
            Duration::from_millis(self.cooldown_ms),
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// Landmark index used as the hand's position.
    pub reference_landmark: usize,
    /// Hands beyond this many (in detection order) are ignored.
    pub max_hands:          usize,
    /// Hands whose score is below this are ignored.
    pub min_confidence:     f32,
    /// Flip frames horizontally before detection, like a mirror.
    pub mirror:             bool,
    pub source:             HandSourceConfig,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        TrackingConfig {
            reference_landmark: landmarks::MIDDLE_TIP,
            max_hands:          2,
            min_confidence:     0.8,
            mirror:             true,
            source:             HandSourceConfig::Pointer,
        }
    }
}

/// Where hand landmarks come from.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandSourceConfig {
    /// The mouse pointer over the window is a hand.
    #[default]
    Pointer,
    /// An external landmark extractor process.
    Subprocess { command: Vec<String> },
    /// Pre-recorded landmark lines, one per frame.
    Replay { path: PathBuf },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Camera index (only with the `camera` feature).
    pub device: i32,
    pub width:  usize,
    pub height: usize,
    pub fps:    u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { device: 0, width: 640, height: 480, fps: 30 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Directory holding `<zone>.wav` for every zone.
    pub sounds_dir:  PathBuf,
    pub queue_depth: usize,
    pub max_voices:  usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sounds_dir:  PathBuf::from("sounds"),
            queue_depth: 64,
            max_voices:  32,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: "info".to_string() }
    }
}

impl LogConfig {
    /// Unknown levels fall back to `info`.
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
