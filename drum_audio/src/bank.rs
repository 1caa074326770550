//! One pre-loaded sound per drum zone.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::sample::{OutputFormat, Sound};

#[derive(Clone, Debug, Default)]
pub struct SoundBank {
    sounds: HashMap<String, Sound>,
}

impl SoundBank {
    /// Where the sound for `zone` is expected: `<dir>/<zone>.wav`.
    pub fn path_for(dir: &Path, zone: &str) -> PathBuf {
        dir.join(format!("{zone}.wav"))
    }

    /// Load every zone's sound, in order, stopping at the first failure.
    pub fn load<'a, I>(dir: &Path, zones: I, format: OutputFormat) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sounds = HashMap::new();
        for zone in zones {
            let path = Self::path_for(dir, zone);
            let sound = Sound::load(zone, &path, format)?;
            debug!(zone, path = %path.display(), frames = sound.frames(), "loaded sound");
            sounds.insert(zone.to_owned(), sound);
        }
        info!(count = sounds.len(), dir = %dir.display(), "sound bank ready");
        Ok(SoundBank { sounds })
    }

    pub fn insert(&mut self, sound: Sound) {
        self.sounds.insert(sound.name().to_owned(), sound);
    }

    pub fn get(&self, zone: &str) -> Option<&Sound> {
        self.sounds.get(zone)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
