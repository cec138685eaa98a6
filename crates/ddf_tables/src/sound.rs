//! Sound effect definitions.

use crate::base::{Checksum, RecordBase};
use crate::registry::Record;

/// Distance beyond which sounds are clipped entirely.
pub const CLIPPING_DIST: f32 = 4000.0;

/// A sound effect definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRecord {
    /// Shared identity.
    pub base: RecordBase,
    /// Lump holding the sound data (8 characters max).
    pub lump_name: String,
    /// External file holding the sound data.
    pub file_name: String,
    /// Singularity group: starting a sound stops others in its group.
    pub singularity: i32,
    /// Priority, lower is more important.
    pub priority: i32,
    /// Playback volume, 0.0 to 1.0.
    pub volume: f32,
    /// Loops until explicitly stopped.
    pub looping: bool,
    /// Never evicted by higher-priority sounds.
    pub precious: bool,
    /// Hearing range in map units.
    pub max_distance: f32,
}

impl Default for SoundRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            lump_name: String::new(),
            file_name: String::new(),
            singularity: 0,
            priority: 999,
            volume: 1.0,
            looping: false,
            precious: false,
            max_distance: CLIPPING_DIST,
        }
    }
}

impl SoundRecord {
    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        ck.add_str(&self.lump_name);
        ck.add_str(&self.file_name);
        ck.add_i32(self.singularity);
        ck.add_i32(self.priority);
        ck.add_f32(self.volume);
        ck.add_i32(i32::from(self.looping));
        ck.add_i32(i32::from(self.precious));
        ck.add_f32(self.max_distance);
        ck.value()
    }
}

impl Record for SoundRecord {
    const KIND: &'static str = "sound";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
