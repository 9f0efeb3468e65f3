use crate::audio::SoundCue;
use crate::level::{Level, LevelError};
use crate::player::Player;
use crate::voice::VoiceReceiver;
use std::path::{Path, PathBuf};

/// State shared by every view, handed to the active one each tick.
#[derive(Debug)]
pub struct Session {
    pub player: Player,

    pub voice: VoiceReceiver,

    leaderboard_path: PathBuf,

    levels: Vec<Level>,

    cues: Vec<SoundCue>,
}

impl Session {
    pub fn new(
        player: Player,
        voice: VoiceReceiver,
        leaderboard_path: impl Into<PathBuf>,
        levels: Vec<Level>,
    ) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }

        Ok(Self {
            player,
            voice,
            leaderboard_path: leaderboard_path.into(),
            levels,
            cues: vec![],
        })
    }

    pub fn leaderboard_path(&self) -> &Path {
        &self.leaderboard_path
    }

    /// The 1 based level `number`, clamped to the available levels
    pub fn level(&self, number: usize) -> &Level {
        let idx = number.clamp(1, self.levels.len()) - 1;
        &self.levels[idx]
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Request a sound to be played after this tick
    #[inline]
    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}
