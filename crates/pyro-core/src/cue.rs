//! Audio cue signals
//!
//! The core only announces that a cue fired. Buffers, volume envelopes and
//! playback belong to whoever implements [`CuePlayer`].

use serde::{Deserialize, Serialize};

/// A one-shot sound cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Deep burst of a shell opening
    Bloom,
    /// Crackle of a glittering tail
    Crackle,
}

impl Cue {
    /// Playback volume requested with the cue
    pub fn volume(self) -> f32 {
        0.3
    }

    /// Get the registry name of the behavior that fires this cue
    pub fn name(self) -> &'static str {
        match self {
            Cue::Bloom => "bloomVoice",
            Cue::Crackle => "crackleVoice",
        }
    }
}

/// Receiver of cue signals
pub trait CuePlayer {
    /// Called synchronously when a cue fires
    fn play(&mut self, cue: Cue);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Records cues in firing order
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    cues: Vec<Cue>,
}

impl CueLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues recorded so far
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Count recorded cues of one kind
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }

    /// Take and clear the recorded cues
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl CuePlayer for CueLog {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
