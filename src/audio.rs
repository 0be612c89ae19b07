//! Audio cue dispatch
//!
//! The simulation never plays sounds. It emits [`GameEvent`]s, and the
//! `AudioManager` turns them into cues for whatever backend is plugged in.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Player moved onto a new tile
    Step,
    /// A cut closed and tiles were captured
    Impact,
    /// An enemy was captured
    Laugh,
    /// Player lost a life
    Die,
}

impl SoundCue {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerStepped { .. } => Some(SoundCue::Step),
            GameEvent::TilesCaptured { .. } => Some(SoundCue::Impact),
            GameEvent::EnemyDied { .. } => Some(SoundCue::Laugh),
            GameEvent::LifeLost { .. } => Some(SoundCue::Die),
            _ => None,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("audio: {:?} at {:.2}", cue, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    warned_missing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            warned_missing: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue on the sink; a missing sink is tolerated
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        match self.sink.as_mut() {
            Some(sink) => sink.play(cue, vol),
            None => {
                if !self.warned_missing {
                    log::warn!("No audio sink - dropping {:?} and later cues", cue);
                    self.warned_missing = true;
                }
            }
        }
    }

    /// Play the cues for one tick's events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_event) {
            self.play(cue);
        }
    }
}
