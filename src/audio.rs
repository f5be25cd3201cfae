//! Audio cues driven by game events
//!
//! Playback belongs to the host: it implements [`AudioSink`] as a
//! fire-and-forget call. The simulation never waits on a sound and sounds
//! never feed back into simulation state.

use crate::settings::AudioSettings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A ship took a hit
    Hit,
    /// Background theme, looped
    Theme,
}

impl SoundEffect {
    /// Volume the effect is mixed at before user settings apply
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Hit => 0.1,
            SoundEffect::Theme => 0.2,
        }
    }

    pub fn is_music(self) -> bool {
        matches!(self, SoundEffect::Theme)
    }
}

/// Host playback backend
pub trait AudioSink {
    /// Start playing `effect` at `volume` (0.0 - 1.0) without blocking
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("play {effect:?} at {volume:.2}");
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    settings: AudioSettings,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: AudioSettings) -> Self {
        Self { sink, settings }
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AudioSettings {
        &mut self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play a sound effect scaled by the current settings
    pub fn play(&mut self, effect: SoundEffect) {
        let scale = if effect.is_music() {
            self.settings.effective_music()
        } else {
            self.settings.effective_sfx()
        };
        let volume = effect.base_volume() * scale;
        if volume <= 0.0 {
            return;
        }
        self.sink.play(effect, volume);
    }

    pub fn start_theme(&mut self) {
        self.play(SoundEffect::Theme);
    }

    /// Map one event to its cue, if any
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShipHit { .. } | GameEvent::ShipDestroyed { .. } => self.play(SoundEffect::Hit),
            _ => {}
        }
    }

    pub fn handle_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.handle(event);
        }
    }
}
