//! Sound-effect contract
//!
//! The simulation emits `GameEvent`s; `dispatch` maps them onto a sink
//! provided by the frontend. Call sites guard with `is_playing`, so a jingle
//! that is still sounding is not retriggered.

use crate::assets::SoundKey;
use crate::sim::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A coin was collected
    Coin,
    /// The run was won
    Victory,
}

impl SoundEffect {
    pub const fn key(self) -> SoundKey {
        match self {
            SoundEffect::Coin => SoundKey::Coin,
            SoundEffect::Victory => SoundKey::Victory,
        }
    }
}

/// Playback backend supplied by the frontend.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Whether a previous `play` of this effect is still sounding.
    fn is_playing(&self, effect: SoundEffect) -> bool;
}

/// Backend used when no audio device is wired up; logs instead of playing.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("audio (muted): {effect:?}");
    }

    fn is_playing(&self, _effect: SoundEffect) -> bool {
        false
    }
}

/// Route one frame's events to the sink.
pub fn dispatch(events: &[GameEvent], audio: &mut dyn AudioSink) {
    for event in events {
        let effect = match event {
            GameEvent::CoinCollected => SoundEffect::Coin,
            GameEvent::Victory => SoundEffect::Victory,
        };
        if !audio.is_playing(effect) {
            audio.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        played: Vec<SoundEffect>,
        busy: Option<SoundEffect>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }

        fn is_playing(&self, effect: SoundEffect) -> bool {
            self.busy == Some(effect)
        }
    }

    #[test]
    fn events_map_to_effects() {
        let mut sink = RecordingSink::default();
        dispatch(
            &[GameEvent::CoinCollected, GameEvent::Victory],
            &mut sink,
        );
        assert_eq!(sink.played, vec![SoundEffect::Coin, SoundEffect::Victory]);
    }

    #[test]
    fn busy_effect_is_not_retriggered() {
        let mut sink = RecordingSink {
            busy: Some(SoundEffect::Coin),
            ..Default::default()
        };
        dispatch(
            &[GameEvent::CoinCollected, GameEvent::CoinCollected],
            &mut sink,
        );
        assert!(sink.played.is_empty());
    }

    #[test]
    fn effects_resolve_to_sound_assets() {
        assert_eq!(SoundEffect::Coin.key().path(), "Assets/coins.wav");
        assert_eq!(SoundEffect::Victory.key().path(), "Assets/victory.ogg");
    }

    #[test]
    fn null_audio_reports_idle() {
        let sink = NullAudio;
        assert!(!sink.is_playing(SoundEffect::Victory));
    }
}
