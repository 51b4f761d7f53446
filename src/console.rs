//! Secret Console
//!
//! Top-level wiring: one struct owning the recognizer, the stepwise unlock
//! matcher, the dispatch table and the audio controller, fed by discrete
//! host events. `handle_key` is the single entry point for key presses and
//! `tick` the single entry point for the fade clock; neither blocks, and
//! both are safe to call from whatever loop the host runs.

use crate::audio::{ChannelBackend, TransitionController};
use crate::config::StageConfig;
use crate::dispatch::{Dispatcher, StageEffects};
use crate::input::KeyPress;
use crate::recognizer::{CodeRecognizer, ProgressiveMatcher};
use crate::theme::Theme;
use crate::Result;

/// The whole engine behind one pair of entry points
pub struct SecretConsole<B: ChannelBackend> {
    recognizer: CodeRecognizer,
    unlock_sequence: ProgressiveMatcher,
    dispatcher: Dispatcher,
    audio: TransitionController<B>,
}

impl<B: ChannelBackend> SecretConsole<B> {
    /// Build a console from a configuration and two deck backends.
    pub fn from_config(
        config: &StageConfig,
        primary_backend: B,
        secondary_backend: B,
    ) -> Result<Self> {
        let recognizer = CodeRecognizer::new(config.code_book()?);
        let dispatcher = Dispatcher::new(config.bindings());
        dispatcher.validate()?;
        let audio = TransitionController::new(
            primary_backend,
            secondary_backend,
            config.main_track.clone(),
        )
        .with_fade_timing(config.fade.duration_ms, config.fade.tick_ms);
        Ok(SecretConsole {
            recognizer,
            unlock_sequence: ProgressiveMatcher::from_keys(&config.unlock_keys),
            dispatcher,
            audio,
        })
    }

    /// Build a console from already-assembled parts.
    pub fn new(
        recognizer: CodeRecognizer,
        unlock_sequence: ProgressiveMatcher,
        dispatcher: Dispatcher,
        audio: TransitionController<B>,
    ) -> Self {
        SecretConsole {
            recognizer,
            unlock_sequence,
            dispatcher,
            audio,
        }
    }

    /// Handle one key press; returns the matched code name, if any.
    ///
    /// The first press of the session also runs the silent audio unlock
    /// cycle. The stepwise unlock sequence sees every symbol regardless of
    /// modifiers; on its first completion it engages the secret theme, on
    /// later ones it toggles storm mode. Code recognition stays
    /// modifier-gated.
    pub fn handle_key<E: StageEffects>(
        &mut self,
        press: &KeyPress,
        effects: &mut E,
    ) -> Option<String> {
        self.audio.unlock();

        if self.unlock_sequence.observe(&press.symbol) {
            if self.dispatcher.theme() != Theme::Neon {
                // The unlock announcement replaces the usual theme one.
                self.dispatcher.set_theme_quiet(Theme::Neon, effects);
                effects.set_alert(
                    "SECRET THEME UNLOCKED",
                    crate::constants::ALERT_DURATION_MS,
                );
            } else {
                self.dispatcher.toggle_storm(effects);
            }
        }

        let matched = self.recognizer.observe(press)?;
        self.dispatcher
            .dispatch(&matched, &mut self.audio, effects);
        Some(matched)
    }

    /// Advance active audio fades by one step.
    pub fn tick(&mut self) {
        self.audio.tick();
    }

    /// The audio transition controller.
    pub fn audio(&self) -> &TransitionController<B> {
        &self.audio
    }

    /// Mutable access to the audio transition controller.
    pub fn audio_mut(&mut self) -> &mut TransitionController<B> {
        &mut self.audio
    }

    /// The dispatch table and its theme/storm state.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The code recognizer.
    pub fn recognizer(&self) -> &CodeRecognizer {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullBackend;

    #[derive(Default)]
    struct CountingEffects {
        themes: Vec<Theme>,
        alerts: Vec<String>,
    }

    impl StageEffects for CountingEffects {
        fn set_theme(&mut self, theme: Theme) {
            self.themes.push(theme);
        }
        fn set_alert(&mut self, text: &str, _duration_ms: u64) {
            self.alerts.push(text.to_string());
        }
        fn glitch(&mut self, _duration_ms: u64) {}
        fn set_rain_burst(&mut self, _bonus: f32) {}
        fn spawn_glyph_trail(&mut self, _count: usize) {}
        fn append_hud_glyphs(&mut self, _count: usize) {}
        fn reveal_sections(&mut self) {}
    }

    fn console() -> SecretConsole<NullBackend> {
        SecretConsole::from_config(&StageConfig::default(), NullBackend, NullBackend).unwrap()
    }

    #[test]
    fn test_first_key_unlocks_audio() {
        let mut console = console();
        let mut fx = CountingEffects::default();
        assert!(!console.audio().is_unlocked());
        console.handle_key(&KeyPress::plain('x'), &mut fx);
        assert!(console.audio().is_unlocked());
    }

    #[test]
    fn test_shifted_code_dispatches() {
        let mut console = console();
        let mut fx = CountingEffects::default();
        let hit = console.handle_key(&KeyPress::shifted('g'), &mut fx);
        assert_eq!(hit.as_deref(), Some("ghost"));
        assert_eq!(fx.themes, vec![Theme::Ghost]);
    }

    #[test]
    fn test_plain_keys_do_not_dispatch_codes() {
        let mut console = console();
        let mut fx = CountingEffects::default();
        assert_eq!(console.handle_key(&KeyPress::plain('g'), &mut fx), None);
        assert!(fx.themes.is_empty());
    }

    #[test]
    fn test_unlock_sequence_first_engages_neon_then_toggles_storm() {
        let mut console = console();
        let mut fx = CountingEffects::default();
        // "ne" without modifiers
        console.handle_key(&KeyPress::plain('n'), &mut fx);
        console.handle_key(&KeyPress::plain('e'), &mut fx);
        assert_eq!(console.dispatcher().theme(), Theme::Neon);
        assert_eq!(fx.themes, vec![Theme::Neon]);
        // Only the unlock message, not the generic theme announcement
        assert_eq!(fx.alerts, vec!["SECRET THEME UNLOCKED"]);
        assert!(!console.dispatcher().storm_active());

        console.handle_key(&KeyPress::plain('n'), &mut fx);
        console.handle_key(&KeyPress::plain('e'), &mut fx);
        assert!(console.dispatcher().storm_active());
    }

    #[test]
    fn test_phantom_code_drives_audio_transition_to_completion() {
        let mut console = console();
        let mut fx = CountingEffects::default();
        console.handle_key(&KeyPress::shifted('p'), &mut fx);
        assert!(console.audio().is_transitioning());
        for _ in 0..200 {
            console.tick();
        }
        assert!(!console.audio().is_transitioning());
        assert_eq!(console.audio().primary().volume(), 1.0);
        assert!(console.audio().primary().is_playing());
    }
}
