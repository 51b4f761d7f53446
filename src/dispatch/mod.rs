//! Code-to-Action Dispatch
//!
//! Maps matched code names to stage actions. Actions are plain data
//! (serde-tagged, so the registry can live in configuration) and their
//! execution touches exactly three surfaces: the audio transition
//! controller, the [`StageEffects`] collaborators and the dispatcher's own
//! small bits of state (active theme, storm toggle).
//!
//! The visual collaborators have no contract beyond being invoked with the
//! right parameters; rendering is someone else's problem.

use crate::audio::{ChannelBackend, TransitionController};
use crate::constants::ALERT_DURATION_MS;
use crate::theme::Theme;
use crate::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Side-effecting collaborators of the dispatch layer
///
/// Implementations render the visual reaction; the core only guarantees the
/// calls and their parameters. Every alert auto-clears after `duration_ms`;
/// honoring that is the display's job.
pub trait StageEffects {
    /// Change the active visual theme.
    fn set_theme(&mut self, theme: Theme);
    /// Show a transient HUD message, cleared after `duration_ms`.
    fn set_alert(&mut self, text: &str, duration_ms: u64);
    /// Flash the glitch effect for `duration_ms`.
    fn glitch(&mut self, duration_ms: u64);
    /// Boost rain-layer fall speed by `bonus`.
    fn set_rain_burst(&mut self, bonus: f32);
    /// Spawn `count` glyph trail sprites at random positions.
    fn spawn_glyph_trail(&mut self, count: usize);
    /// Append `count` random glyphs to the HUD ticker.
    fn append_hud_glyphs(&mut self, count: usize);
    /// Reveal every hidden page section at once.
    fn reveal_sections(&mut self);
}

/// Action bound to a secret code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeAction {
    /// Flash the glitch effect and announce it.
    GlitchBurst {
        /// How long the flash lasts.
        duration_ms: u64,
        /// HUD message shown alongside.
        alert: String,
    },
    /// Show a HUD message only.
    Alert {
        /// The message text.
        text: String,
    },
    /// Crossfade to a one-shot secret track on the secondary deck.
    SecretTrack {
        /// Source path handed to the secondary deck.
        path: String,
        /// Rain speed bonus applied while the track kicks in.
        burst: f32,
        /// HUD message shown alongside.
        alert: String,
    },
    /// Switch the visual theme (announces "<NAME> MODE ACTIVATED").
    SetTheme {
        /// Target theme.
        theme: Theme,
    },
    /// Toggle storm mode on or off.
    ToggleStorm,
    /// Append glyphs to the HUD ticker.
    GlyphOverload {
        /// Number of glyphs appended.
        count: usize,
        /// HUD message shown alongside.
        alert: String,
    },
    /// Spawn a burst of glyph trails across the page.
    EchoStorm {
        /// Number of trail sprites.
        count: usize,
        /// HUD message shown alongside.
        alert: String,
    },
    /// Reveal all hidden sections.
    RevealAll {
        /// HUD message shown alongside.
        alert: String,
    },
    /// Boost the rain speed.
    RainBurst {
        /// Fall-speed bonus.
        bonus: f32,
        /// HUD message shown alongside.
        alert: String,
    },
    /// Show one randomly chosen prophecy.
    Oracle {
        /// Prophecy pool to pick from.
        prophecies: Vec<String>,
    },
    /// Switch theme and crossfade back to the looping main track.
    MainTrack {
        /// Theme engaged together with the track.
        theme: Theme,
        /// HUD message shown alongside.
        alert: String,
    },
}

/// Dispatch table from code names to actions
///
/// Also owns the two bits of page state the actions flip: the active theme
/// and the storm toggle.
pub struct Dispatcher {
    actions: HashMap<String, CodeAction>,
    theme: Theme,
    storm: bool,
    rng: SmallRng,
}

impl Dispatcher {
    /// Create a dispatcher from name/action bindings.
    pub fn new(bindings: impl IntoIterator<Item = (String, CodeAction)>) -> Self {
        Dispatcher {
            actions: bindings.into_iter().collect(),
            theme: Theme::Matrix,
            storm: false,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Replace the oracle RNG with a seeded one (deterministic tests).
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Execute the action bound to `name`.
    ///
    /// Unknown names are unreachable when the dispatcher and recognizer are
    /// built from the same registry; if one shows up anyway it degrades to a
    /// generic HUD message, never a failure.
    pub fn dispatch<B, E>(
        &mut self,
        name: &str,
        audio: &mut TransitionController<B>,
        effects: &mut E,
    ) where
        B: ChannelBackend,
        E: StageEffects,
    {
        let Some(action) = self.actions.get(name).cloned() else {
            debug!(code = name, "no action bound to code");
            effects.set_alert(&format!("CODE \"{name}\" TRIGGERED"), ALERT_DURATION_MS);
            return;
        };
        debug!(code = name, "dispatching secret code");

        match action {
            CodeAction::GlitchBurst { duration_ms, alert } => {
                effects.glitch(duration_ms);
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::Alert { text } => {
                effects.set_alert(&text, ALERT_DURATION_MS);
            }
            CodeAction::SecretTrack { path, burst, alert } => {
                audio.switch_to_secondary(path);
                effects.set_rain_burst(burst);
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::SetTheme { theme } => {
                self.set_theme(theme, effects);
            }
            CodeAction::ToggleStorm => {
                self.toggle_storm(effects);
            }
            CodeAction::GlyphOverload { count, alert } => {
                effects.append_hud_glyphs(count);
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::EchoStorm { count, alert } => {
                effects.spawn_glyph_trail(count);
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::RevealAll { alert } => {
                effects.reveal_sections();
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::RainBurst { bonus, alert } => {
                effects.set_rain_burst(bonus);
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
            CodeAction::Oracle { prophecies } => {
                if !prophecies.is_empty() {
                    let pick = self.rng.random_range(0..prophecies.len());
                    effects.set_alert(&prophecies[pick], ALERT_DURATION_MS);
                }
            }
            CodeAction::MainTrack { theme, alert } => {
                self.set_theme(theme, effects);
                audio.switch_to_primary();
                effects.set_alert(&alert, ALERT_DURATION_MS);
            }
        }
    }

    /// Change the theme and announce it on the HUD.
    pub fn set_theme<E: StageEffects>(&mut self, theme: Theme, effects: &mut E) {
        self.set_theme_quiet(theme, effects);
        effects.set_alert(
            &format!("{} MODE ACTIVATED", theme.label().to_uppercase()),
            ALERT_DURATION_MS,
        );
    }

    /// Change the theme without the "MODE ACTIVATED" announcement.
    ///
    /// The unlock sequence shows its own message instead.
    pub fn set_theme_quiet<E: StageEffects>(&mut self, theme: Theme, effects: &mut E) {
        self.theme = theme;
        effects.set_theme(theme);
    }

    /// Flip storm mode and announce the new state.
    pub fn toggle_storm<E: StageEffects>(&mut self, effects: &mut E) {
        self.storm = !self.storm;
        let text = if self.storm {
            "STORM MODE: ON"
        } else {
            "STORM MODE: OFF"
        };
        effects.set_alert(text, ALERT_DURATION_MS);
    }

    /// The currently active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether storm mode is on.
    pub fn storm_active(&self) -> bool {
        self.storm
    }

    /// Whether an action is bound to `name`.
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of bound actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Validate config-provided actions (empty oracle pools, blank paths).
    pub fn validate(&self) -> Result<()> {
        for (name, action) in &self.actions {
            match action {
                CodeAction::Oracle { prophecies } if prophecies.is_empty() => {
                    return Err(crate::StageError::Config(format!(
                        "code \"{name}\": oracle needs at least one prophecy"
                    )));
                }
                CodeAction::SecretTrack { path, .. } if path.trim().is_empty() => {
                    return Err(crate::StageError::Config(format!(
                        "code \"{name}\": secret track path is empty"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
