//! Stage Configuration
//!
//! JSON-loadable description of the whole engine: track paths, fade timing,
//! the unlock sequence and the secret code registry with its bound actions.
//! [`StageConfig::default`] reproduces the page's built-in registry, so a
//! config file only needs to exist when someone wants different codes.

use crate::dispatch::CodeAction;
use crate::recognizer::{CodeBook, CodeSequence};
use crate::theme::Theme;
use crate::{Result, StageError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fade window and tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeSettings {
    /// Total fade duration in milliseconds.
    #[serde(default = "FadeSettings::default_duration_ms")]
    pub duration_ms: u32,
    /// Interval between volume adjustments in milliseconds.
    #[serde(default = "FadeSettings::default_tick_ms")]
    pub tick_ms: u32,
}

impl FadeSettings {
    fn default_duration_ms() -> u32 {
        crate::constants::FADE_DURATION_MS
    }

    fn default_tick_ms() -> u32 {
        crate::constants::FADE_TICK_MS
    }
}

impl Default for FadeSettings {
    fn default() -> Self {
        FadeSettings {
            duration_ms: Self::default_duration_ms(),
            tick_ms: Self::default_tick_ms(),
        }
    }
}

/// One secret code binding: name, keys and the action it triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBinding {
    /// Unique code name.
    pub name: String,
    /// Key characters typed (with the modifier held) to trigger it.
    pub keys: String,
    /// Action executed on a match.
    pub action: CodeAction,
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Source path of the looping main track (primary deck).
    pub main_track: String,
    /// Fade timing, defaulting to 1000 ms / 50 ms.
    #[serde(default)]
    pub fade: FadeSettings,
    /// Modifier-free stepwise unlock sequence (konami-style).
    #[serde(default = "StageConfig::default_unlock_keys")]
    pub unlock_keys: String,
    /// Secret code registry, checked in listed order.
    pub codes: Vec<CodeBinding>,
}

impl StageConfig {
    fn default_unlock_keys() -> String {
        "ne".to_string()
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        StageConfig::from_json(&data)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the insertion-ordered code registry from the bindings.
    pub fn code_book(&self) -> Result<CodeBook> {
        let mut book = CodeBook::new();
        for binding in &self.codes {
            book.register(CodeSequence::from_keys(&binding.name, &binding.keys)?)?;
        }
        Ok(book)
    }

    /// Name/action pairs for the dispatcher.
    pub fn bindings(&self) -> impl Iterator<Item = (String, CodeAction)> + '_ {
        self.codes
            .iter()
            .map(|binding| (binding.name.clone(), binding.action.clone()))
    }

    fn validate(&self) -> Result<()> {
        if self.main_track.trim().is_empty() {
            return Err(StageError::Config("main_track path is empty".into()));
        }
        if self.fade.tick_ms == 0 {
            return Err(StageError::Config("fade tick_ms must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for StageConfig {
    /// The page's built-in registry, in its historical order.
    ///
    /// Order matters: overlapping codes resolve first-match-wins, so
    /// reordering these changes which code fires on ambiguous input.
    fn default() -> Self {
        let codes = vec![
            CodeBinding {
                name: "ba".into(),
                keys: "ba".into(),
                action: CodeAction::GlitchBurst {
                    duration_ms: 1000,
                    alert: "GLITCH BURST".into(),
                },
            },
            CodeBinding {
                name: "z".into(),
                keys: "z".into(),
                action: CodeAction::Alert {
                    text: "MERCH MODULE ACTIVATED".into(),
                },
            },
            CodeBinding {
                name: "fx".into(),
                keys: "fx".into(),
                action: CodeAction::SecretTrack {
                    path: "./assets/hidden-track.mp3".into(),
                    burst: 1.5,
                    alert: "HIDDEN FREQUENCY UNLOCKED".into(),
                },
            },
            CodeBinding {
                name: "neon".into(),
                keys: "n".into(),
                action: CodeAction::SetTheme { theme: Theme::Neon },
            },
            CodeBinding {
                name: "ghost".into(),
                keys: "g".into(),
                action: CodeAction::SetTheme {
                    theme: Theme::Ghost,
                },
            },
            CodeBinding {
                name: "storm".into(),
                keys: "s".into(),
                action: CodeAction::ToggleStorm,
            },
            CodeBinding {
                name: "matrix".into(),
                keys: "m".into(),
                action: CodeAction::SetTheme {
                    theme: Theme::Matrix,
                },
            },
            CodeBinding {
                name: "year1994".into(),
                keys: "1994".into(),
                action: CodeAction::GlitchBurst {
                    duration_ms: 1500,
                    alert: "SYSTEM TIMEWARP: 1994".into(),
                },
            },
            CodeBinding {
                name: "overload".into(),
                keys: "o".into(),
                action: CodeAction::GlyphOverload {
                    count: 100,
                    alert: "SYSTEM OVERLOAD".into(),
                },
            },
            CodeBinding {
                name: "echo".into(),
                keys: "e".into(),
                action: CodeAction::EchoStorm {
                    count: 50,
                    alert: "ECHO STORM INITIATED".into(),
                },
            },
            CodeBinding {
                name: "lucid".into(),
                keys: "l".into(),
                action: CodeAction::RevealAll {
                    alert: "SIMULATION REVEALED".into(),
                },
            },
            CodeBinding {
                name: "burst".into(),
                keys: "burst".into(),
                action: CodeAction::RainBurst {
                    bonus: 2.0,
                    alert: "RAIN BURST ENGAGED".into(),
                },
            },
            CodeBinding {
                name: "oracle".into(),
                keys: "r".into(),
                action: CodeAction::Oracle {
                    prophecies: vec![
                        "THE ONE IS COMING".into(),
                        "GLITCHES ARE NOT BUGS".into(),
                        "THE SYSTEM IS WATCHING".into(),
                        "WAKE UP, KYLE".into(),
                        "YOU ARE THE CODE".into(),
                    ],
                },
            },
            CodeBinding {
                name: "phantom".into(),
                keys: "p".into(),
                action: CodeAction::MainTrack {
                    theme: Theme::Phantom,
                    alert: "PHANTOM MODE ENGAGED".into(),
                },
            },
        ];

        StageConfig {
            main_track: "./assets/main-track.mp3".into(),
            fade: FadeSettings::default(),
            unlock_keys: Self::default_unlock_keys(),
            codes,
        }
    }
}
