//! Secret-code and audio transition engine for a matrix-themed stage page
//!
//! The stage page reacts to hidden keystroke sequences: typing a registered
//! code with the modifier held swaps the visual theme, fires HUD effects and
//! crossfades between two audio decks (a looping main track and a one-shot
//! secret track). This crate implements the two parts of that page with real
//! semantics, the code recognizer and the audio transition controller,
//! plus the dispatch layer that connects them to the purely visual
//! collaborators (theme, HUD, rain), which stay behind a trait.
//!
//! # Crate feature flags
//! - `recognizer` (default): Rolling-buffer secret code matching (`input`, `recognizer`)
//! - `audio` (default): Dual-deck fade/crossfade controller (`audio`)
//! - `dispatch` (default): Code-to-action dispatch, console wiring and JSON configuration
//! - `streaming` (opt-in): Real audio playback (enables optional `rodio` dep)
//!
//! # Quick start
//! ## Recognizer only
//! ```
//! use phantom_stage::input::{InputSymbol, KeyPress, Modifiers};
//! use phantom_stage::recognizer::{CodeBook, CodeRecognizer, CodeSequence};
//!
//! let mut book = CodeBook::new();
//! book.register(CodeSequence::new("ghost", "g".chars().map(InputSymbol::from_char)).unwrap())
//!     .unwrap();
//! let mut recognizer = CodeRecognizer::new(book);
//! let hit = recognizer.observe(&KeyPress::shifted('g'));
//! assert_eq!(hit.as_deref(), Some("ghost"));
//! ```
//!
//! ## Full console
//! ```
//! use phantom_stage::audio::NullBackend;
//! use phantom_stage::config::StageConfig;
//! use phantom_stage::console::SecretConsole;
//! use phantom_stage::dispatch::StageEffects;
//! use phantom_stage::input::KeyPress;
//! use phantom_stage::theme::Theme;
//!
//! struct Hud;
//! impl StageEffects for Hud {
//!     fn set_theme(&mut self, _theme: Theme) {}
//!     fn set_alert(&mut self, _text: &str, _duration_ms: u64) {}
//!     fn glitch(&mut self, _duration_ms: u64) {}
//!     fn set_rain_burst(&mut self, _bonus: f32) {}
//!     fn spawn_glyph_trail(&mut self, _count: usize) {}
//!     fn append_hud_glyphs(&mut self, _count: usize) {}
//!     fn reveal_sections(&mut self) {}
//! }
//!
//! let config = StageConfig::default();
//! let mut console = SecretConsole::from_config(&config, NullBackend, NullBackend).unwrap();
//! let mut hud = Hud;
//! console.handle_key(&KeyPress::shifted('p'), &mut hud);
//! // Host event loop drives the fades:
//! console.tick();
//! ```

#![warn(missing_docs)]

// Domain modules (feature-gated for modular use)
pub mod constants;
pub mod input; // Key symbols, modifiers and the bounded input buffer
pub mod theme; // Visual theme identifiers and rain colors

#[cfg(feature = "audio")]
pub mod audio; // Dual-deck channels, fades and the transition controller
#[cfg(feature = "dispatch")]
pub mod config; // JSON stage configuration and the built-in code registry
#[cfg(feature = "dispatch")]
pub mod console; // Top-level wiring of recognizer, dispatcher and controller
#[cfg(feature = "dispatch")]
pub mod dispatch; // Code-to-action dispatch table and collaborator trait
#[cfg(feature = "recognizer")]
pub mod recognizer; // Secret code registry and matching
#[cfg(feature = "streaming")]
pub mod streaming; // Rodio-backed playback backend

/// Error types for stage engine operations
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// Invalid code registry construction (empty sequence, duplicate name)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Invalid stage configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Audio backend failure while creating a playback device
    #[error("Playback error: {0}")]
    Playback(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for StageError {
    /// Converts a String into `StageError::Other`.
    ///
    /// Convenience conversion for generic string errors. Prefer the specific
    /// variant constructors (`Registry`, `Config`, `Playback`) when the error
    /// class is known, so callers can discriminate.
    fn from(msg: String) -> Self {
        StageError::Other(msg)
    }
}

impl From<&str> for StageError {
    /// Converts a string slice into `StageError::Other`.
    fn from(msg: &str) -> Self {
        StageError::Other(msg.to_string())
    }
}

/// Result type for stage engine operations
pub type Result<T> = std::result::Result<T, StageError>;

// Public API exports
pub use input::{InputBuffer, InputSymbol, KeyPress, Modifiers};
pub use theme::Theme;

#[cfg(feature = "audio")]
pub use audio::{AudioChannel, ChannelBackend, Deck, NullBackend, TransitionController};
#[cfg(feature = "dispatch")]
pub use config::StageConfig;
#[cfg(feature = "dispatch")]
pub use console::SecretConsole;
#[cfg(feature = "dispatch")]
pub use dispatch::{CodeAction, Dispatcher, StageEffects};
#[cfg(feature = "recognizer")]
pub use recognizer::{CodeBook, CodeRecognizer, CodeSequence, ProgressiveMatcher};
#[cfg(feature = "streaming")]
pub use streaming::RodioBackend;
