//! Dual-Deck Audio Transitions
//!
//! Two logical playback channels (a looping primary deck carrying the main
//! track and a one-shot secondary deck whose source is swapped per
//! transition) plus the controller that crossfades between them.
//!
//! All volume work is tick-driven: the host event loop calls
//! [`TransitionController::tick`] at the fade cadence (50 ms by default) and
//! each call advances the active fade by one step. Each channel owns at most
//! one fade at a time, so a superseding transition request can never leave
//! two ramps fighting over the same channel's volume.
//!
//! Real playback is delegated to a [`ChannelBackend`]; the crate ships a
//! silent [`NullBackend`] for headless use and tests, and a rodio-backed
//! implementation behind the `streaming` feature.

mod channel;
mod controller;
mod fade;

pub use channel::{AudioChannel, ChannelBackend, NullBackend};
pub use controller::{Deck, TransitionController};
pub use fade::Fade;
