//! Stage Timing Constants
//!
//! Shared timing and capacity constants used across the recognizer and
//! transition controller.

/// Maximum number of symbols retained by the rolling input buffer.
///
/// Once the buffer is full, each new symbol evicts the oldest one (FIFO),
/// so the longest recognizable code sequence is this many symbols.
pub const INPUT_BUFFER_CAPACITY: usize = 10;

/// Total duration of a single fade (out or in), in milliseconds.
pub const FADE_DURATION_MS: u32 = 1000;

/// Interval between successive fade volume adjustments, in milliseconds.
///
/// The host event loop is expected to call
/// [`TransitionController::tick`](crate::audio::TransitionController::tick)
/// at roughly this cadence; each call advances every active fade by one step.
pub const FADE_TICK_MS: u32 = 50;

/// Distance from the fade target at which the volume snaps exactly to it
/// and the fade self-cancels.
pub const FADE_EPSILON: f32 = 0.01;

/// How long a HUD alert stays on screen before the display collaborator
/// clears it, in milliseconds.
pub const ALERT_DURATION_MS: u64 = 2000;

/// Number of fade steps in a full fade at the default timing.
#[inline]
pub fn fade_steps(duration_ms: u32, tick_ms: u32) -> u32 {
    (duration_ms / tick_ms).max(1)
}
