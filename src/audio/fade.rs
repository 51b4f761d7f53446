//! Per-Transition Volume Ramp
//!
//! Transient bookkeeping for one linear fade: the target volume and the step
//! applied per tick. A fade exists only while it is active; the owning
//! channel drops it the moment the volume snaps to the target.

use crate::constants::{fade_steps, FADE_EPSILON};

/// One active volume ramp toward a target
///
/// The step is computed once at fade start from the distance to cover and
/// the number of ticks in the window, so a fade that starts from silence
/// toward silence completes on its first tick.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    target: f32,
    step: f32,
}

impl Fade {
    /// Plan a fade from `current` to `target` over `duration_ms`, stepped
    /// every `tick_ms`.
    pub fn toward(current: f32, target: f32, duration_ms: u32, tick_ms: u32) -> Self {
        let target = target.clamp(0.0, 1.0);
        let steps = fade_steps(duration_ms, tick_ms) as f32;
        Fade {
            target,
            step: (target - current.clamp(0.0, 1.0)).abs() / steps,
        }
    }

    /// Advance one tick from `volume`.
    ///
    /// Returns the new volume and whether the fade just finished. Within
    /// [`FADE_EPSILON`] of the target the volume snaps exactly to it.
    pub fn advance(&self, volume: f32) -> (f32, bool) {
        let next = if self.target >= volume {
            (volume + self.step).min(self.target)
        } else {
            (volume - self.step).max(self.target)
        };
        if (next - self.target).abs() <= FADE_EPSILON {
            (self.target, true)
        } else {
            (next, false)
        }
    }

    /// The volume this fade is ramping toward.
    pub fn target(&self) -> f32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fade_in_step_size() {
        // 0 -> 1 over 1000ms at 50ms ticks: 20 steps of 0.05
        let fade = Fade::toward(0.0, 1.0, 1000, 50);
        let (volume, done) = fade.advance(0.0);
        assert_relative_eq!(volume, 0.05, max_relative = 1e-6);
        assert!(!done);
    }

    #[test]
    fn test_fade_in_reaches_exact_target() {
        let fade = Fade::toward(0.0, 1.0, 1000, 50);
        let mut volume = 0.0;
        let mut ticks = 0;
        loop {
            let (next, done) = fade.advance(volume);
            volume = next;
            ticks += 1;
            if done {
                break;
            }
            assert!(ticks < 100, "fade never completed");
        }
        assert_eq!(volume, 1.0);
        // Snap fires one epsilon-width early, never later than the full window
        assert!(ticks <= 20);
    }

    #[test]
    fn test_fade_out_reaches_exact_zero() {
        let fade = Fade::toward(1.0, 0.0, 1000, 50);
        let mut volume = 1.0;
        for _ in 0..25 {
            let (next, done) = fade.advance(volume);
            volume = next;
            if done {
                break;
            }
        }
        assert_eq!(volume, 0.0);
    }

    #[test]
    fn test_zero_distance_fade_completes_immediately() {
        // Fading an already-silent channel out finishes on the first tick
        let fade = Fade::toward(0.0, 0.0, 1000, 50);
        let (volume, done) = fade.advance(0.0);
        assert_eq!(volume, 0.0);
        assert!(done);
    }

    #[test]
    fn test_partial_start_volume() {
        let fade = Fade::toward(0.4, 0.0, 1000, 50);
        let (volume, done) = fade.advance(0.4);
        assert!(volume < 0.4);
        assert!(!done);
        assert_relative_eq!(volume, 0.4 - 0.4 / 20.0, max_relative = 1e-6);
    }

    #[test]
    fn test_target_clamped_to_unit_range() {
        let fade = Fade::toward(0.0, 2.0, 1000, 50);
        assert_eq!(fade.target(), 1.0);
    }
}
