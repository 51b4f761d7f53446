//! Crossfade Transition Controller
//!
//! Owns the two decks and drives track switches as a small tick-driven state
//! machine: fade the audible deck out, then prepare and fade the incoming
//! deck in. A new switch request supersedes whatever is in flight: both
//! decks drop their fades before the new transition starts, so per-channel
//! volume always has a single writer.

use super::channel::{AudioChannel, ChannelBackend};
use crate::constants::{FADE_DURATION_MS, FADE_TICK_MS};
use tracing::debug;

/// Which logical deck a transition targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deck {
    /// Looping main-track deck with a fixed source
    Primary,
    /// One-shot secret-track deck with a swappable source
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    FadingOut,
    FadingIn,
}

#[derive(Debug)]
struct Transition {
    target: Deck,
    /// Source to install on the secondary deck (secondary targets only).
    source: Option<String>,
    phase: Phase,
}

/// Dual-deck audio transition controller
///
/// `switch_to_secondary`/`switch_to_primary` queue the fade work;
/// [`tick`](Self::tick) (called by the host at the fade cadence) performs
/// it. At most one transition is in flight; at most one fade per deck.
#[derive(Debug)]
pub struct TransitionController<B: ChannelBackend> {
    primary: AudioChannel<B>,
    secondary: AudioChannel<B>,
    transition: Option<Transition>,
    fade_duration_ms: u32,
    fade_tick_ms: u32,
    unlocked: bool,
}

impl<B: ChannelBackend> TransitionController<B> {
    /// Create a controller with the main track fixed on the primary deck.
    pub fn new(
        primary_backend: B,
        secondary_backend: B,
        main_track: impl Into<String>,
    ) -> Self {
        let mut primary = AudioChannel::with_source(primary_backend, main_track);
        primary.set_looping(true);
        TransitionController {
            primary,
            secondary: AudioChannel::new(secondary_backend),
            transition: None,
            fade_duration_ms: FADE_DURATION_MS,
            fade_tick_ms: FADE_TICK_MS,
            unlocked: false,
        }
    }

    /// Override the fade window and tick interval.
    pub fn with_fade_timing(mut self, duration_ms: u32, tick_ms: u32) -> Self {
        self.fade_duration_ms = duration_ms;
        self.fade_tick_ms = tick_ms.max(1);
        self
    }

    /// One-time silent unlock cycle for both decks.
    ///
    /// Autoplay-restricted hosts refuse playback until a user gesture; the
    /// first qualifying interaction runs a volume-zero play/pause/reset on
    /// each deck so later audible playback is permitted. Subsequent calls
    /// are no-ops. Rejections are swallowed like any other playback start.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        for channel in [&mut self.primary, &mut self.secondary] {
            channel.set_volume(0.0);
            channel.play();
            channel.pause();
            channel.reset_position();
        }
        debug!("audio decks unlocked");
    }

    /// Whether the unlock cycle has run.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Crossfade from the primary deck to a secret track on the secondary.
    ///
    /// Fades the primary out; once silent it is paused and rewound, the
    /// secondary gets `path` as its source, rewinds, starts non-looping
    /// playback and fades in to full volume. Supersedes any transition in
    /// flight.
    pub fn switch_to_secondary(&mut self, path: impl Into<String>) {
        let path = path.into();
        debug!(path = %path, "switching to secondary deck");
        self.begin_transition(Deck::Secondary, Some(path));
    }

    /// Crossfade back to the looping main track on the primary deck.
    pub fn switch_to_primary(&mut self) {
        debug!("switching to primary deck");
        self.begin_transition(Deck::Primary, None);
    }

    fn begin_transition(&mut self, target: Deck, source: Option<String>) {
        // Cancel-and-supersede: no fade from an earlier request may keep
        // writing either deck's volume.
        self.primary.cancel_fade();
        self.secondary.cancel_fade();

        let outgoing = match target {
            Deck::Primary => &mut self.secondary,
            Deck::Secondary => &mut self.primary,
        };
        outgoing.begin_fade(0.0, self.fade_duration_ms, self.fade_tick_ms);

        self.transition = Some(Transition {
            target,
            source,
            phase: Phase::FadingOut,
        });
    }

    /// Advance active fades by one step.
    ///
    /// Call at the fade cadence ([`FADE_TICK_MS`] by default). Completing
    /// the fade-out pauses and rewinds the outgoing deck, prepares the
    /// incoming one and starts its fade-in; completing the fade-in ends the
    /// transition.
    pub fn tick(&mut self) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        match transition.phase {
            Phase::FadingOut => {
                let target = transition.target;
                let outgoing = match target {
                    Deck::Primary => &mut self.secondary,
                    Deck::Secondary => &mut self.primary,
                };
                if !outgoing.tick_fade() {
                    return;
                }
                outgoing.pause();
                outgoing.reset_position();
                outgoing.set_volume(0.0);

                let source = transition.source.take();
                let incoming = match target {
                    Deck::Primary => &mut self.primary,
                    Deck::Secondary => &mut self.secondary,
                };
                match target {
                    Deck::Secondary => {
                        if let Some(path) = source {
                            incoming.set_source(path);
                        }
                        incoming.set_looping(false);
                    }
                    Deck::Primary => incoming.set_looping(true),
                }
                incoming.reset_position();
                incoming.set_volume(0.0);
                incoming.play();
                incoming.begin_fade(1.0, self.fade_duration_ms, self.fade_tick_ms);
                transition.phase = Phase::FadingIn;
                debug!(?target, "fade-out complete, incoming deck started");
            }
            Phase::FadingIn => {
                let incoming = match transition.target {
                    Deck::Primary => &mut self.primary,
                    Deck::Secondary => &mut self.secondary,
                };
                if incoming.tick_fade() {
                    debug!(target = ?transition.target, "transition complete");
                    self.transition = None;
                }
            }
        }
    }

    /// Whether a transition is currently in flight.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The looping main-track deck.
    pub fn primary(&self) -> &AudioChannel<B> {
        &self.primary
    }

    /// The one-shot secret-track deck.
    pub fn secondary(&self) -> &AudioChannel<B> {
        &self.secondary
    }

    /// Mutable access to the primary deck.
    pub fn primary_mut(&mut self) -> &mut AudioChannel<B> {
        &mut self.primary
    }

    /// Mutable access to the secondary deck.
    pub fn secondary_mut(&mut self) -> &mut AudioChannel<B> {
        &mut self.secondary
    }
}
