//! Logical Playback Channel
//!
//! One playback lane: source reference, clamped volume, loop flag and
//! playing status, with the actual device work delegated to a
//! [`ChannelBackend`]. Playback rejection (autoplay policy, missing device)
//! is swallowed here: it is logged and leaves the channel silent but
//! consistent, and it never interrupts an in-flight fade.

use super::fade::Fade;
use crate::Result;
use tracing::warn;

/// Device-side operations a channel delegates to
///
/// Implementations must not block; playback start is allowed to fail and the
/// channel recovers locally. The crate ships [`NullBackend`] (silent, always
/// succeeds) and, behind the `streaming` feature, a rodio-backed device.
pub trait ChannelBackend {
    /// Swap the playable resource behind this channel.
    fn set_source(&mut self, path: &str);
    /// Push the current volume (already clamped to [0, 1]) to the device.
    fn set_volume(&mut self, volume: f32);
    /// Enable or disable looping for subsequent playback.
    fn set_looping(&mut self, looping: bool);
    /// Start playback of the current source. May fail; the caller swallows it.
    fn play(&mut self) -> Result<()>;
    /// Pause playback.
    fn pause(&mut self);
    /// Reset the playback position to the start of the source.
    fn seek_start(&mut self);
}

impl<T: ChannelBackend + ?Sized> ChannelBackend for Box<T> {
    fn set_source(&mut self, path: &str) {
        (**self).set_source(path);
    }
    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume);
    }
    fn set_looping(&mut self, looping: bool) {
        (**self).set_looping(looping);
    }
    fn play(&mut self) -> Result<()> {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause();
    }
    fn seek_start(&mut self) {
        (**self).seek_start();
    }
}

/// Silent backend for headless operation and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl ChannelBackend for NullBackend {
    fn set_source(&mut self, _path: &str) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn set_looping(&mut self, _looping: bool) {}
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn seek_start(&mut self) {}
}

/// One logical playback lane
///
/// Volume is always clamped to [0, 1]. At most one [`Fade`] is attached at a
/// time; starting a new one replaces (cancels) the previous ramp, which is
/// what makes superseding transitions safe.
#[derive(Debug)]
pub struct AudioChannel<B: ChannelBackend> {
    backend: B,
    source: Option<String>,
    volume: f32,
    looping: bool,
    playing: bool,
    fade: Option<Fade>,
}

impl<B: ChannelBackend> AudioChannel<B> {
    /// Create a channel with no source attached yet.
    pub fn new(backend: B) -> Self {
        AudioChannel {
            backend,
            source: None,
            volume: 1.0,
            looping: false,
            playing: false,
            fade: None,
        }
    }

    /// Create a channel with a fixed initial source.
    pub fn with_source(backend: B, path: impl Into<String>) -> Self {
        let mut channel = AudioChannel::new(backend);
        channel.set_source(path);
        channel
    }

    /// Swap the playable resource behind this channel.
    pub fn set_source(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.backend.set_source(&path);
        self.source = Some(path);
    }

    /// Current source path, if one is attached.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Set the volume, clamped to [0, 1], and push it to the device.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    /// Current volume level.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Enable or disable looping.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        self.backend.set_looping(looping);
    }

    /// Whether the channel loops when it reaches the end of its source.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Start playback, swallowing device rejection.
    ///
    /// A rejected start (autoplay policy, unavailable device) leaves the
    /// channel marked not-playing and is logged; volume and fade state are
    /// untouched so the transition still converges.
    pub fn play(&mut self) {
        match self.backend.play() {
            Ok(()) => self.playing = true,
            Err(err) => {
                warn!(%err, "playback start rejected, continuing silently");
                self.playing = false;
            }
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        self.backend.pause();
        self.playing = false;
    }

    /// Reset the playback position to the start of the source.
    pub fn reset_position(&mut self) {
        self.backend.seek_start();
    }

    /// Whether playback is currently running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start a fade toward `target`, replacing any fade already in flight.
    pub fn begin_fade(&mut self, target: f32, duration_ms: u32, tick_ms: u32) {
        self.fade = Some(Fade::toward(self.volume, target, duration_ms, tick_ms));
    }

    /// Drop the active fade, leaving the volume where it is.
    pub fn cancel_fade(&mut self) {
        self.fade = None;
    }

    /// Whether a fade is currently attached.
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Advance the active fade by one tick.
    ///
    /// Returns true when a fade just completed (volume snapped to target and
    /// the fade was dropped). Returns false when no fade is active.
    pub fn tick_fade(&mut self) -> bool {
        let Some(fade) = self.fade else {
            return false;
        };
        let (volume, done) = fade.advance(self.volume);
        self.set_volume(volume);
        if done {
            self.fade = None;
        }
        done
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the underlying backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
