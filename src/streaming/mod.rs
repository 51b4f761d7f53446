//! Rodio Playback Backend
//!
//! Real audio output for the two decks. Each [`RodioBackend`] wraps one
//! rodio sink fed from a decoded file; both decks share a single output
//! stream owned by [`RodioOutput`], which must outlive them.
//!
//! Playback start decodes the source fresh each time, which is also what
//! resets the position. `seek_start` therefore only has to clear the sink's
//! queue; the next `play()` rebuilds it from the top of the file.

use crate::audio::ChannelBackend;
use crate::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::debug;

/// Shared audio output stream for all decks
///
/// Dropping this silences every backend created from it.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    /// Open the default system output device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to create audio stream: {}", e))?;
        Ok(RodioOutput {
            _stream: stream,
            handle,
        })
    }
}

/// One deck's playback device backed by a rodio sink
pub struct RodioBackend {
    sink: Sink,
    source: Option<PathBuf>,
    looping: bool,
}

impl RodioBackend {
    /// Create a backend playing into the shared output stream.
    pub fn new(output: &RodioOutput) -> Result<Self> {
        let sink = Sink::try_new(&output.handle)
            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
        sink.pause();
        Ok(RodioBackend {
            sink,
            source: None,
            looping: false,
        })
    }
}

impl ChannelBackend for RodioBackend {
    fn set_source(&mut self, path: &str) {
        self.source = Some(PathBuf::from(path));
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn play(&mut self) -> Result<()> {
        let Some(path) = self.source.clone() else {
            return Err(crate::StageError::Playback(
                "no source attached to deck".into(),
            ));
        };
        // Decoding fresh implicitly starts from position zero.
        let file = File::open(&path).map_err(|e| {
            crate::StageError::Playback(format!("cannot open {}: {}", path.display(), e))
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
            crate::StageError::Playback(format!("cannot decode {}: {}", path.display(), e))
        })?;

        self.sink.stop();
        if self.looping {
            self.sink.append(decoder.repeat_infinite());
        } else {
            self.sink.append(decoder);
        }
        self.sink.play();
        debug!(path = %path.display(), looping = self.looping, "deck playback started");
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek_start(&mut self) {
        // Dropping the queued source is enough of a rewind: play() always
        // decodes the file from the top again.
        self.sink.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_output() -> Option<RodioOutput> {
        match RodioOutput::new() {
            Ok(output) => Some(output),
            Err(err) => {
                eprintln!("Skipping streaming test (audio backend unavailable): {}", err);
                None
            }
        }
    }

    #[test]
    fn test_backend_creation() {
        let Some(output) = try_output() else {
            return;
        };
        assert!(RodioBackend::new(&output).is_ok());
    }

    #[test]
    fn test_play_without_source_is_rejected() {
        let Some(output) = try_output() else {
            return;
        };
        let mut backend = RodioBackend::new(&output).unwrap();
        assert!(backend.play().is_err());
    }

    #[test]
    fn test_play_missing_file_is_rejected_not_fatal() {
        let Some(output) = try_output() else {
            return;
        };
        let mut backend = RodioBackend::new(&output).unwrap();
        backend.set_source("./definitely/not/here.mp3");
        assert!(matches!(
            backend.play(),
            Err(crate::StageError::Playback(_))
        ));
        // The sink stays usable for volume/pause work
        backend.set_volume(0.5);
        backend.pause();
    }

    #[test]
    fn test_seek_start_is_safe_in_any_state() {
        let Some(output) = try_output() else {
            return;
        };
        let mut backend = RodioBackend::new(&output).unwrap();
        // Before a source is attached, after attaching, and after a pause:
        // rewinding must never fail or panic, it only clears the sink queue.
        backend.seek_start();
        backend.set_source("./assets/main-track.mp3");
        backend.seek_start();
        backend.pause();
        backend.seek_start();
    }
}
