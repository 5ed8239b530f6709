use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::deck::{Clip, Slide};

/// What a toggle did, for the on-screen indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackToggle {
    Resumed,
    Paused,
}

/// Playback clock for one slide's clip.
///
/// The session is the auto-advance subscription: it remembers the slide it
/// belongs to and fires at most once when the clock passes the clip duration.
/// Stopping the slide drops the session, so a stale end can never trigger.
pub struct ClipSession {
    pub slide: usize,
    pub muted: bool,
    duration: Duration,
    base: Duration,
    resumed_at: Instant,
    paused: bool,
    soundtrack: Option<Sink>,
    ended: bool,
}

impl ClipSession {
    fn start(slide: usize, clip: &Clip, muted: bool, soundtrack: Option<Sink>) -> Self {
        Self {
            slide,
            muted,
            duration: Duration::from_secs_f32(clip.duration.max(0.0)),
            base: Duration::ZERO,
            resumed_at: Instant::now(),
            paused: false,
            soundtrack,
            ended: false,
        }
    }

    pub fn position(&self) -> Duration {
        if self.paused {
            self.base
        } else {
            self.base + self.resumed_at.elapsed()
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.position().as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    pub fn finished(&self) -> bool {
        self.position() >= self.duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn pause(&mut self) {
        if !self.paused {
            self.base += self.resumed_at.elapsed();
            self.paused = true;
            if let Some(sink) = &self.soundtrack {
                sink.pause();
            }
        }
    }

    fn resume(&mut self) {
        if self.paused {
            self.resumed_at = Instant::now();
            self.paused = false;
            if let Some(sink) = &self.soundtrack {
                sink.play();
            }
        }
    }
}

/// Starts and stops a slide's media: the clip session plus the single shared
/// narration sink. Ownership of the narration sink follows the current slide;
/// it always passes through `stop` before the next slide may start it.
pub struct MediaPlayer {
    /// Output stream must outlive its sinks.
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    narration: Option<Sink>,
    session: Option<ClipSession>,
    base_path: PathBuf,
    muted_all: bool,
}

impl MediaPlayer {
    pub fn new(base_path: PathBuf, muted_all: bool) -> Self {
        let (stream, handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                tracing::warn!("No audio output available, playing silently: {e}");
                (None, None)
            }
        };
        Self {
            _stream: stream,
            handle,
            narration: None,
            session: None,
            base_path,
            muted_all,
        }
    }

    /// Fully stop the current slide's media: the clip session is dropped
    /// (position conceptually reset to zero, its end subscription with it)
    /// and the shared narration sink is emptied whoever owned it.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Some(sink) = session.soundtrack {
                sink.stop();
            }
        }
        if let Some(narration) = &self.narration {
            narration.stop();
        }
    }

    /// Start the media for the slide at `index`. Callers stop the previous
    /// slide first; the navigation machine guarantees that ordering.
    pub fn play(&mut self, index: usize, slide: &Slide) {
        if let Some(clip) = &slide.video {
            let muted = !slide.use_video_audio;
            let soundtrack = if muted {
                None
            } else {
                clip.soundtrack
                    .as_deref()
                    .and_then(|src| self.spawn_sink(src))
            };
            self.session = Some(ClipSession::start(index, clip, muted, soundtrack));
        }

        // Separate narration only when the clip's own audio is not in use
        if !slide.use_video_audio {
            if let Some(src) = slide.audio.as_deref() {
                self.play_narration(src);
            }
        }
    }

    /// One-shot end-of-clip poll: fires once per session, with the owning
    /// slide index. Callers advance only if that slide is still current.
    pub fn poll_finished(&mut self) -> Option<usize> {
        let session = self.session.as_mut()?;
        if !session.ended && session.finished() {
            session.ended = true;
            return Some(session.slide);
        }
        None
    }

    /// Flip the clip's paused state; narration is unaffected.
    pub fn toggle(&mut self) -> Option<PlaybackToggle> {
        let session = self.session.as_mut()?;
        if session.paused {
            session.resume();
            Some(PlaybackToggle::Resumed)
        } else {
            session.pause();
            Some(PlaybackToggle::Paused)
        }
    }

    pub fn session(&self) -> Option<&ClipSession> {
        self.session.as_ref()
    }

    fn play_narration(&mut self, src: &str) {
        if self.narration.is_none() {
            self.narration = self.spawn_sink_silent();
        }
        let Some(sink) = &self.narration else { return };
        sink.stop();
        let Some(source) = self.decode(src) else { return };
        sink.set_volume(if self.muted_all { 0.0 } else { 1.0 });
        sink.append(source);
        sink.play();
    }

    fn spawn_sink(&self, src: &str) -> Option<Sink> {
        let sink = self.spawn_sink_silent()?;
        let source = self.decode(src)?;
        sink.set_volume(if self.muted_all { 0.0 } else { 1.0 });
        sink.append(source);
        sink.play();
        Some(sink)
    }

    fn spawn_sink_silent(&self) -> Option<Sink> {
        let handle = self.handle.as_ref()?;
        match Sink::try_new(handle) {
            Ok(sink) => Some(sink),
            Err(e) => {
                tracing::warn!("Failed to create audio sink: {e}");
                None
            }
        }
    }

    fn decode(&self, src: &str) -> Option<Decoder<BufReader<File>>> {
        let path = self.resolve(src)?;
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Failed to open audio file {}: {e}", path.display());
                return None;
            }
        };
        match Decoder::new(BufReader::new(file)) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("Failed to decode audio file {}: {e}", path.display());
                None
            }
        }
    }

    fn resolve(&self, src: &str) -> Option<PathBuf> {
        if src.is_empty() {
            return None;
        }
        let path = Path::new(src);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        let joined = self.base_path.join(path);
        if joined.exists() {
            return Some(joined);
        }
        tracing::warn!("Audio source not found: {src}");
        None
    }
}
