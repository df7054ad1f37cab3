//! Playback of a stored animation.
//!
//! [`Player`] opens a resource through [`FileStream`], hands the stream and a scanline sink
//! to a [`FrameDecoder`] and pumps it one frame at a time until the decoder runs out of
//! frames, fails, or the caller cancels. The stream is closed on every exit path.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::{
    common::{PlaybackEnd, PlaybackError},
    compositor::{FrameContext, ScanlineCompositor, ScanlineDescriptor},
    display::WindowedDisplay,
    logging::{log_debug, log_warn},
    storage::{Storage, StorageFile},
    stream::{ByteSource, FileStream},
};

/// Receiver for decoded scanlines
pub trait ScanlineSink {
    fn draw_scanline(&mut self, frame: &FrameContext<'_>, line: ScanlineDescriptor<'_>);
}

/// Result of decoding one frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameStatus {
    /// Whether another frame follows this one
    pub more_frames: bool,
    /// How long this frame should stay on screen, in milliseconds
    pub delay_ms: u32,
}

/// Turns a compressed byte stream into scanlines.
///
/// All bytes come from the [`ByteSource`] and every decoded row goes to the
/// [`ScanlineSink`]; a decoder keeps no other I/O of its own.
pub trait FrameDecoder {
    type Error: core::fmt::Debug;

    /// Called once after the stream is opened, before the first frame
    fn start<B: ByteSource>(&mut self, source: &mut B) -> Result<(), Self::Error> {
        let _ = source;
        Ok(())
    }

    /// Decode the next frame, calling `sink` once per output scanline
    fn decode_frame<B: ByteSource, K: ScanlineSink>(
        &mut self,
        source: &mut B,
        sink: &mut K,
    ) -> Result<FrameStatus, Self::Error>;
}

/// Waits out frame delays
pub trait Pacer {
    fn pause(&mut self, delay_ms: u32);
}

/// Plays frames back to back
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _delay_ms: u32) {}
}

/// Sleeps the current thread for each frame delay
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

#[cfg(feature = "std")]
impl Pacer for ThreadSleep {
    fn pause(&mut self, delay_ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(delay_ms as u64));
    }
}

/// Cooperative stop request, checked once per frame.
///
/// Can live in a `static` so an interrupt or request handler can stop playback. The
/// player never clears it; call [`CancelToken::reset`] before the next playback.
#[derive(Debug, Default)]
pub struct CancelToken(AtomicBool);

impl CancelToken {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Opening,
    Playing,
    Closed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Pause for each frame's delay after drawing it
    pub frame_sync: bool,
    /// Stop after this many frames
    pub frame_limit: Option<u32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            frame_sync: true,
            frame_limit: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub end: PlaybackEnd,
    /// Frames fully decoded
    pub frames: u32,
}

struct CompositorSink<'a, D, const W: usize> {
    compositor: &'a mut ScanlineCompositor<W>,
    display: &'a mut D,
}

impl<D: WindowedDisplay, const W: usize> ScanlineSink for CompositorSink<'_, D, W> {
    fn draw_scanline(&mut self, frame: &FrameContext<'_>, line: ScanlineDescriptor<'_>) {
        self.compositor.draw_scanline(frame, line, self.display);
    }
}

/// Plays animations from `storage` onto `display`, one at a time
pub struct Player<S, D, P, const W: usize> {
    storage: S,
    display: D,
    pacer: P,
    compositor: ScanlineCompositor<W>,
    config: PlayerConfig,
    state: PlaybackState,
}

impl<S, D, P, const W: usize> Player<S, D, P, W>
where
    S: Storage,
    D: WindowedDisplay,
    P: Pacer,
{
    pub fn new(
        storage: S,
        display: D,
        pacer: P,
        config: PlayerConfig,
    ) -> Result<Self, PlaybackError> {
        let compositor = ScanlineCompositor::new(&display)?;
        Ok(Self {
            storage,
            display,
            pacer,
            compositor,
            config,
            state: PlaybackState::Idle,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Settings fixed at construction
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_parts(self) -> (S, D, P) {
        (self.storage, self.display, self.pacer)
    }

    /// Play `name` to the end, or until `cancel` is raised.
    ///
    /// Fails only if the resource is missing, in which case nothing is drawn and the player
    /// stays idle. Decoder errors end playback early and are reported in the summary.
    pub fn play<Dec: FrameDecoder>(
        &mut self,
        name: &str,
        decoder: &mut Dec,
        cancel: &CancelToken,
    ) -> Result<PlaybackSummary, PlaybackError> {
        self.state = PlaybackState::Opening;
        log_debug!(name, "playback opening");

        let opened = if self.storage.exists(name) {
            FileStream::open(&mut self.storage, name)
        } else {
            Err(PlaybackError::ResourceNotFound)
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(err) => {
                log_warn!(name, %err, "playback not started");
                self.state = PlaybackState::Idle;
                return Err(err);
            }
        };

        self.state = PlaybackState::Playing;
        let summary = self.pump(&mut stream, decoder, cancel);
        stream.close();
        self.state = PlaybackState::Closed;

        log_debug!(name, end = ?summary.end, frames = summary.frames, "playback closed");
        Ok(summary)
    }

    fn pump<F, Dec>(
        &mut self,
        stream: &mut FileStream<F>,
        decoder: &mut Dec,
        cancel: &CancelToken,
    ) -> PlaybackSummary
    where
        F: StorageFile,
        Dec: FrameDecoder,
    {
        let Self {
            display,
            pacer,
            compositor,
            config,
            ..
        } = self;
        let mut sink = CompositorSink {
            compositor,
            display,
        };
        let mut frames = 0;
        let finish = |end, frames| PlaybackSummary { end, frames };

        if let Err(err) = decoder.start(stream) {
            log_warn!(?err, "decoder rejected stream");
            return finish(PlaybackEnd::DecodeFailed, frames);
        }

        loop {
            if cancel.is_cancelled() || config.frame_limit.is_some_and(|limit| frames >= limit) {
                return finish(PlaybackEnd::Cancelled, frames);
            }
            match decoder.decode_frame(stream, &mut sink) {
                Ok(status) => {
                    frames += 1;
                    if config.frame_sync {
                        pacer.pause(status.delay_ms);
                    }
                    if !status.more_frames {
                        return finish(PlaybackEnd::Exhausted, frames);
                    }
                }
                Err(err) => {
                    log_warn!(?err, frames, "frame decode failed");
                    return finish(PlaybackEnd::DecodeFailed, frames);
                }
            }
        }
    }
}
