//! Streaming GIF playback for small, address-windowed displays, primarily for embedded,
//! no-std environments but usable anywhere.
//!
//! The crate sits between a frame decoder and a display:
//!
//! - [`FileStream`] presents a stored resource as a seekable byte source for the decoder.
//! - [`ScanlineCompositor`] takes each decoded row of palette indices, clips it to the
//!   display, and pushes the opaque runs through the display's address window using a single
//!   fixed-size work buffer.
//! - [`Player`] opens a resource, pumps the decoder frame by frame, honours frame delays and
//!   cooperative cancellation, and closes the stream again.
//!
//! Decoding the compressed bitstream is left to a [`FrameDecoder`] implementation. Any
//! [`embedded_graphics`] [`DrawTarget`] can be used as the display through
//! [`WindowedDrawTarget`].
//!
//! ```ignore
//! static STOP: CancelToken = CancelToken::new();
//!
//! let mut player: Player<_, _, _, DEFAULT_MAX_WIDTH> =
//!     Player::new(storage, WindowedDrawTarget::new(display), NoPacing, PlayerConfig::default())?;
//! let summary = player.play("/crab.gif", &mut decoder, &STOP)?;
//! ```
//!
//! Diagnostics are emitted through `tracing` when the `tracing` feature is enabled. The `std`
//! feature adds [`FsStorage`] and the [`ThreadSleep`] pacer.
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod common;
mod compositor;
mod display;
mod logging;
mod palette;
mod player;
mod storage;
mod stream;
#[cfg(test)]
mod test_utils;

pub use common::{DisposalMethod, PlaybackEnd, PlaybackError, DEFAULT_MAX_WIDTH};
pub use compositor::{FrameContext, ScanlineCompositor, ScanlineDescriptor};
pub use display::{WindowedDisplay, WindowedDrawTarget};
pub use palette::{Palette, PALETTE_LEN};
#[cfg(feature = "std")]
pub use player::ThreadSleep;
pub use player::{
    CancelToken, FrameDecoder, FrameStatus, NoPacing, Pacer, PlaybackState, PlaybackSummary,
    Player, PlayerConfig, ScanlineSink,
};
#[cfg(feature = "std")]
pub use storage::{FsFile, FsStorage};
pub use storage::{SliceFile, SliceStorage, Storage, StorageFile};
pub use stream::{ByteSource, FileStream};
