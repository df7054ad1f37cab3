use core::fmt;

/// Width of the default scanline work buffer, in pixels.
pub const DEFAULT_MAX_WIDTH: usize = 320;

/// How a frame's pixels are treated once the next frame is drawn.
///
/// Only [`DisposalMethod::RestoreToBackground`] changes how a scanline is composited: its
/// transparent pixels reveal the background color instead of being skipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DisposalMethod {
    /// No disposal specified.
    #[default]
    NotSpecified = 0,
    /// Leave the frame in place.
    DoNotDispose = 1,
    /// Restore the frame's area to the background color.
    RestoreToBackground = 2,
    /// Restore the frame's area to what was there before it.
    RestoreToPrevious = 3,
}

impl DisposalMethod {
    /// Decode the 3-bit disposal field of a graphics control block. Reserved values map
    /// to [`DisposalMethod::NotSpecified`].
    pub fn from_u8(n: u8) -> Self {
        match n {
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::RestoreToBackground,
            3 => DisposalMethod::RestoreToPrevious,
            _ => DisposalMethod::NotSpecified,
        }
    }
}

/// Errors that keep playback from starting
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The requested resource does not exist in storage
    ResourceNotFound,
    /// The display is wider than the scanline work buffer
    DisplayTooWide {
        /// Logical width reported by the display
        width: u32,
        /// Capacity of the work buffer
        capacity: usize,
    },
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::ResourceNotFound => f.write_str("resource not found in storage"),
            PlaybackError::DisplayTooWide { width, capacity } => write!(
                f,
                "display width {width} exceeds scanline buffer capacity {capacity}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlaybackError {}

/// Why a playback that did start came to an end. None of these are failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The decoder reported that no frames remain
    Exhausted,
    /// The cancel token was raised or the configured frame limit was reached
    Cancelled,
    /// The decoder gave up on the stream; playback stops silently
    DecodeFailed,
}
