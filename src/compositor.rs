//! Scanline compositing.
//!
//! A decoder hands over one row of palette indices at a time. The compositor clips the row
//! against the display, resolves it to [`Rgb565`] in a fixed work buffer and pushes it
//! through the display's address window. Transparent pixels are never written: each
//! maximal run of opaque pixels becomes one windowed transaction, so what was drawn
//! underneath shows through.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::{
    common::{DisposalMethod, PlaybackError},
    display::WindowedDisplay,
    logging::{log_trace, log_warn},
    palette::Palette,
};

/// Per-frame state shared by every scanline of the frame
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub palette: &'a Palette,
    pub disposal: DisposalMethod,
}

/// One decoded row of a frame
pub struct ScanlineDescriptor<'a> {
    /// Top-left corner of the frame on the logical screen
    pub origin: Point,
    /// Row offset inside the frame
    pub line: u32,
    /// Declared row width
    pub width: u32,
    /// Palette indices. May be rewritten while compositing.
    pub pixels: &'a mut [u8],
    /// Transparent index, if the frame has one
    pub transparent: Option<u8>,
    /// Background index
    pub background: u8,
}

impl ScanlineDescriptor<'_> {
    /// Screen row this scanline lands on. Wide enough that no origin and line offset can
    /// overflow it.
    pub fn screen_y(&self) -> i64 {
        i64::from(self.origin.y) + i64::from(self.line)
    }
}

/// Turns scanlines into windowed pixel pushes, `W` pixels at most per row
pub struct ScanlineCompositor<const W: usize> {
    buffer: [Rgb565; W],
}

impl<const W: usize> ScanlineCompositor<W> {
    /// Build a compositor for `display`, checking that a full display row fits the buffer
    pub fn new<D: WindowedDisplay>(display: &D) -> Result<Self, PlaybackError> {
        let width = display.logical_size().width;
        if width as usize > W {
            return Err(PlaybackError::DisplayTooWide { width, capacity: W });
        }
        Ok(Self {
            buffer: [Rgb565::BLACK; W],
        })
    }

    /// Widest row, in pixels, the work buffer holds
    pub const fn capacity(&self) -> usize {
        W
    }

    /// Composite one scanline onto `display`.
    ///
    /// Rows outside the display are dropped silently, as are display errors.
    pub fn draw_scanline<D: WindowedDisplay>(
        &mut self,
        frame: &FrameContext<'_>,
        line: ScanlineDescriptor<'_>,
        display: &mut D,
    ) {
        let bounds = display.logical_size();
        // columns past i32::MAX are unaddressable, so x + width always fits an i32
        let right = i64::from(bounds.width).min(i64::from(i32::MAX));
        let bottom = i64::from(bounds.height).min(i64::from(i32::MAX));
        let x = i64::from(line.origin.x);
        let y = line.screen_y();

        if !(0..bottom).contains(&y) || !(0..right).contains(&x) {
            log_trace!(x, y, "scanline outside display");
            return;
        }
        let width = (line.width as usize)
            .min((right - x) as usize)
            .min(line.pixels.len())
            .min(W);
        if width < 1 {
            log_trace!(x, y, "scanline clipped away");
            return;
        }
        let (x, y) = (x as i32, y as i32);

        let indices = &mut line.pixels[..width];
        let mut transparent = line.transparent;

        if frame.disposal == DisposalMethod::RestoreToBackground {
            if let Some(t) = transparent {
                indices
                    .iter_mut()
                    .filter(|idx| **idx == t)
                    .for_each(|idx| *idx = line.background);
            }
            transparent = None;
        }

        match transparent {
            None => self.push_run(frame.palette, indices, Point::new(x, y), display),
            Some(t) => {
                let mut cursor = 0;
                while cursor < width {
                    let opaque = indices[cursor..]
                        .iter()
                        .take_while(|&&idx| idx != t)
                        .count();
                    if opaque > 0 {
                        let run = &indices[cursor..cursor + opaque];
                        let at = Point::new(x + cursor as i32, y);
                        self.push_run(frame.palette, run, at, display);
                        cursor += opaque;
                    }
                    cursor += indices[cursor..]
                        .iter()
                        .take_while(|&&idx| idx == t)
                        .count();
                }
            }
        }
    }

    /// Resolve `run` into the work buffer and write it as one `run.len()` x 1 window
    fn push_run<D: WindowedDisplay>(
        &mut self,
        palette: &Palette,
        run: &[u8],
        at: Point,
        display: &mut D,
    ) {
        let pixels = &mut self.buffer[..run.len()];
        for (px, &idx) in pixels.iter_mut().zip(run) {
            *px = palette.get(idx);
        }

        log_trace!(x = at.x, y = at.y, width = run.len(), "pixel run");
        let window = Rectangle::new(at, Size::new(run.len() as u32, 1));
        if let Err(err) = write_window(display, window, pixels) {
            log_warn!(?err, x = at.x, y = at.y, "display transaction failed");
        }
    }
}

fn write_window<D: WindowedDisplay>(
    display: &mut D,
    window: Rectangle,
    pixels: &[Rgb565],
) -> Result<(), D::Error> {
    display.begin_transaction()?;
    let written = display
        .set_window(window)
        .and_then(|_| display.write_pixels(pixels));
    let ended = display.end_transaction();
    written.and(ended)
}
