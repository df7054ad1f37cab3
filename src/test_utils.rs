use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use std::vec::Vec;

use crate::{
    common::DisposalMethod,
    compositor::{FrameContext, ScanlineDescriptor},
    display::WindowedDisplay,
    palette::Palette,
    player::{CancelToken, FrameDecoder, FrameStatus, ScanlineSink},
    stream::ByteSource,
};

// TODO: use e-g framebuffer when it's added
pub(crate) struct Framebuffer<const WIDTH: usize, const HEIGHT: usize> {
    pixels: [[Rgb565; WIDTH]; HEIGHT],
}

impl<const WIDTH: usize, const HEIGHT: usize> Framebuffer<WIDTH, HEIGHT> {
    pub fn new() -> Self {
        let color = Rgb565::BLACK;

        Self {
            pixels: [[color; WIDTH]; HEIGHT],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb565 {
        self.pixels[y][x]
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> DrawTarget for Framebuffer<WIDTH, HEIGHT> {
    type Error = std::convert::Infallible;
    type Color = Rgb565;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.pixels[y][x] = c;
                }
            }
        }

        Ok(())
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> OriginDimensions for Framebuffer<WIDTH, HEIGHT> {
    fn size(&self) -> embedded_graphics::prelude::Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

/// Palette with index 0 black and index 1 white
pub(crate) fn white_on_black() -> Palette {
    [Rgb565::BLACK, Rgb565::WHITE].into_iter().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub window: Rectangle,
    pub pixels: Vec<Rgb565>,
}

/// Display that records every completed pixel write and checks transaction framing
pub(crate) struct RecordingDisplay {
    size: Size,
    window: Option<Rectangle>,
    open: bool,
    pub transactions: Vec<Transaction>,
    pub begun: usize,
    pub ended: usize,
    pub fail_writes: bool,
}

impl RecordingDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            window: None,
            open: false,
            transactions: Vec::new(),
            begun: 0,
            ended: 0,
            fail_writes: false,
        }
    }
}

impl WindowedDisplay for RecordingDisplay {
    type Error = ();

    fn logical_size(&self) -> Size {
        self.size
    }

    fn begin_transaction(&mut self) -> Result<(), ()> {
        assert!(!self.open, "nested transaction");
        self.open = true;
        self.begun += 1;
        Ok(())
    }

    fn set_window(&mut self, window: Rectangle) -> Result<(), ()> {
        assert!(self.open, "window set outside a transaction");
        self.window = Some(window);
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), ()> {
        assert!(self.open, "pixels written outside a transaction");
        let window = self.window.expect("pixels written without a window");
        assert_eq!(window.size.width as usize * window.size.height as usize, pixels.len());
        if self.fail_writes {
            return Err(());
        }
        self.transactions.push(Transaction {
            window,
            pixels: pixels.to_vec(),
        });
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), ()> {
        assert!(self.open, "transaction ended twice");
        self.open = false;
        self.window = None;
        self.ended += 1;
        Ok(())
    }
}

/// One canned scanline
#[derive(Clone)]
pub(crate) struct ScriptedRow {
    pub line: u32,
    pub pixels: Vec<u8>,
}

/// One canned frame
#[derive(Clone)]
pub(crate) struct ScriptedFrame {
    pub origin: Point,
    pub palette: Palette,
    pub disposal: DisposalMethod,
    pub transparent: Option<u8>,
    pub background: u8,
    pub delay_ms: u32,
    pub rows: Vec<ScriptedRow>,
}

impl ScriptedFrame {
    /// `height` opaque rows of `width` pixels, all index 1
    pub fn solid(origin: Point, width: usize, height: u32) -> Self {
        Self {
            origin,
            palette: white_on_black(),
            disposal: DisposalMethod::NotSpecified,
            transparent: None,
            background: 0,
            delay_ms: 40,
            rows: (0..height)
                .map(|line| ScriptedRow {
                    line,
                    pixels: std::vec![1; width],
                })
                .collect(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum ScriptError {
    BadSignature,
    Truncated,
    Scripted,
}

pub(crate) const SIGNATURE: &[u8; 6] = b"GIF89a";

/// Decoder stand-in: checks a signature in the stream, then replays `frames`, consuming one
/// byte of the stream per frame.
pub(crate) struct ScriptedDecoder<'a> {
    pub frames: Vec<ScriptedFrame>,
    next: usize,
    pub started: bool,
    pub fail_at: Option<usize>,
    pub cancel_at: Option<(usize, &'a CancelToken)>,
    pub positions: Vec<u32>,
}

impl<'a> ScriptedDecoder<'a> {
    pub fn new(frames: Vec<ScriptedFrame>) -> Self {
        Self {
            frames,
            next: 0,
            started: false,
            fail_at: None,
            cancel_at: None,
            positions: Vec::new(),
        }
    }

    pub fn decoded(&self) -> usize {
        self.next
    }
}

impl FrameDecoder for ScriptedDecoder<'_> {
    type Error = ScriptError;

    fn start<B: ByteSource>(&mut self, source: &mut B) -> Result<(), ScriptError> {
        let mut sig = [0u8; 6];
        if source.read(&mut sig) < sig.len() || &sig != SIGNATURE {
            return Err(ScriptError::BadSignature);
        }
        self.started = true;
        Ok(())
    }

    fn decode_frame<B: ByteSource, K: ScanlineSink>(
        &mut self,
        source: &mut B,
        sink: &mut K,
    ) -> Result<FrameStatus, ScriptError> {
        if self.fail_at == Some(self.next) {
            return Err(ScriptError::Scripted);
        }
        let mut tag = [0u8; 1];
        if source.read(&mut tag) != 1 {
            return Err(ScriptError::Truncated);
        }
        self.positions.push(source.position());

        let frame = &self.frames[self.next];
        let ctx = FrameContext {
            palette: &frame.palette,
            disposal: frame.disposal,
        };
        for row in &frame.rows {
            let mut pixels = row.pixels.clone();
            sink.draw_scanline(
                &ctx,
                ScanlineDescriptor {
                    origin: frame.origin,
                    line: row.line,
                    width: pixels.len() as u32,
                    pixels: &mut pixels,
                    transparent: frame.transparent,
                    background: frame.background,
                },
            );
        }
        let delay_ms = frame.delay_ms;

        if let Some((at, token)) = self.cancel_at {
            if at == self.next {
                token.cancel();
            }
        }
        self.next += 1;
        Ok(FrameStatus {
            more_frames: self.next < self.frames.len(),
            delay_ms,
        })
    }
}

/// Stream contents for a scripted animation of `frames` frames: signature, one tag byte per
/// frame, and a trailer byte the read policy never hands out
pub(crate) fn scripted_stream(frames: usize) -> Vec<u8> {
    let mut bytes = SIGNATURE.to_vec();
    bytes.extend(std::iter::repeat(0x2C).take(frames));
    bytes.push(0x3B);
    bytes
}
