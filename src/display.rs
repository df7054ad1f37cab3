use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

/// A display written through an address window.
///
/// Every write is framed as `begin_transaction`, `set_window`, `write_pixels`,
/// `end_transaction`. Pixels fill the window left to right, top to bottom.
pub trait WindowedDisplay {
    type Error: core::fmt::Debug;

    /// Addressable area, anchored at the origin
    fn logical_size(&self) -> Size;

    fn begin_transaction(&mut self) -> Result<(), Self::Error>;

    fn set_window(&mut self, window: Rectangle) -> Result<(), Self::Error>;

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), Self::Error>;

    fn end_transaction(&mut self) -> Result<(), Self::Error>;
}

/// Drives any embedded-graphics [`DrawTarget`] as a [`WindowedDisplay`].
///
/// The window is only remembered; `write_pixels` fills it with `fill_contiguous`.
pub struct WindowedDrawTarget<D> {
    target: D,
    window: Rectangle,
}

impl<D> WindowedDrawTarget<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            window: Rectangle::zero(),
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> WindowedDisplay for WindowedDrawTarget<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    type Error = D::Error;

    fn logical_size(&self) -> Size {
        self.target.bounding_box().size
    }

    fn begin_transaction(&mut self) -> Result<(), D::Error> {
        Ok(())
    }

    fn set_window(&mut self, window: Rectangle) -> Result<(), D::Error> {
        self.window = window;
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), D::Error> {
        self.target
            .fill_contiguous(&self.window, pixels.iter().copied())
    }

    fn end_transaction(&mut self) -> Result<(), D::Error> {
        self.window = Rectangle::zero();
        Ok(())
    }
}
