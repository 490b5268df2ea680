use crate::error::{Error, Result};
use crate::line::LineDriver;
use crate::pixel_buffer::PixelBuffer;
use crate::protocol;

/// LED count of the Blinkt! board.
pub const DEFAULT_LED_COUNT: usize = 8;

/// Brightness used when the caller does not pick one.
pub const DEFAULT_BRIGHTNESS: f32 = 0.2;

/// APA102 strip controller
///
/// Pixel updates only touch the in-memory buffer; nothing reaches the strip
/// until [`Blinkt::show`]. When the controller goes away, by [`Blinkt::dispose`]
/// or by being dropped, the strip is blanked and the lines are released.
pub struct Blinkt<L: LineDriver> {
    lines: L,
    buffer: PixelBuffer,
    released: bool,
}

impl<L: LineDriver> Blinkt<L> {
    /// Take over already opened lines and blank the strip.
    pub fn new(lines: L, led_count: usize) -> Result<Self> {
        let mut blinkt = Blinkt {
            lines,
            buffer: PixelBuffer::new(led_count),
            released: false,
        };

        blinkt.show()?;

        Ok(blinkt)
    }

    pub fn led_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8, brightness: f32) -> Result<()> {
        self.buffer.set(index, r, g, b, brightness)
    }

    /// [`Blinkt::set_pixel`] at [`DEFAULT_BRIGHTNESS`].
    pub fn set_pixel_rgb(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_pixel(index, r, g, b, DEFAULT_BRIGHTNESS)
    }

    pub fn set_all(&mut self, r: u8, g: u8, b: u8, brightness: f32) {
        self.buffer.fill(r, g, b, brightness);
    }

    /// Blank the buffer. Call [`Blinkt::show`] to make it visible.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Encode the buffer and clock it out to the strip.
    pub fn show(&mut self) -> Result<()> {
        let frame = protocol::encode(&self.buffer);

        if tracing::enabled!(tracing::Level::TRACE) {
            let hex: String = frame.iter()
                .map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ");
            tracing::trace!(frame = %hex, "Sending frame");
        }

        protocol::transmit(&mut self.lines, &frame)?;
        tracing::debug!(bytes = frame.len(), leds = self.buffer.len(), "Frame sent");

        Ok(())
    }

    /// Blank the strip and release the lines.
    ///
    /// The lines are released even when the final frame could not be sent;
    /// the first failure is returned.
    pub fn dispose(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        self.clear();
        let shown = self.show();
        let released = self.lines.release().map_err(Error::Release);

        shown.and(released)
    }
}

impl<L: LineDriver> Drop for Blinkt<L> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::warn!(error = %e, "Failed to turn off LEDs on shutdown");
        }
    }
}
