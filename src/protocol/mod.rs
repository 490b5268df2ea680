//! Wire encoding and bit-banged transmission.
//!
//! Encoding is split in two pure steps (buffer to bytes, bytes to line
//! writes) so the exact output can be checked without any hardware. The
//! only side effect lives in [`transmit`].

pub mod apa102;

use crate::error::{Error, Result};
use crate::line::{Line, LineDriver};
use crate::pixel_buffer::PixelBuffer;

pub use apa102::build_apa102_frame;

/// Encode the whole buffer into one wire frame.
pub fn encode(buffer: &PixelBuffer) -> Vec<u8> {
    build_apa102_frame(buffer.pixels())
}

/// Line writes that clock `frame` out, MSB first.
///
/// Every bit is three writes: data level, clock high, clock low.
pub fn line_writes(frame: &[u8]) -> impl Iterator<Item = (Line, bool)> + '_ {
    frame.iter().flat_map(|&byte| {
        (0..8).rev().flat_map(move |shift| {
            let bit = (byte >> shift) & 1 == 1;
            [(Line::Data, bit), (Line::Clock, true), (Line::Clock, false)]
        })
    })
}

/// Drive `frame` out on `lines`.
///
/// Stops at the first failed write. The strip is then mid-frame, so the only
/// recovery is sending a complete frame again.
pub fn transmit<L: LineDriver + ?Sized>(lines: &mut L, frame: &[u8]) -> Result<()> {
    for (line, level) in line_writes(frame) {
        lines
            .write(line, level)
            .map_err(|source| Error::LineAccess { line, source })?;
    }
    Ok(())
}
