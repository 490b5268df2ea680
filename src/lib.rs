//! Driver for APA102 LED strips bit-banged over two GPIO lines, such as the
//! Pimoroni Blinkt! board.
//!
//! ```no_run
//! use blinkt::{Blinkt, SysfsLines};
//!
//! # fn main() -> blinkt::Result<()> {
//! let lines = SysfsLines::open("/sys/class/gpio", 23, 24)?;
//! let mut blinkt = Blinkt::new(lines, 8)?;
//! blinkt.set_pixel(0, 255, 0, 0, 0.5)?;
//! blinkt.show()?;
//! blinkt.dispose()
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod line;
pub mod pixel_buffer;
pub mod protocol;
pub mod samples;
pub mod sysfs;

pub use controller::{Blinkt, DEFAULT_BRIGHTNESS, DEFAULT_LED_COUNT};
pub use error::{Error, LineError, Result};
pub use line::{Line, LineDriver, PinLines, RecordingLines};
pub use sysfs::SysfsLines;
