//! Demo animations.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::controller::{Blinkt, DEFAULT_BRIGHTNESS};
use crate::error::Result;
use crate::line::LineDriver;

const RAINBOW_FRAMES: usize = 8;

/// All LEDs red, then green, then blue, one `step` each, then dark.
pub fn simple_rgb<L: LineDriver>(blinkt: &mut Blinkt<L>, step: Duration, running: &AtomicBool) -> Result<()> {
    tracing::info!("Simple RGB");

    for (name, (r, g, b)) in [("red", (255, 0, 0)), ("green", (0, 255, 0)), ("blue", (0, 0, 255))] {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        tracing::info!("Set to {}", name);
        blinkt.set_all(r, g, b, DEFAULT_BRIGHTNESS);
        blinkt.show()?;
        thread::sleep(step);
    }

    tracing::info!("Turn LEDs off");
    blinkt.clear();
    blinkt.show()
}

/// Rainbow shifting one LED per frame, then dark.
pub fn moving_rainbow<L: LineDriver>(blinkt: &mut Blinkt<L>, step: Duration, running: &AtomicBool) -> Result<()> {
    tracing::info!("Moving rainbow");

    for frame in 0..RAINBOW_FRAMES {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        for led in 0..blinkt.led_count() {
            let (r, g, b) = rainbow_color(frame + led);
            blinkt.set_pixel(led, r, g, b, DEFAULT_BRIGHTNESS)?;
        }
        blinkt.show()?;
        thread::sleep(step);
    }

    tracing::info!("Turn LEDs off");
    blinkt.clear();
    blinkt.show()
}

/// Three sine waves a third of a turn apart.
fn rainbow_color(position: usize) -> (u8, u8, u8) {
    let angle = position as f64 * 0.5;
    let channel = |phase: f64| ((angle + phase).sin() + 1.0) * 127.5;
    (
        channel(0.0) as u8,
        channel(PI / 3.0) as u8,
        channel(PI * 2.0 / 3.0) as u8,
    )
}
