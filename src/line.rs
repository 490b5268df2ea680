use std::fmt;

use embedded_hal::digital::{Error as _, OutputPin, PinState};

use crate::error::LineError;

/// The two logical output lines of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Data,
    Clock,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Data => f.write_str("data"),
            Line::Clock => f.write_str("clock"),
        }
    }
}

/// Two-line digital output used by the encoder.
///
/// Implementations are opened before they are handed to a controller, so the
/// only required operation is setting a line level. `release` is called once
/// when the controller is torn down, after the final dark frame.
pub trait LineDriver {
    fn write(&mut self, line: Line, level: bool) -> Result<(), LineError>;

    fn release(&mut self) -> Result<(), LineError> {
        Ok(())
    }
}

impl<L: LineDriver + ?Sized> LineDriver for &mut L {
    fn write(&mut self, line: Line, level: bool) -> Result<(), LineError> {
        (**self).write(line, level)
    }

    fn release(&mut self) -> Result<(), LineError> {
        (**self).release()
    }
}

impl<L: LineDriver + ?Sized> LineDriver for Box<L> {
    fn write(&mut self, line: Line, level: bool) -> Result<(), LineError> {
        (**self).write(line, level)
    }

    fn release(&mut self) -> Result<(), LineError> {
        (**self).release()
    }
}

/// Lines backed by a pair of `embedded-hal` output pins.
pub struct PinLines<D, C> {
    data: D,
    clock: C,
}

impl<D: OutputPin, C: OutputPin> PinLines<D, C> {
    pub fn new(data: D, clock: C) -> Self {
        PinLines { data, clock }
    }

    pub fn into_inner(self) -> (D, C) {
        (self.data, self.clock)
    }
}

impl<D: OutputPin, C: OutputPin> LineDriver for PinLines<D, C> {
    fn write(&mut self, line: Line, level: bool) -> Result<(), LineError> {
        let state = PinState::from(level);
        match line {
            Line::Data => self
                .data
                .set_state(state)
                .map_err(|e| LineError::Digital(e.kind())),
            Line::Clock => self
                .clock
                .set_state(state)
                .map_err(|e| LineError::Digital(e.kind())),
        }
    }
}

/// In-memory driver that keeps every write.
///
/// The recorded stream can be decoded back into the bytes a downstream LED
/// would have latched: the data level is sampled on every rising clock edge.
#[derive(Debug, Default, Clone)]
pub struct RecordingLines {
    writes: Vec<(Line, bool)>,
    released: bool,
}

impl RecordingLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[(Line, bool)] {
        &self.writes
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Bits latched on rising clock edges, MSB first.
    pub fn sampled_bits(&self) -> Vec<bool> {
        let mut data = false;
        let mut clock = false;
        let mut bits = Vec::new();

        for &(line, level) in &self.writes {
            match line {
                Line::Data => data = level,
                Line::Clock => {
                    if level && !clock {
                        bits.push(data);
                    }
                    clock = level;
                }
            }
        }

        bits
    }

    /// Complete bytes latched so far; a trailing partial byte is dropped.
    pub fn sampled_bytes(&self) -> Vec<u8> {
        self.sampled_bits()
            .chunks_exact(8)
            .map(|bits| bits.iter().fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit)))
            .collect()
    }
}

impl LineDriver for RecordingLines {
    fn write(&mut self, line: Line, level: bool) -> Result<(), LineError> {
        self.writes.push((line, level));
        Ok(())
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.released = true;
        Ok(())
    }
}
