use crate::line::Line;

/// A specialized result type for the strip controller.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Pixel index {index} is out of range for a strip of {len} LEDs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to drive the {line} line")]
    LineAccess {
        line: Line,
        #[source]
        source: LineError,
    },

    #[error("Failed to release the output lines")]
    Release(#[source] LineError),
}

/// Failure reported by a [`crate::line::LineDriver`].
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Digital output error: {0:?}")]
    Digital(embedded_hal::digital::ErrorKind),
}
