//! Linux sysfs GPIO lines (`/sys/class/gpio`).

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, LineError, Result};
use crate::line::{Line, LineDriver};

pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// How long a freshly exported pin may take to become writable
/// (udev adjusts permissions asynchronously).
const EXPORT_TIMEOUT: Duration = Duration::from_secs(1);
const EXPORT_POLL: Duration = Duration::from_millis(10);

/// Data and clock lines driven through sysfs value files.
#[derive(Debug)]
pub struct SysfsLines {
    root: PathBuf,
    data: SysfsPin,
    clock: SysfsPin,
    released: bool,
}

impl SysfsLines {
    /// Export (if needed) and configure both pins as outputs.
    pub fn open(root: impl Into<PathBuf>, data_pin: u32, clock_pin: u32) -> Result<Self> {
        let root = root.into();

        let data = SysfsPin::open(&root, data_pin)
            .map_err(|e| Error::LineAccess { line: Line::Data, source: e.into() })?;

        let clock = match SysfsPin::open(&root, clock_pin) {
            Ok(clock) => clock,
            Err(e) => {
                // Leave the system as we found it
                let _ = data.unexport(&root);
                return Err(Error::LineAccess { line: Line::Clock, source: e.into() });
            }
        };

        tracing::debug!(data_pin, clock_pin, root = %root.display(), "Opened sysfs GPIO lines");

        Ok(SysfsLines { root, data, clock, released: false })
    }
}

impl LineDriver for SysfsLines {
    fn write(&mut self, line: Line, level: bool) -> std::result::Result<(), LineError> {
        let pin = match line {
            Line::Data => &mut self.data,
            Line::Clock => &mut self.clock,
        };
        pin.set(level)?;
        Ok(())
    }

    fn release(&mut self) -> std::result::Result<(), LineError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        // Try both even if the first one fails
        let data = self.data.unexport(&self.root);
        let clock = self.clock.unexport(&self.root);
        tracing::debug!(data_pin = self.data.number, clock_pin = self.clock.number, "Released sysfs GPIO lines");
        data.and(clock).map_err(LineError::from)
    }
}

#[derive(Debug)]
struct SysfsPin {
    number: u32,
    value: File,
    exported_here: bool,
}

impl SysfsPin {
    fn open(root: &Path, number: u32) -> io::Result<Self> {
        let dir = root.join(format!("gpio{}", number));
        let mut exported_here = false;

        if !dir.exists() {
            fs::write(root.join("export"), number.to_string())?;
            exported_here = true;
            tracing::debug!(pin = number, "Exported GPIO");
        }

        let configured = retry_until_ready(|| fs::write(dir.join("direction"), "out")).and_then(|_| {
            retry_until_ready(|| OpenOptions::new().write(true).open(dir.join("value")))
        });

        match configured {
            Ok(value) => Ok(SysfsPin { number, value, exported_here }),
            Err(e) => {
                if exported_here {
                    let _ = fs::write(root.join("unexport"), number.to_string());
                }
                Err(e)
            }
        }
    }

    fn set(&mut self, level: bool) -> io::Result<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(if level { b"1" } else { b"0" })
    }

    fn unexport(&self, root: &Path) -> io::Result<()> {
        if !self.exported_here {
            return Ok(());
        }
        fs::write(root.join("unexport"), self.number.to_string())
    }
}

/// Retry `op` while the pin directory is still being set up.
fn retry_until_ready<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let deadline = Instant::now() + EXPORT_TIMEOUT;
    loop {
        match op() {
            Err(e)
                if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied)
                    && Instant::now() < deadline =>
            {
                thread::sleep(EXPORT_POLL);
            }
            result => return result,
        }
    }
}
