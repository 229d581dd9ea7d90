//! Line-oriented output shared by every rank of a group.
//!
//! Each line is written and flushed while holding one mutex, so lines from
//! different ranks never interleave mid-line.

use crate::error::{Result, RingtreeError};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// A cloneable handle on a shared line sink (stdout, or a buffer in tests).
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Process standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// An in-memory sink and a handle to read back what was written.
    pub fn capture() -> (Self, Captured) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let out = Self::new(SharedBuf(Arc::clone(&buf)));
        (out, Captured(buf))
    }

    /// Write `line` plus a newline and flush.
    pub fn line(&self, line: &str) -> Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| RingtreeError::LockPoisoned("output"))?;
        writeln!(sink, "{line}")?;
        sink.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// Read side of [`Output::capture`].
#[derive(Clone, Debug)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| std::io::Error::other("capture buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
