/*!
 * Console Device
 * Character input and bulk output used by descriptors 0 and 1
 */

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{Read, Write};

/// Console collaborator
pub trait Console: Send + Sync {
    /// Read one character of input
    fn getc(&self) -> u8;

    /// Write a buffer of output in one call
    fn putbuf(&self, buf: &[u8]);
}

/// In-memory console for tests and scripted runs
///
/// Input is a queue fed by `push_input`; reading past the end yields NUL
/// instead of blocking forever.
#[derive(Debug, Default)]
pub struct BufferedConsole {
    input: Mutex<VecDeque<u8>>,
    output: Mutex<Vec<u8>>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for later `getc` calls
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes.iter().copied());
    }

    /// Everything written so far, lossily decoded
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output.lock()).into_owned()
    }

    /// Output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_string).collect()
    }
}

impl Console for BufferedConsole {
    fn getc(&self) -> u8 {
        self.input.lock().pop_front().unwrap_or(0)
    }

    fn putbuf(&self, buf: &[u8]) {
        self.output.lock().extend_from_slice(buf);
    }
}

/// Console backed by the host's stdin/stdout
#[derive(Debug, Default)]
pub struct StdConsole {
    // Serializes output so one putbuf is never interleaved with another
    out_lock: Mutex<()>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for StdConsole {
    fn getc(&self) -> u8 {
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(1) => byte[0],
            _ => 0,
        }
    }

    fn putbuf(&self, buf: &[u8]) {
        let _guard = self.out_lock.lock();
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(buf).and_then(|()| stdout.flush()) {
            tracing::warn!(error = %e, "console write failed");
        }
    }
}
