//! User-facing output.
//!
//! Informational lines go to stdout and are dropped in quiet mode. Error
//! lines go to stderr and are always written.

use std::fmt::Display;
use std::io::{self, Write};

pub struct Console {
    quiet: bool,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self::with_writers(quiet, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(
        quiet: bool,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self { quiet, out, err }
    }

    pub fn info(&mut self, message: impl Display) {
        if self.quiet {
            return;
        }
        // Nothing sensible to do if the terminal went away.
        let _ = writeln!(self.out, "{}", message);
        let _ = self.out.flush();
    }

    pub fn error(&mut self, message: impl Display) {
        let _ = writeln!(self.err, "ERROR: {}", message);
        let _ = self.err.flush();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory writer for asserting on console output.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            let buf = self.0.lock().expect("buffer lock poisoned");
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let mut buf = self.0.lock().expect("buffer lock poisoned");
            buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Build a console that writes into two inspectable buffers.
    pub fn captured(quiet: bool) -> (super::Console, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let console =
            super::Console::with_writers(quiet, Box::new(out.clone()), Box::new(err.clone()));
        (console, out, err)
    }
}
