//! Output sinks for script `print` and for error reports.
//!
//! An interpreter holds two sinks: `writer` receives everything a script
//! prints, `err_writer` receives rendered failures in report mode. Hosts
//! pick stdout/stderr for a CLI, a buffer for tests and embedding, or a
//! silent sink to discard output.
//!
//! Uses enum dispatch instead of trait objects; printing is on the hot path
//! of chatty scripts.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Sink that captures output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    pub fn write(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }

    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

pub enum PrintHandlerImpl {
    Stdout,
    Stderr,
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandlerImpl {
    /// Write text as-is, flushing console sinks so prompts without a
    /// trailing newline still appear.
    pub fn write(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = err.write_all(text.as_bytes());
                let _ = err.flush();
            }
            Self::Buffer(h) => h.write(text),
            Self::Silent => {}
        }
    }

    pub fn println(&self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    /// Captured output. Empty for sinks that do not capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout | Self::Stderr | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Sink shared between an interpreter and its host.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn stderr_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stderr)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_writes_in_order() {
        let handler = buffer_handler();
        handler.write("a");
        handler.write(" ");
        handler.println("b");
        assert_eq!(handler.get_output(), "a b\n");
    }

    #[test]
    fn clear_empties_buffer() {
        let handler = buffer_handler();
        handler.println("x");
        handler.clear();
        assert!(handler.get_output().is_empty());
    }

    #[test]
    fn silent_discards() {
        let handler = silent_handler();
        handler.println("hidden");
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn console_sinks_do_not_capture() {
        assert_eq!(stderr_handler().get_output(), "");
        assert_eq!(stdout_handler().get_output(), "");
    }

    #[test]
    fn buffer_is_shareable_across_threads() {
        let handler = buffer_handler();
        let other = handler.clone();
        let t = std::thread::spawn(move || {
            for _ in 0..50 {
                other.println("a");
            }
        });
        for _ in 0..50 {
            handler.println("b");
        }
        t.join().unwrap();
        assert_eq!(handler.get_output().lines().count(), 100);
    }
}
