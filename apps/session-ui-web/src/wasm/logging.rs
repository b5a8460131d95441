use super::*;
use std::io;

use session_ui_core::LogLevel;
use tracing_subscriber::fmt::MakeWriter;

/// Routes formatted events to the browser console, one call per event.
struct ConsoleMakeWriter;

struct ConsoleWriter {
    level: tracing::Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let message = JsValue::from_str(line);
        match self.level {
            tracing::Level::ERROR => web_sys::console::error_1(&message),
            tracing::Level::WARN => web_sys::console::warn_1(&message),
            tracing::Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: tracing::Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

pub(super) fn install(level: LogLevel) {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level.as_tracing_level())
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        web_sys::console::warn_1(&JsValue::from_str(
            "session ui logging already installed",
        ));
    }
}
