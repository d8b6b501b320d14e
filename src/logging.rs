//! `tracing` output routed to the browser console.

use std::io;
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Buffers one formatted event and hands it to `console.log` on drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&line.into());
        }
    }
}

pub fn max_level(test_mode: bool) -> Level {
    if test_mode { Level::DEBUG } else { Level::INFO }
}

/// Install the console subscriber. Later calls are no-ops.
pub fn init(test_mode: bool) {
    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_writer(ConsoleWriter::default)
            .with_max_level(max_level(test_mode))
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init();
        if let Err(err) = installed {
            web_sys::console::warn_1(&format!("logging already initialised: {err}").into());
        }
    });
}
