//! Route `tracing` events to the browser console.
//!
//! Events are formatted by the `tracing-subscriber` fmt layer and written with
//! `console.log`/`console.warn`/`console.error` according to their level, so
//! DevTools filtering keeps working. Timestamps are omitted.

use std::io;
use std::sync::OnceLock;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, Registry};
use wasm_bindgen::prelude::*;

static LEVEL_HANDLE: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

/// Writer that buffers one formatted event and emits it on drop.
pub(crate) struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let message = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(message.trim_end());
        if self.level == Level::ERROR {
            web_sys::console::error_1(&message);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&message);
        } else if self.level == Level::INFO {
            web_sys::console::info_1(&message);
        } else {
            web_sys::console::debug_1(&message);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Parse a level name. Unknown names fall back to `info`.
pub(crate) fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

/// Install the console subscriber at `info`. Later calls do nothing.
pub(crate) fn init() {
    if LEVEL_HANDLE.get().is_some() {
        return;
    }
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .without_time()
            .with_ansi(false)
            .with_target(false)
            .with_writer(ConsoleMakeWriter),
    );

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = LEVEL_HANDLE.set(handle);
    }
}

/// Change the console log level (`error`, `warn`, `info`, `debug`, `trace`,
/// `off`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let Some(handle) = LEVEL_HANDLE.get() else {
        return Err(JsValue::from_str("logging is not initialized"));
    };
    handle
        .reload(parse_level(level))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
