//! Log capture for tests.
//!
//! One global `log::Log` records into a thread-local buffer, so tests on
//! different threads never see each other's lines.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|lines| lines.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Install the capturing logger (once per process) and clear this thread's buffer.
pub fn capture_logs() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
}

pub fn lines_at(level: Level) -> Vec<String> {
    CAPTURED.with(|lines| {
        lines.borrow().iter().filter(|(l, _)| *l == level).map(|(_, msg)| msg.clone()).collect()
    })
}

pub fn warnings() -> Vec<String> {
    lines_at(Level::Warn)
}
