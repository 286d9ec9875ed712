//! A simple `log` implementation used by examples.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the example logger. `level` is one of `error`, `warn`, `info`,
/// `debug`, `trace`; anything else falls back to `info`.
///
/// Installing twice returns an error from `log`; callers that may run
/// repeatedly (tests, library users) can ignore it.
pub fn init(level: &str) -> Result<(), log::SetLoggerError> {
    let filter = match level.to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    log::set_logger(&LOGGER).map(|()| log::set_max_level(filter))
}
