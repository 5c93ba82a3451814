#![cfg(feature = "std")]

use std::env;
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr().lock(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Initialize logging with a level taken from the `BROADSIDE_LOG` environment variable.
/// Defaults to `info` if the variable is not set or invalid.
pub fn init_logging() -> LevelFilter {
    let level = env::var("BROADSIDE_LOG")
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    init_logging_with(level)
}

/// Install the stderr logger at a fixed level. Only the first call installs
/// the logger; later calls just change the level. Returns the level in effect.
pub fn init_logging_with(level: LevelFilter) -> LevelFilter {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_only_changes_level() {
        assert_eq!(init_logging_with(LevelFilter::Warn), LevelFilter::Warn);
        assert_eq!(init_logging_with(LevelFilter::Debug), LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        log::debug!("logger accepts records after reinit");
    }
}
