//! Logging support.

use crate::consts::DEFAULT_LOG_LEVEL;
use flexi_logger::{style, DeferredNow, Logger, LoggerHandle, Record};
use libc::{isatty, STDERR_FILENO};
use std::{io::Write, sync::OnceLock};

/// Initializes the global logger for the `log` logging facade. The level is
/// taken from `RUST_LOG`, falling back to [`DEFAULT_LOG_LEVEL`]. Calling it
/// more than once has no effect.
///
/// # Panics
///
/// If logger fails to initialize
pub fn init() {
    static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();
    LOGGER.get_or_init(|| {
        Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
            .expect("failed to initialize logger")
            .format(format)
            .set_palette("124;3;4;146;7".into())
            .start()
            .expect("failed to initialize the logger")
    });
}

fn format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record<'_>,
) -> Result<(), std::io::Error> {
    let level = record.level();
    let line = format!(
        "{: <5} [{}:{}] {}",
        level,
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        &record.args()
    );
    // Colors and timestamps only for interactive sessions.
    if unsafe { isatty(STDERR_FILENO) } != 0 {
        write!(w, "[{}] {}", now.now().format("%H:%M:%S%.3f"), style(level).paint(line))
    } else {
        write!(w, "{line}")
    }
}
