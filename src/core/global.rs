//! Process-wide default logger
//!
//! The default is only a pointer to a [`Logger`]; replacing it does not close
//! the previous one.

use super::error::Result;
use super::logger::Logger;
use super::options::LoggerOption;
use parking_lot::RwLock;
use std::sync::Arc;

static DEFAULT: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

/// Build a logger from `options` and make it the default.
pub fn init(options: impl IntoIterator<Item = LoggerOption>) -> Arc<Logger> {
    let logger = Arc::new(Logger::new(options));
    set_default(Arc::clone(&logger));
    logger
}

pub fn set_default(logger: Arc<Logger>) {
    *DEFAULT.write() = Some(logger);
}

/// The default logger, built with default options on first use.
pub fn default_logger() -> Arc<Logger> {
    if let Some(logger) = DEFAULT.read().as_ref() {
        return Arc::clone(logger);
    }
    let mut slot = DEFAULT.write();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(Logger::default())))
}

/// Close the default logger's files, if a default exists.
pub fn close() -> Result<()> {
    let logger = DEFAULT.read().clone();
    match logger {
        Some(logger) => logger.close(),
        None => Ok(()),
    }
}
