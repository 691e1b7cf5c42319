//! Logging macros
//!
//! `args!` builds the positional argument list taken by every logging method.
//! The level macros forward a message and alternating keys and values. Below
//! the logger's minimum level the arguments are not evaluated.
//!
//! # Examples
//!
//! ```
//! use logo::{args, info, options, Logger};
//!
//! let logger = Logger::new(vec![options::disable_console()]);
//!
//! info!(logger, "Server started");
//! info!(logger, "Request handled", "status", 200, "path", "/health");
//! logger.warn("slow", args!["ms", 1500]);
//! ```

/// Build a `Vec<Arg>` from values convertible into [`Arg`](crate::Arg).
///
/// ```
/// use logo::{args, Arg, Attr};
///
/// let list = args!["user", "alice", Attr::new("retries", 3)];
/// assert_eq!(list.len(), 3);
/// assert!(matches!(list[0], Arg::Str(_)));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Log at an explicit level.
///
/// ```
/// # use logo::{options, Level, Logger};
/// # let logger = Logger::new(vec![options::disable_console()]);
/// use logo::log;
/// log!(logger, Level::WARN, "Simple message");
/// log!(logger, Level::new(6), "Between warn and error", "code", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match (&$logger, $level) {
            (logger, level) => {
                if logger.is_level_enabled(level) {
                    logger.log(level, $msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match &$logger {
            logger => {
                if logger.is_level_enabled($crate::Level::TRACE) {
                    logger.trace($msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match &$logger {
            logger => {
                if logger.is_level_enabled($crate::Level::DEBUG) {
                    logger.debug($msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match &$logger {
            logger => {
                if logger.is_level_enabled($crate::Level::INFO) {
                    logger.info($msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match &$logger {
            logger => {
                if logger.is_level_enabled($crate::Level::WARN) {
                    logger.warn($msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        match &$logger {
            logger => {
                if logger.is_level_enabled($crate::Level::ERROR) {
                    logger.error($msg, $crate::args![$($arg),*])
                }
            }
        }
    };
}

/// Log a fatal message and run the logger's exit hook.
///
/// ```no_run
/// # use logo::{options, Logger};
/// # let logger = Logger::new(vec![]);
/// use logo::fatal;
/// fatal!(logger, "Unrecoverable state", "component", "storage");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.fatal($msg, $crate::args![$($arg),*])
    };
}
