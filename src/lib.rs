//! # logo
//!
//! A structured logging facade. Each call produces one record that is rendered
//! once, as ordered `key=value` text or JSON, and written to every configured
//! destination.
//!
//! ## Features
//!
//! - **Levels**: six named severities on a signed scale, plus any value in between
//! - **Ordered fields**: `time`, `level`, `msg`, `source`, then attributes by key
//! - **Destinations**: styled console, rotating files, channels and raw writers
//! - **Thread Safe**: lines never interleave at a destination
//!
//! ```
//! use logo::{args, options, Level, Logger};
//!
//! let logger = Logger::new(vec![
//!     options::level(Level::DEBUG),
//!     options::disable_colors(),
//!     options::use_json(false),
//! ]);
//! logger.info("service ready", args!["port", 8080, "tls", true]);
//! logger.close().unwrap();
//! ```

pub mod appenders;
pub mod core;
pub mod handlers;
pub mod macros;

pub use crate::core::{global, options};

pub mod prelude {
    pub use crate::appenders::{
        Appender, ChannelWriter, ConsoleWriter, MultiWriter, RotatingFile, RotationSink,
    };
    pub use crate::core::{
        normalize_attrs, options, Arg, Attr, Format, Level, Logger, LoggerBuilder, LoggerError,
        LoggerOption, Record, Result, Source, Value,
    };
    pub use crate::handlers::{Handler, JsonHandler, TextHandler};
}

pub use crate::appenders::{Appender, RotatingFile, RotationSink};
pub use crate::core::{
    enabled, normalize_attrs, Arg, Attr, Config, Format, Level, Logger, LoggerBuilder,
    LoggerError, LoggerOption, Record, Result, Source, Value, ATTR_ORDER, FATAL_EXIT_CODE,
    MISSING_VALUE,
};
pub use crate::handlers::{Handler, HandlerOptions, JsonHandler, TextHandler};
