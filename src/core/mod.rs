//! Core logger types: levels, attributes, records, options and the facade

pub mod attr;
pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod options;
pub mod record;
pub mod timestamp;

pub use attr::{normalize_attrs, Arg, Attr, Value, ATTR_ORDER, MISSING_VALUE, TRACE_KEY};
pub use error::{LoggerError, Result};
pub use level::{enabled, Level};
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use options::{Config, ExitHandler, Format, LoggerOption};
pub use record::{Record, Source};
