//! Destination appenders
//!
//! Every destination accepts one fully rendered line at a time. The line comes
//! with the record's level and rendered source so destinations never need to
//! parse the text they receive.

pub mod channel;
pub mod console;
pub mod multi;
pub mod rotating_file;
pub mod style;
pub mod writer;

pub use channel::ChannelWriter;
pub use console::{ConsoleMode, ConsoleWriter};
pub use multi::MultiWriter;
pub use rotating_file::{RotatingFile, RotatingFileWriter, RotationSink, SharedRotationSink};
pub use style::{LevelStyle, StyleTable};
pub use writer::RawWriter;

use crate::core::{Level, Result};

/// One rendered record on its way to the destinations.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// Complete rendered output, including the trailing newline.
    pub bytes: &'a [u8],
    pub level: Level,
    /// Rendered `<file>:<line>` when source capture produced one.
    pub source: Option<&'a str>,
}

impl<'a> Line<'a> {
    pub fn new(bytes: &'a [u8], level: Level) -> Self {
        Self {
            bytes,
            level,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<&'a str>) -> Self {
        self.source = source;
        self
    }
}

/// A log destination.
pub trait Appender: Send {
    /// Write one line, returning the number of input bytes accepted.
    fn append(&mut self, line: &Line<'_>) -> Result<usize>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
