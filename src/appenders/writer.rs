//! Raw appender over any `io::Write`

use super::{Appender, Line};
use crate::core::{LoggerError, Result};
use std::io::Write;

/// Writes every line unchanged to the wrapped writer.
pub struct RawWriter {
    out: Box<dyn Write + Send>,
    name: String,
}

impl RawWriter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self::named("writer", out)
    }

    pub fn named(name: impl Into<String>, out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            name: name.into(),
        }
    }
}

impl Appender for RawWriter {
    fn append(&mut self, line: &Line<'_>) -> Result<usize> {
        self.out.write_all(line.bytes).map_err(|e| {
            LoggerError::io_operation("writing log line", format!("destination '{}'", self.name), e)
        })?;
        Ok(line.bytes.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
