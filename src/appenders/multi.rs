//! Fan-out of one rendered line to every configured appender

use super::{Appender, Line};
use crate::core::Result;
use parking_lot::Mutex;

/// Dispatches each line to its appenders in configuration order.
///
/// All appenders sit behind one lock, so a line is never interleaved with
/// another line at any destination. The first appender error stops the
/// dispatch for that line and is returned; appenders after the failing one do
/// not see the line.
pub struct MultiWriter {
    appenders: Mutex<Vec<Box<dyn Appender>>>,
}

impl MultiWriter {
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self {
            appenders: Mutex::new(appenders),
        }
    }

    pub fn write_line(&self, line: &Line<'_>) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.append(line)?;
        }
        Ok(())
    }

    /// Flush every appender, reporting the first failure after trying all.
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        let mut first_err = None;
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.appenders.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}
