//! Record handlers
//!
//! A handler renders one [`Record`] into a complete line and hands it to the
//! fan-out. Both built-in handlers share the field ordering implemented here:
//! the record's own fields first (`time`, `level`, `msg`, `source`), then the
//! remaining attributes deduplicated last-wins and sorted by key.

pub mod json;
pub mod text;

pub use json::JsonHandler;
pub use text::TextHandler;

use crate::core::attr::{is_reserved, Attr, Value};
use crate::core::{Level, Record, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Renders records and writes them to destinations.
///
/// Implementations must be safe to call from many threads at once.
pub trait Handler: Send + Sync {
    /// Whether records at `level` would be written.
    fn enabled(&self, level: Level) -> bool;

    /// Render and write one record.
    fn handle(&self, record: &Record) -> Result<()>;

    /// A handler that adds `attrs` to every record it renders.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// A handler that records the group name.
    ///
    /// The built-in handlers do not nest attributes under groups.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Settings shared by the built-in handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerOptions {
    /// Records below this level are not rendered
    pub level: Level,
    /// Emit the `source` field when the record has a call site
    pub add_source: bool,
}

impl HandlerOptions {
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            add_source: false,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }
}

/// Caller attributes in output order: reserved keys dropped, last value wins
/// for duplicate keys, sorted by key.
pub(crate) fn ordered_attrs<'a>(
    handler_attrs: &'a [Attr],
    record: &'a Record,
) -> BTreeMap<&'a str, &'a Value> {
    handler_attrs
        .iter()
        .chain(record.attrs.iter())
        .filter(|attr| !attr.is_empty() && !is_reserved(&attr.key))
        .map(|attr| (attr.key.as_str(), &attr.value))
        .collect()
}

/// Rendered `file:line` of the record, when source output is on.
pub(crate) fn rendered_source(options: &HandlerOptions, record: &Record) -> Option<String> {
    if !options.add_source {
        return None;
    }
    record.source.as_ref().map(ToString::to_string)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::appenders::{Appender, MultiWriter, RawWriter};
    use crate::core::{Level, Record};
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use std::sync::Arc;

    /// In-memory destination shared with the test body.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn buffered_sink() -> (Arc<MultiWriter>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let appender: Box<dyn Appender> = Box::new(RawWriter::named("buffer", buffer.clone()));
        (Arc::new(MultiWriter::new(vec![appender])), buffer)
    }

    /// Record at a fixed UTC instant.
    pub fn fixed_record(level: Level, message: &str) -> Record {
        let time = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .unwrap()
            .fixed_offset();
        Record::at(time, level, message)
    }
}
