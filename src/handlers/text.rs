//! Ordered `key=value` text handler

use super::{ordered_attrs, rendered_source, Handler, HandlerOptions};
use crate::appenders::{Line, MultiWriter};
use crate::core::attr::Attr;
use crate::core::{timestamp, Level, Record, Result};
use std::fmt::Write as _;
use std::sync::Arc;

/// Renders records as space separated `key=value` pairs.
///
/// Values are written as-is, without quoting. The `level` and `msg` fields are
/// left out when empty.
///
/// ```text
/// time=2025-01-08T10:30:45.000Z level=INFO msg=started port=8080
/// ```
#[derive(Clone)]
pub struct TextHandler {
    sink: Arc<MultiWriter>,
    options: HandlerOptions,
    attrs: Vec<Attr>,
    groups: Vec<String>,
}

impl TextHandler {
    pub fn new(sink: Arc<MultiWriter>, options: HandlerOptions) -> Self {
        Self {
            sink,
            options,
            attrs: Vec::new(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> HandlerOptions {
        self.options
    }

    /// Group names recorded by [`Handler::with_group`], outermost first.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[must_use]
    pub fn grouped(&self, name: &str) -> Self {
        let mut derived = self.clone();
        derived.groups.push(name.to_string());
        derived
    }

    /// Render a record to its complete line, including the newline.
    #[must_use]
    pub fn render(&self, record: &Record) -> String {
        let source = rendered_source(&self.options, record);
        self.render_with_source(record, source.as_deref())
    }

    fn render_with_source(&self, record: &Record, source: Option<&str>) -> String {
        let time = timestamp::format_record_time(&record.time);
        let mut fields: Vec<(&str, String)> = vec![("time", time)];

        let level = record.level.label();
        if !level.is_empty() {
            fields.push(("level", level.to_string()));
        }
        if !record.message.is_empty() {
            fields.push(("msg", record.message.clone()));
        }
        if let Some(source) = source {
            fields.push(("source", source.to_string()));
        }

        let mut out = String::with_capacity(128);
        for (key, value) in fields {
            push_pair(&mut out, key, &value);
        }
        for (key, value) in ordered_attrs(&self.attrs, record) {
            push_pair(&mut out, key, value);
        }
        out.push('\n');
        out
    }
}

fn push_pair(out: &mut String, key: &str, value: impl std::fmt::Display) {
    if !out.is_empty() {
        out.push(' ');
    }
    // writing into a String cannot fail
    let _ = write!(out, "{}={}", key, value);
}

impl Handler for TextHandler {
    fn enabled(&self, level: Level) -> bool {
        level.is_enabled_for(self.options.level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let source = rendered_source(&self.options, record);
        let rendered = self.render_with_source(record, source.as_deref());
        let line = Line::new(rendered.as_bytes(), record.level).with_source(source.as_deref());
        self.sink.write_line(&line)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        derived.attrs.extend(attrs);
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.grouped(name))
    }
}
