//! JSON handler: one object per record

use super::{ordered_attrs, rendered_source, Handler, HandlerOptions};
use crate::appenders::{Line, MultiWriter};
use crate::core::attr::{Attr, Value};
use crate::core::{timestamp, Level, Record, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Renders records as JSON objects, compact or indented.
///
/// `time`, `level` and `msg` are always present; `source` follows when
/// captured, then the remaining attributes sorted by key. Every object ends
/// with a newline.
#[derive(Clone)]
pub struct JsonHandler {
    sink: Arc<MultiWriter>,
    options: HandlerOptions,
    pretty: bool,
    attrs: Vec<Attr>,
    groups: Vec<String>,
}

/// Borrowed view of a record with the output key order built in.
struct JsonRecord<'a> {
    time: String,
    level: &'static str,
    msg: &'a str,
    source: Option<&'a str>,
    attrs: BTreeMap<&'a str, &'a Value>,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 3 + usize::from(self.source.is_some()) + self.attrs.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("time", &self.time)?;
        map.serialize_entry("level", self.level)?;
        map.serialize_entry("msg", self.msg)?;
        if let Some(source) = self.source {
            map.serialize_entry("source", source)?;
        }
        for (key, value) in &self.attrs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl JsonHandler {
    pub fn new(sink: Arc<MultiWriter>, options: HandlerOptions, pretty: bool) -> Self {
        Self {
            sink,
            options,
            pretty,
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

    /// Render a record to its complete output, including the newline.
    pub fn render(&self, record: &Record) -> Result<Vec<u8>> {
        let source = rendered_source(&self.options, record);
        self.render_with_source(record, source.as_deref())
    }

    fn render_with_source(&self, record: &Record, source: Option<&str>) -> Result<Vec<u8>> {
        let view = JsonRecord {
            time: timestamp::format_record_time(&record.time),
            level: record.level.label(),
            msg: &record.message,
            source,
            attrs: ordered_attrs(&self.attrs, record),
        };

        let mut out = Vec::with_capacity(256);
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, &view)?;
        } else {
            serde_json::to_writer(&mut out, &view)?;
        }
        out.push(b'\n');
        Ok(out)
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, level: Level) -> bool {
        level.is_enabled_for(self.options.level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let source = rendered_source(&self.options, record);
        let rendered = self.render_with_source(record, source.as_deref())?;
        let line = Line::new(&rendered, record.level).with_source(source.as_deref());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Source;
    use crate::handlers::test_support::{buffered_sink, fixed_record};
    use serde_json::json;

    fn keys_in_order(line: &str) -> Vec<String> {
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(line).unwrap();
        // serde_json::Map is sorted unless preserve_order is on, so read the
        // raw text positions instead
        let mut keys: Vec<(usize, String)> = parsed
            .keys()
            .map(|k| (line.find(&format!("\"{}\":", k)).unwrap(), k.clone()))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, k)| k).collect()
    }

    #[test]
    fn test_json_compact_line() {
        let (sink, buffer) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), false);

        let record = fixed_record(Level::INFO, "hello")
            .with_attrs([Attr::new("user", "alice"), Attr::new("n", 3)]);
        handler.handle(&record).unwrap();

        assert_eq!(
            buffer.text(),
            "{\"time\":\"2025-01-08T10:30:45.000Z\",\"level\":\"INFO\",\"msg\":\"hello\",\"n\":3,\"user\":\"alice\"}\n"
        );
    }

    #[test]
    fn test_json_key_order_with_source() {
        let (sink, _) = buffered_sink();
        let options = HandlerOptions::new(Level::INFO).with_source(true);
        let handler = JsonHandler::new(sink, options, false);

        let record = fixed_record(Level::ERROR, "boom")
            .with_source(Source::new("src/lib.rs", 3))
            .with_attrs([Attr::new("zeta", 1), Attr::new("alpha", 2)]);
        let rendered = String::from_utf8(handler.render(&record).unwrap()).unwrap();

        assert_eq!(
            keys_in_order(rendered.trim_end()),
            vec!["time", "level", "msg", "source", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_json_pretty_uses_two_spaces() {
        let (sink, buffer) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), true);

        handler.handle(&fixed_record(Level::WARN, "careful")).unwrap();
        let out = buffer.text();

        assert!(out.starts_with("{\n  \"time\": "));
        assert!(out.ends_with("}\n"));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["level"], "WARN");
    }

    #[test]
    fn test_json_keeps_native_types() {
        let (sink, _) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), false);

        let record = fixed_record(Level::INFO, "typed").with_attrs([
            Attr::new("count", 42),
            Attr::new("ratio", 0.5),
            Attr::new("ok", true),
            Attr::new("meta", json!({"region": "eu", "ids": [1, 2]})),
        ]);
        let rendered = handler.render(&record).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&rendered).unwrap();

        assert_eq!(parsed["count"], 42);
        assert_eq!(parsed["ratio"], 0.5);
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["meta"]["ids"][1], 2);
    }

    #[test]
    fn test_json_always_has_level_and_msg() {
        let (sink, _) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::TRACE), false);

        let rendered = handler.render(&fixed_record(Level::new(2), "")).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&rendered).unwrap();
        assert_eq!(parsed["level"], "");
        assert_eq!(parsed["msg"], "");
    }

    #[test]
    fn test_json_reserved_attrs_cannot_override_fields() {
        let (sink, _) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), false);

        let record = fixed_record(Level::INFO, "real")
            .with_attrs([Attr::new("msg", "fake"), Attr::new("level", "DEBUG")]);
        let parsed: serde_json::Value =
            serde_json::from_slice(&handler.render(&record).unwrap()).unwrap();

        assert_eq!(parsed["msg"], "real");
        assert_eq!(parsed["level"], "INFO");
    }

    #[test]
    fn test_json_group_recorded_without_nesting() {
        let (sink, _) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), false);
        let grouped = handler.grouped("request");
        assert_eq!(grouped.groups(), ["request"]);

        let record = fixed_record(Level::INFO, "m").with_attrs([Attr::new("id", 7)]);
        let parsed: serde_json::Value =
            serde_json::from_slice(&grouped.render(&record).unwrap()).unwrap();
        assert_eq!(parsed["id"], 7);
        assert!(parsed.get("request").is_none());
    }

    #[test]
    fn test_json_with_attrs_are_rendered() {
        let (sink, buffer) = buffered_sink();
        let handler = JsonHandler::new(sink, HandlerOptions::new(Level::INFO), false);
        let derived = handler.with_attrs(vec![Attr::new("request_id", "r-1")]);

        derived.handle(&fixed_record(Level::INFO, "m")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&buffer.text()).unwrap();
        assert_eq!(parsed["request_id"], "r-1");
    }
}
