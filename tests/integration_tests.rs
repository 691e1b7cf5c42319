//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Level gating and the derived-logger surface
//! - Text and JSON rendering through real destinations
//! - Fan-out to several destinations and the channel destination
//! - Rotating file output and close semantics
//! - Thread safety of concurrent logging

use crossbeam_channel::bounded;
use logo::appenders::RotationSink;
use logo::{args, options, Level, Logger};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn buffered_logger(extra: Vec<logo::LoggerOption>) -> (Logger, Buffer) {
    let buffer = Buffer::default();
    let mut opts = vec![options::disable_console(), options::add_writer(buffer.clone())];
    opts.extend(extra);
    (Logger::new(opts), buffer)
}

#[test]
fn test_minimum_level_filters_lower_records() {
    let (logger, buffer) = buffered_logger(vec![options::level(Level::INFO)]);

    logger.debug("x", args![]);
    logger.info("y", args![]);

    let out = buffer.text();
    assert!(!out.contains("msg=x"));
    assert!(out.contains("msg=y"));
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn test_pretty_json_output() {
    let (logger, buffer) = buffered_logger(vec![options::use_json(true)]);

    logger.info("hello", args!["k", "v"]);

    let out = buffer.text();
    assert!(out.contains('\n'));
    assert!(out.contains("\n  \"level\": \"INFO\""));

    let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["msg"], "hello");
    assert_eq!(parsed["k"], "v");
    assert!(parsed["time"].is_string());
}

#[test]
fn test_two_destinations_receive_same_message() {
    let console = Buffer::default();
    let file = Buffer::default();
    let logger = Logger::new(vec![
        options::disable_colors(),
        options::console_output(console.clone()),
        options::add_writer(file.clone()),
    ]);

    logger.info("fan out works", args![]);

    assert!(console.text().contains("msg=fan out works"));
    assert!(file.text().contains("msg=fan out works"));
}

#[test]
fn test_json_round_trip_of_message_and_level() {
    let (logger, buffer) = buffered_logger(vec![options::use_json(false), options::enable_trace()]);
    let messages = ["plain", "with \"quotes\"", "tab\tand\nnewline", "ünïcödé", ""];

    for (i, msg) in messages.iter().enumerate() {
        let level = Level::NAMED[i % 5];
        logger.log(level, *msg, args![]);
    }

    let out = buffer.text();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), messages.len());
    for (i, line) in lines.iter().enumerate() {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["msg"], messages[i]);
        assert_eq!(parsed["level"], Level::NAMED[i % 5].label());
    }
}

#[test]
fn test_text_attribute_order_is_deterministic() {
    let (logger, buffer) = buffered_logger(vec![options::add_source()]);

    for _ in 0..3 {
        logger.info("ordered", args!["zulu", 1, "alpha", 2, "mike", 3]);
    }

    let out = buffer.text();
    let lines: Vec<&str> = out.lines().collect();
    for line in &lines {
        let keys: Vec<&str> = line
            .split(' ')
            .filter_map(|pair| pair.split_once('=').map(|(k, _)| k))
            .collect();
        assert_eq!(keys, vec!["time", "level", "msg", "source", "alpha", "mike", "zulu"]);
        assert!(line.contains("source=tests/integration_tests.rs:"));
    }
}

#[test]
fn test_malformed_arguments_are_tolerated() {
    let (logger, buffer) = buffered_logger(vec![]);

    logger.info("odd", args![42, "skipped", "key", "value", "dangling"]);

    let out = buffer.text();
    assert!(out.contains("key=value"));
    assert!(out.contains("dangling=(MISSING)"));
    assert!(!out.contains("skipped"));
}

#[test]
fn test_channel_destination() {
    let (tx, rx) = bounded(8);
    let logger = Logger::new(vec![options::disable_console(), options::add_channel_output(tx)]);

    logger.warn("to channel", args!["n", 1]);

    let line = rx.try_recv().expect("line delivered");
    assert!(line.contains("level=WARN msg=to channel n=1"));
    assert!(!line.ends_with('\n'));
}

#[test]
fn test_full_channel_never_blocks_logging() {
    let (tx, rx) = bounded(1);
    let logger = Logger::new(vec![options::disable_console(), options::add_channel_output(tx)]);

    for i in 0..100 {
        logger.info("flood", args!["i", i]);
    }

    assert!(rx.try_recv().unwrap().contains("i=0"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_failing_destination_stops_later_ones() {
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("unavailable"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let before = Buffer::default();
    let after = Buffer::default();
    let logger = Logger::new(vec![
        options::disable_console(),
        options::add_writer(before.clone()),
        options::add_writer(Broken),
        options::add_writer(after.clone()),
    ]);

    logger.error("partial", args![]);

    assert!(before.text().contains("msg=partial"));
    assert!(after.text().is_empty());
}

#[test]
fn test_file_output_and_close() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("logs").join("app.log");

    let logger = Logger::new(vec![
        options::disable_console(),
        options::add_file_output(&log_file, 1, 3, 7, false),
    ]);

    logger.info("persisted", args!["user", "alice"]);
    logger.error("also persisted", args![]);
    logger.close().expect("Failed to close");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("level=INFO msg=persisted user=alice"));
    assert!(lines[1].contains("level=ERROR msg=also persisted"));

    // second close is a no-op, logging after close reopens the file
    assert!(logger.close().is_ok());
    logger.info("after close", args![]);
    logger.flush().unwrap();
    assert!(fs::read_to_string(&log_file).unwrap().contains("after close"));
}

#[test]
fn test_close_reports_first_failure_after_trying_all() {
    struct Sink {
        name: &'static str,
        fail: bool,
        closes: Arc<AtomicUsize>,
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl RotationSink for Sink {
        fn close(&mut self) -> io::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(io::Error::other(format!("{} failed", self.name)));
            }
            Ok(())
        }
    }

    let closes = Arc::new(AtomicUsize::new(0));
    let logger = Logger::new(vec![
        options::disable_console(),
        options::add_rotation_sink(Sink {
            name: "one",
            fail: false,
            closes: Arc::clone(&closes),
        }),
        options::add_rotation_sink(Sink {
            name: "two",
            fail: true,
            closes: Arc::clone(&closes),
        }),
        options::add_rotation_sink(Sink {
            name: "three",
            fail: true,
            closes: Arc::clone(&closes),
        }),
    ]);

    let err = logger.close().unwrap_err();
    assert!(err.to_string().contains("two failed"));
    assert_eq!(closes.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_logging_keeps_lines_whole() {
    let (logger, buffer) = buffered_logger(vec![]);
    let logger = Arc::new(logger);
    let mut handles = vec![];

    for t in 0..8 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                logger.info("concurrent", args!["thread", t, "i", i]);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let out = buffer.text();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 8 * 200);
    for line in lines {
        assert!(line.contains("level=INFO msg=concurrent i="));
        assert!(line.contains(" thread="));
    }
}

#[test]
fn test_set_level_at_runtime() {
    let (logger, buffer) = buffered_logger(vec![options::level(Level::ERROR)]);

    assert!(!logger.is_level_enabled(Level::WARN));
    logger.warn("dropped", args![]);

    logger.set_level(Level::WARN);
    assert!(logger.is_level_enabled(Level::WARN));
    logger.warn("kept", args![]);

    let out = buffer.text();
    assert!(!out.contains("dropped"));
    assert!(out.contains("kept"));
}

#[test]
fn test_set_level_while_logging_keeps_lines_whole() {
    let (logger, buffer) = buffered_logger(vec![options::level(Level::INFO)]);
    let logger = Arc::new(logger);
    let mut handles = vec![];

    for t in 0..6 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..300 {
                logger.debug("never", args!["thread", t, "i", i]);
                logger.info("sometimes", args!["thread", t, "i", i]);
                logger.warn("always", args!["thread", t, "i", i]);
            }
        }));
    }

    for flip in 0..500 {
        let level = if flip % 2 == 0 { Level::WARN } else { Level::INFO };
        logger.set_level(level);
        thread::yield_now();
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let out = buffer.text();
    let lines: Vec<&str> = out.lines().collect();
    let warn_lines = lines
        .iter()
        .filter(|l| l.contains("level=WARN msg=always i="))
        .count();
    assert_eq!(warn_lines, 6 * 300);

    for line in lines {
        assert!(line.starts_with("time="));
        assert!(line.contains(" thread="));
        assert!(
            line.contains("level=WARN msg=always i=")
                || line.contains("level=INFO msg=sometimes i="),
            "unexpected line: {}",
            line
        );
    }
}

#[test]
fn test_intermediate_level_renders_without_label() {
    let (logger, buffer) = buffered_logger(vec![options::use_json(false)]);

    logger.log(Level::new(6), "between warn and error", args![]);

    let parsed: serde_json::Value = serde_json::from_str(buffer.text().trim()).unwrap();
    assert_eq!(parsed["level"], "");
    assert_eq!(parsed["msg"], "between warn and error");
}

#[test]
fn test_builder_matches_options() {
    let buffer = Buffer::default();
    let logger = Logger::builder()
        .level(Level::DEBUG)
        .json(false)
        .disable_console()
        .writer(buffer.clone())
        .build();

    let derived = logger.with(args!["component", "db"]);
    derived.debug("connected", args![]);

    let parsed: serde_json::Value = serde_json::from_str(buffer.text().trim()).unwrap();
    assert_eq!(parsed["level"], "DEBUG");
    assert_eq!(parsed["component"], "db");
}
