//! Logger configuration and the option functions that build it
//!
//! A [`Config`] starts from defaults and is changed only by [`LoggerOption`]s,
//! applied in order when a logger is constructed; later options override
//! earlier ones.

use super::level::Level;
use crate::appenders::{
    Appender, ChannelWriter, RawWriter, RotatingFile, RotatingFileWriter, RotationSink,
    SharedRotationSink,
};
use crate::handlers::Handler;
use crossbeam_channel::Sender;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Called with the exit code after a fatal record is written.
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// One configuration step applied while a logger is built.
pub type LoggerOption = Box<dyn FnOnce(&mut Config) + Send>;

/// Output format of the built-in handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Ordered `key=value` pairs
    #[default]
    Text,
    /// One JSON object per record, indented when `pretty`
    Json { pretty: bool },
}

/// Everything a logger is built from.
pub struct Config {
    pub(crate) level: Level,
    pub(crate) format: Format,
    pub(crate) colors: bool,
    pub(crate) add_source: bool,
    pub(crate) stack_traces: bool,
    pub(crate) console: bool,
    pub(crate) console_target: Option<Box<dyn Write + Send>>,
    pub(crate) appenders: Vec<Box<dyn Appender>>,
    pub(crate) files: Vec<SharedRotationSink>,
    pub(crate) custom_handler: Option<Arc<dyn Handler>>,
    pub(crate) exit_handler: Option<ExitHandler>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: Format::Text,
            colors: true,
            add_source: false,
            stack_traces: false,
            console: true,
            console_target: None,
            appenders: Vec::new(),
            files: Vec::new(),
            custom_handler: None,
            exit_handler: None,
        }
    }
}

impl Config {
    /// Defaults with `options` applied in order.
    pub fn from_options(options: impl IntoIterator<Item = LoggerOption>) -> Self {
        let mut config = Self::default();
        for option in options {
            option(&mut config);
        }
        config
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub fn colors(&self) -> bool {
        self.colors
    }

    #[must_use]
    pub fn add_source(&self) -> bool {
        self.add_source
    }

    #[must_use]
    pub fn stack_traces(&self) -> bool {
        self.stack_traces
    }

    #[must_use]
    pub fn console_enabled(&self) -> bool {
        self.console
    }

    /// Number of explicitly added destinations, not counting the console.
    #[must_use]
    pub fn destination_count(&self) -> usize {
        self.appenders.len()
    }

    #[must_use]
    pub fn has_custom_handler(&self) -> bool {
        self.custom_handler.is_some()
    }
}

/// Set the minimum level.
pub fn level(level: Level) -> LoggerOption {
    Box::new(move |config| config.level = level)
}

/// Lower the minimum level to trace.
pub fn enable_trace() -> LoggerOption {
    level(Level::TRACE)
}

/// Include the call site as the `source` field.
pub fn add_source() -> LoggerOption {
    Box::new(|config| config.add_source = true)
}

/// Attach a stack trace to fatal records.
pub fn enable_stack_traces() -> LoggerOption {
    Box::new(|config| config.stack_traces = true)
}

pub fn disable_colors() -> LoggerOption {
    Box::new(|config| config.colors = false)
}

/// Do not add the implicit console destination.
pub fn disable_console() -> LoggerOption {
    Box::new(|config| config.console = false)
}

/// Add a size-rotated file destination, closed by [`Logger::close`].
///
/// Zero for `max_size_mb` selects 100 MB; zero `max_backups` or
/// `max_age_days` keeps every backup.
///
/// [`Logger::close`]: crate::Logger::close
pub fn add_file_output(
    path: impl Into<PathBuf>,
    max_size_mb: u64,
    max_backups: usize,
    max_age_days: u64,
    compress: bool,
) -> LoggerOption {
    let file = RotatingFile::new(path, max_size_mb, max_backups, max_age_days, compress);
    add_rotation_sink(file)
}

/// Add a destination backed by any rotation sink, closed by `Logger::close`.
pub fn add_rotation_sink(sink: impl RotationSink + 'static) -> LoggerOption {
    Box::new(move |config| {
        let (writer, shared) = RotatingFileWriter::shared(sink);
        config.appenders.push(Box::new(writer));
        config.files.push(shared);
    })
}

/// Forward trimmed lines to a channel without blocking.
pub fn add_channel_output(sender: Sender<String>) -> LoggerOption {
    Box::new(move |config| config.appenders.push(Box::new(ChannelWriter::new(sender))))
}

/// Write lines unchanged to any writer.
pub fn add_writer(out: impl Write + Send + 'static) -> LoggerOption {
    Box::new(move |config| config.appenders.push(Box::new(RawWriter::new(out))))
}

/// Render records as JSON.
pub fn use_json(pretty: bool) -> LoggerOption {
    Box::new(move |config| config.format = Format::Json { pretty })
}

/// Replace the built-in handler.
///
/// The custom handler writes wherever it likes; destinations added through
/// options are still flushed and closed by the logger.
pub fn use_custom_handler(handler: Arc<dyn Handler>) -> LoggerOption {
    Box::new(move |config| config.custom_handler = Some(handler))
}

/// Send the implicit console destination to `out` instead of stdout.
pub fn console_output(out: impl Write + Send + 'static) -> LoggerOption {
    Box::new(move |config| config.console_target = Some(Box::new(out)))
}

/// Replace the process exit performed after a fatal record.
pub fn exit_handler(handler: impl Fn(i32) + Send + Sync + 'static) -> LoggerOption {
    Box::new(move |config| config.exit_handler = Some(Arc::new(handler)))
}
