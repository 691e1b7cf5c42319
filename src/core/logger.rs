//! Logger facade
//!
//! A [`Logger`] owns one configuration: a handler (text, JSON or custom), the
//! fan-out of destinations it writes to, and the rotation sinks it closes.
//! Logging never returns errors to the caller; `close` does.

use super::attr::{normalize_attrs, Arg, Attr};
use super::error::{LoggerError, Result};
use super::level::Level;
use super::options::{self, Config, ExitHandler, Format, LoggerOption};
use super::record::{Record, Source};
use crate::appenders::{Appender, ConsoleMode, ConsoleWriter, MultiWriter, SharedRotationSink};
use crate::handlers::{Handler, HandlerOptions, JsonHandler, TextHandler};
use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

/// Exit code passed to the exit hook after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

struct State {
    level: Level,
    handler: Arc<dyn Handler>,
    custom: bool,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    format: Format,
    add_source: bool,
    stack_traces: bool,
}

struct Core {
    state: RwLock<State>,
    settings: Settings,
    sink: Arc<MultiWriter>,
    files: Mutex<Vec<SharedRotationSink>>,
    exit: ExitHandler,
}

impl Drop for Core {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.sink.flush();
    }
}

#[derive(Clone)]
enum Scope {
    Attrs(Vec<Attr>),
    Group(String),
}

/// Leveled, structured logger
///
/// Cloning a logger, or deriving one with [`Logger::with`], shares the
/// destinations and level of the original.
///
/// # Examples
///
/// ```
/// use logo::{args, options, Level, Logger};
///
/// let logger = Logger::new(vec![
///     options::level(Level::DEBUG),
///     options::disable_console(),
///     options::add_writer(std::io::sink()),
/// ]);
/// logger.info("server started", args!["port", 8080]);
/// assert!(logger.is_level_enabled(Level::DEBUG));
/// ```
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    scope: Vec<Scope>,
}

fn build_handler(settings: Settings, sink: &Arc<MultiWriter>, level: Level) -> Arc<dyn Handler> {
    let options = HandlerOptions::new(level).with_source(settings.add_source);
    match settings.format {
        Format::Text => Arc::new(TextHandler::new(Arc::clone(sink), options)),
        Format::Json { pretty } => Arc::new(JsonHandler::new(Arc::clone(sink), options, pretty)),
    }
}

fn default_exit() -> ExitHandler {
    Arc::new(|code| std::process::exit(code))
}

impl Logger {
    /// Build a logger from options applied in order.
    pub fn new(options: impl IntoIterator<Item = LoggerOption>) -> Self {
        Self::from_config(Config::from_options(options))
    }

    pub fn from_config(config: Config) -> Self {
        let Config {
            level,
            format,
            colors,
            add_source,
            stack_traces,
            console,
            console_target,
            mut appenders,
            files,
            custom_handler,
            exit_handler,
        } = config;

        if console {
            let target: Box<dyn Write + Send> = match console_target {
                Some(target) => target,
                None => Box::new(std::io::stdout()),
            };
            let mode = match format {
                Format::Text => ConsoleMode::Styled { colors },
                Format::Json { .. } => ConsoleMode::Raw,
            };
            let console: Box<dyn Appender> = Box::new(ConsoleWriter::from_boxed(target, mode));
            appenders.push(console);
        }

        let settings = Settings {
            format,
            add_source,
            stack_traces,
        };
        let sink = Arc::new(MultiWriter::new(appenders));
        let (handler, custom) = match custom_handler {
            Some(handler) => (handler, true),
            None => (build_handler(settings, &sink, level), false),
        };

        Self {
            core: Arc::new(Core {
                state: RwLock::new(State {
                    level,
                    handler,
                    custom,
                }),
                settings,
                sink,
                files: Mutex::new(files),
                exit: exit_handler.unwrap_or_else(default_exit),
            }),
            scope: Vec::new(),
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, message: impl Into<String>, args: Vec<Arg>) {
        self.emit(Level::TRACE, message, || normalize_attrs(args), Emit::WITH_STACK);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl Into<String>, args: Vec<Arg>) {
        self.log(Level::DEBUG, message, args);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl Into<String>, args: Vec<Arg>) {
        self.log(Level::INFO, message, args);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl Into<String>, args: Vec<Arg>) {
        self.log(Level::WARN, message, args);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl Into<String>, args: Vec<Arg>) {
        self.log(Level::ERROR, message, args);
    }

    /// Log at fatal level regardless of the gate, flush, then run the exit
    /// hook with [`FATAL_EXIT_CODE`].
    ///
    /// With the default hook this terminates the process.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>, args: Vec<Arg>) {
        let emit = Emit {
            force: true,
            stack: self.core.settings.stack_traces,
        };
        self.emit(Level::FATAL, message, || normalize_attrs(args), emit);
        let _ = self.core.sink.flush();
        (self.core.exit)(FATAL_EXIT_CODE);
    }

    /// Log at any level, including unnamed intermediate levels.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>, args: Vec<Arg>) {
        self.emit(level, message, || normalize_attrs(args), Emit::PLAIN);
    }

    /// Log with attributes that are already built.
    #[track_caller]
    pub fn log_attrs(&self, level: Level, message: impl Into<String>, attrs: Vec<Attr>) {
        self.emit(level, message, || attrs, Emit::PLAIN);
    }

    #[track_caller]
    fn emit<F>(&self, level: Level, message: impl Into<String>, attrs: F, emit: Emit)
    where
        F: FnOnce() -> Vec<Attr>,
    {
        let handler = {
            let state = self.core.state.read();
            if !emit.force && !(level.is_enabled_for(state.level) && state.handler.enabled(level)) {
                return;
            }
            Arc::clone(&state.handler)
        };
        let handler = self.scoped(handler);

        let mut record = Record::new(level, message).with_attrs(attrs());
        if self.core.settings.add_source {
            record = record.with_source(Source::from(Location::caller()));
        }
        if emit.stack {
            record.capture_stack();
        }

        // a failing destination never becomes the caller's problem
        let _ = handler.handle(&record);
    }

    fn scoped(&self, handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
        self.scope.iter().fold(handler, |handler, scope| match scope {
            Scope::Attrs(attrs) => handler.with_attrs(attrs.clone()),
            Scope::Group(name) => handler.with_group(name),
        })
    }

    /// A logger that adds `args` to every record.
    #[must_use]
    pub fn with(&self, args: Vec<Arg>) -> Logger {
        let mut derived = self.clone();
        derived.scope.push(Scope::Attrs(normalize_attrs(args)));
        derived
    }

    /// A logger whose handler records the group `name`.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        let mut derived = self.clone();
        derived.scope.push(Scope::Group(name.into()));
        derived
    }

    #[must_use]
    pub fn is_level_enabled(&self, level: Level) -> bool {
        let state = self.core.state.read();
        level.is_enabled_for(state.level) && state.handler.enabled(level)
    }

    #[must_use]
    pub fn current_level(&self) -> Level {
        self.core.state.read().level
    }

    /// Change the minimum level, rebuilding the built-in handler.
    ///
    /// A custom handler is kept; the new level still gates records before
    /// they reach it.
    pub fn set_level(&self, level: Level) {
        let mut state = self.core.state.write();
        state.level = level;
        if !state.custom {
            state.handler = build_handler(self.core.settings, &self.core.sink, level);
        }
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.core.settings.format
    }

    pub fn flush(&self) -> Result<()> {
        self.core.sink.flush()
    }

    /// Close every rotation sink this logger owns.
    ///
    /// All sinks are attempted; the first failure is returned. Sinks are
    /// released afterwards, so a second call returns `Ok(())`.
    pub fn close(&self) -> Result<()> {
        // Best effort flush - close reports the errors that matter
        let _ = self.core.sink.flush();

        let files = std::mem::take(&mut *self.core.files.lock());
        let mut first_err = None;
        for file in files {
            let mut sink = file.lock();
            if let Err(e) = sink.close() {
                let name = sink.describe();
                first_err.get_or_insert(LoggerError::io_operation(
                    "closing log file",
                    format!("destination '{}': {}", name, e),
                    e,
                ));
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Copy)]
struct Emit {
    /// Skip the level gate
    force: bool,
    /// Attach a stack trace
    stack: bool,
}

impl Emit {
    const PLAIN: Emit = Emit {
        force: false,
        stack: false,
    };
    const WITH_STACK: Emit = Emit {
        force: false,
        stack: true,
    };
}

/// Builder for constructing Logger with a fluent API
///
/// Every method mirrors a function in [`options`](crate::core::options).
///
/// # Example
/// ```
/// use logo::{Level, Logger};
///
/// let logger = Logger::builder()
///     .level(Level::DEBUG)
///     .json(false)
///     .disable_console()
///     .writer(std::io::sink())
///     .build();
/// assert_eq!(logger.current_level(), Level::DEBUG);
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply any option
    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(self, level: Level) -> Self {
        self.option(options::level(level))
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_trace(self) -> Self {
        self.option(options::enable_trace())
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_source(self) -> Self {
        self.option(options::add_source())
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_stack_traces(self) -> Self {
        self.option(options::enable_stack_traces())
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_colors(self) -> Self {
        self.option(options::disable_colors())
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_console(self) -> Self {
        self.option(options::disable_console())
    }

    #[must_use = "builder methods return a new value"]
    pub fn file(
        self,
        path: impl Into<PathBuf>,
        max_size_mb: u64,
        max_backups: usize,
        max_age_days: u64,
        compress: bool,
    ) -> Self {
        self.option(options::add_file_output(
            path,
            max_size_mb,
            max_backups,
            max_age_days,
            compress,
        ))
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation_sink(self, sink: impl crate::appenders::RotationSink + 'static) -> Self {
        self.option(options::add_rotation_sink(sink))
    }

    #[must_use = "builder methods return a new value"]
    pub fn channel(self, sender: Sender<String>) -> Self {
        self.option(options::add_channel_output(sender))
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer(self, out: impl Write + Send + 'static) -> Self {
        self.option(options::add_writer(out))
    }

    #[must_use = "builder methods return a new value"]
    pub fn json(self, pretty: bool) -> Self {
        self.option(options::use_json(pretty))
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler(self, handler: Arc<dyn Handler>) -> Self {
        self.option(options::use_custom_handler(handler))
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_output(self, out: impl Write + Send + 'static) -> Self {
        self.option(options::console_output(out))
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(self, handler: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.option(options::exit_handler(handler))
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger::new(self.options)
    }
}
