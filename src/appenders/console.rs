//! Console appender implementation

use super::style::{StyleTable, CLOCK_STYLE, SOURCE_STYLE};
use super::{Appender, Line};
use crate::core::timestamp;
use crate::core::Result;
use chrono::Local;
use std::borrow::Cow;
use std::io::Write;

/// How the console presents the lines it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    /// Clock prefix and per-level styling, used for text output.
    Styled { colors: bool },
    /// Bytes forwarded untouched, used for JSON output.
    Raw,
}

pub struct ConsoleWriter {
    out: Box<dyn Write + Send>,
    mode: ConsoleMode,
    styles: StyleTable,
}

impl ConsoleWriter {
    pub fn with_target(out: impl Write + Send + 'static, mode: ConsoleMode) -> Self {
        Self::from_boxed(Box::new(out), mode)
    }

    pub fn from_boxed(out: Box<dyn Write + Send>, mode: ConsoleMode) -> Self {
        Self {
            out,
            mode,
            styles: StyleTable::default(),
        }
    }

    /// Render one styled console line, without the trailing newline.
    fn format_styled(&self, line: &Line<'_>, colors: bool) -> String {
        let text = String::from_utf8_lossy(line.bytes);
        let body = text.trim();
        let clock = timestamp::console_clock(&Local::now());

        if !colors {
            return format!("[{}] {}", clock, body);
        }

        let style = self.styles.lookup(line.level.label());
        let clock = CLOCK_STYLE.paint(&clock);

        match line.source {
            Some(source) => {
                let body = strip_source(body, source);
                format!(
                    "[{}] {} {}",
                    clock,
                    SOURCE_STYLE.paint(source),
                    style.paint(&body)
                )
            }
            None => format!("[{}] {}", clock, style.paint(body)),
        }
    }
}

impl Appender for ConsoleWriter {
    fn append(&mut self, line: &Line<'_>) -> Result<usize> {
        match self.mode {
            ConsoleMode::Raw => self.out.write_all(line.bytes)?,
            ConsoleMode::Styled { colors } => {
                let output = self.format_styled(line, colors);
                writeln!(self.out, "{}", output)?;
            }
        }
        Ok(line.bytes.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Drop the `source=<source>` token from a rendered line; the console shows
/// the source as a separate annotation.
fn strip_source<'a>(body: &'a str, source: &str) -> Cow<'a, str> {
    let token = format!("source={}", source);
    let Some(start) = body.find(&token) else {
        return Cow::Borrowed(body);
    };

    let head = body[..start].trim_end();
    let tail = body[start + token.len()..].trim_start();
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => Cow::Owned(tail.to_string()),
        (_, true) => Cow::Owned(head.to_string()),
        _ => Cow::Owned(format!("{} {}", head, tail)),
    }
}
