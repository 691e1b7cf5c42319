//! Per-level console styles

use colored::{Color, ColoredString, Colorize};
use std::collections::HashMap;

/// Color and weight applied to one piece of console output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyle {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl LevelStyle {
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let mut painted = text.color(self.color);
        if self.bold {
            painted = painted.bold();
        }
        if self.italic {
            painted = painted.italic();
        }
        if self.underline {
            painted = painted.underline();
        }
        painted
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::TrueColor { r, g, b }
}

/// Style of the console clock.
pub const CLOCK_STYLE: LevelStyle = LevelStyle::new(rgb(0x62, 0x62, 0x62));
/// Style of the call-site annotation.
pub const SOURCE_STYLE: LevelStyle = LevelStyle::new(rgb(0x87, 0x5f, 0xff));
/// Style for lines whose level has no entry.
pub const DEFAULT_STYLE: LevelStyle = LevelStyle::new(Color::White).bold();

/// Level label to style lookup.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: HashMap<&'static str, LevelStyle>,
}

impl StyleTable {
    #[must_use]
    pub fn new() -> Self {
        let styles = HashMap::from([
            ("TRACE", LevelStyle::new(rgb(0x8a, 0x8a, 0x8a)).italic()),
            ("DEBUG", LevelStyle::new(rgb(0x76, 0x76, 0x76)).bold()),
            ("INFO", LevelStyle::new(Color::BrightGreen).bold()),
            ("WARN", LevelStyle::new(rgb(0xff, 0xaf, 0x00)).bold()),
            ("ERROR", LevelStyle::new(rgb(0xff, 0x00, 0x00)).bold()),
            ("FATAL", LevelStyle::new(rgb(0xd7, 0x00, 0x00)).bold().underline()),
        ]);
        Self { styles }
    }

    /// Style for a level label, falling back to [`DEFAULT_STYLE`].
    #[must_use]
    pub fn lookup(&self, label: &str) -> LevelStyle {
        self.styles.get(label).copied().unwrap_or(DEFAULT_STYLE)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels_have_styles() {
        let table = StyleTable::new();
        for label in ["TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL"] {
            assert_ne!(table.lookup(label), DEFAULT_STYLE, "{label} should be styled");
        }
        assert!(table.lookup("FATAL").underline);
        assert!(table.lookup("TRACE").italic);
    }

    #[test]
    fn test_unknown_level_uses_default() {
        let table = StyleTable::new();
        assert_eq!(table.lookup(""), DEFAULT_STYLE);
        assert_eq!(table.lookup("NOTICE"), DEFAULT_STYLE);
    }

    #[test]
    fn test_paint_keeps_text() {
        let painted = DEFAULT_STYLE.paint("hello");
        assert!(painted.to_string().contains("hello"));
    }
}
