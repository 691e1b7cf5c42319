//! Log level definitions
//!
//! Levels live on a signed integer scale so callers may log at intermediate
//! severities. Six points on the scale are named; everything else renders with
//! an empty label.

use std::fmt;
use std::str::FromStr;

/// Distance between `DEBUG` and `TRACE`.
const TRACE_OFFSET: i32 = 5;
/// Distance between `ERROR` and `FATAL`.
const FATAL_OFFSET: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const TRACE: Level = Level(Self::DEBUG.0 - TRACE_OFFSET);
    pub const FATAL: Level = Level(Self::ERROR.0 + FATAL_OFFSET);

    /// All named levels, lowest first.
    pub const NAMED: [Level; 6] = [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
        Level::FATAL,
    ];

    /// Create a level from a raw severity value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Label used by every handler, or `""` for an unnamed severity.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Level::TRACE => "TRACE",
            Level::DEBUG => "DEBUG",
            Level::INFO => "INFO",
            Level::WARN => "WARN",
            Level::ERROR => "ERROR",
            Level::FATAL => "FATAL",
            _ => "",
        }
    }

    /// True if a record at `self` passes a gate set at `minimum`.
    #[inline]
    #[must_use]
    pub fn is_enabled_for(self, minimum: Level) -> bool {
        enabled(self, minimum)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

/// The single gating predicate shared by handlers and the facade.
#[inline]
#[must_use]
pub fn enabled(level: Level, minimum: Level) -> bool {
    level >= minimum
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::TRACE),
            "DEBUG" => Ok(Level::DEBUG),
            "INFO" => Ok(Level::INFO),
            "WARN" | "WARNING" => Ok(Level::WARN),
            "ERROR" => Ok(Level::ERROR),
            "FATAL" => Ok(Level::FATAL),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}
