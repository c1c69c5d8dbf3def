use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info,
    Warn,
    Error,
    /// Exits the process after writing.
    Fatal,
    /// Panics with the message after writing.
    Panic,
    /// Silences everything.
    Disabled,
}

impl Level {
    /// Value of the `l` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
            Self::Disabled => "disabled",
        }
    }
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warn,
            3 => Self::Error,
            4 => Self::Fatal,
            5 => Self::Panic,
            _ => Self::Disabled,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warn,
            log::Level::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseLevelError {
    level: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid log level: {:?}", self.level)
    }
}

impl std::error::Error for ParseLevelError {}

/// Accepts the `l` field values, ignoring case.
impl FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Level, ParseLevelError> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            "disabled" => Ok(Level::Disabled),
            _ => Err(ParseLevelError {
                level: s.to_string(),
            }),
        }
    }
}

static GLOBAL_LEVEL: AtomicU8 = AtomicU8::new(Level::Debug as u8);

/// Set the minimum level for loggers without their own level. `Disabled`
/// silences every logger.
///
/// Loggers already emitting on other threads may observe the change late.
pub fn set_global_level(level: Level) {
    GLOBAL_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn global_level() -> Level {
    Level::from_u8(GLOBAL_LEVEL.load(Ordering::Relaxed))
}
