use std::fmt;
use std::str::FromStr;

/// Severity of a log call.
///
/// Ordered from least to most severe. The integer codes are the ones spoken
/// on the location-aware protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const TRACE_INT: i32 = 0;
    pub const DEBUG_INT: i32 = 10;
    pub const INFO_INT: i32 = 20;
    pub const WARN_INT: i32 = 30;
    pub const ERROR_INT: i32 = 40;

    /// All levels, least severe first.
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub fn as_int(self) -> i32 {
        match self {
            Level::Trace => Self::TRACE_INT,
            Level::Debug => Self::DEBUG_INT,
            Level::Info => Self::INFO_INT,
            Level::Warn => Self::WARN_INT,
            Level::Error => Self::ERROR_INT,
        }
    }

    pub fn from_int(value: i32) -> Option<Level> {
        match value {
            Self::TRACE_INT => Some(Level::Trace),
            Self::DEBUG_INT => Some(Level::Debug),
            Self::INFO_INT => Some(Level::Info),
            Self::WARN_INT => Some(Level::Warn),
            Self::ERROR_INT => Some(Level::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned when parsing a level name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level::Trace
        } else if level == tracing::Level::DEBUG {
            Level::Debug
        } else if level == tracing::Level::INFO {
            Level::Info
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else {
            Level::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_codes_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_int(level.as_int()), Some(level));
        }
        assert_eq!(Level::from_int(15), None);
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn parses_names() {
        assert_eq!("WARNING".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("info".parse::<Level>(), Ok(Level::Info));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn maps_to_tracing_levels() {
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }
}
