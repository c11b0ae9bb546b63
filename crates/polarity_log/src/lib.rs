//! `polarity_log`:
//! logger bootstrap shared by binaries.
//!
//! Library crates only use the `log` facade; binaries call [`init_logger`]
//! once at startup.

use std::fmt;
use std::str::FromStr;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable that overrides the configured level.
pub const C_ENV_LOG_FILTER: &str = "RUST_LOG";

/// Verbosity levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumLogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl EnumLogLevel {
    /// Matching `log` filter.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl fmt::Display for EnumLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(c_name)
    }
}

impl FromStr for EnumLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("Unknown log level: {other:?}")),
        }
    }
}

/// Install the global logger at `level`; `RUST_LOG` wins when set.
///
/// Calling it again is a no-op.
pub fn init_logger(level: EnumLogLevel) {
    let env = Env::default().filter_or(C_ENV_LOG_FILTER, level.to_string());
    let _ = Builder::from_env(env).format_timestamp_secs().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_round_trips_through_text() {
        for level in [
            EnumLogLevel::Off,
            EnumLogLevel::Error,
            EnumLogLevel::Warn,
            EnumLogLevel::Info,
            EnumLogLevel::Debug,
            EnumLogLevel::Trace,
        ] {
            assert_eq!(level.to_string().parse::<EnumLogLevel>(), Ok(level));
        }
        assert_eq!("WARNING".parse::<EnumLogLevel>(), Ok(EnumLogLevel::Warn));
        assert!("loud".parse::<EnumLogLevel>().is_err());
    }

    #[test]
    fn test_init_logger_twice_is_harmless() {
        init_logger(EnumLogLevel::Debug);
        init_logger(EnumLogLevel::Info);
        assert_eq!(EnumLogLevel::Info.to_level_filter(), LevelFilter::Info);
    }
}
