// Stderr log output.
//
// The engine logs through the `log` facade; the subscriber's `tracing-log`
// bridge forwards those records. The filter comes from `-v` (repeatable) or,
// when no `-v` is given, the SHOST_LOG variable (EnvFilter directives).

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "SHOST_LOG";

/// Build the filter for a verbosity count and an optional SHOST_LOG value.
pub fn filter_for(verbose: u8, env: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => {
            return EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .parse_lossy(env.unwrap_or_default());
        }
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy("")
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let _ = fmt()
        .with_env_filter(filter_for(verbose, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_level(verbose: u8, env: Option<&str>) -> Option<LevelFilter> {
        filter_for(verbose, env).max_level_hint()
    }

    #[test]
    fn default_is_warn() {
        assert_eq!(max_level(0, None), Some(LevelFilter::WARN));
        assert_eq!(max_level(0, Some("")), Some(LevelFilter::WARN));
    }

    #[test]
    fn env_applies_without_flags() {
        assert_eq!(max_level(0, Some("debug")), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(0, Some("off")), Some(LevelFilter::OFF));
        assert_eq!(max_level(0, Some("error,lua=info")), Some(LevelFilter::INFO));
    }

    #[test]
    fn flags_override_env() {
        assert_eq!(max_level(1, Some("error")), Some(LevelFilter::INFO));
        assert_eq!(max_level(2, None), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(5, None), Some(LevelFilter::TRACE));
    }
}
