use std::str::FromStr;
use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Discard, Level, Logger};

/// Builds the root logger: JSON lines on stderr, written from a
/// background thread, dropping anything below `level`.
pub fn initialize_logger(level: Level) -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);

    #[cfg(feature = "env_logging")]
    let drain = slog_envlogger::new(drain).fuse();

    let drain = drain.filter_level(level).fuse();
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// A logger that swallows everything.
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}

/// Parses a level name such as `info` or `debug`.
pub fn parse_level(name: &str) -> Option<Level> {
    Level::from_str(&name.trim().to_lowercase()).ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_level, Level};

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), Some(Level::Debug));
        assert_eq!(parse_level(" INFO "), Some(Level::Info));
        assert_eq!(parse_level("warn"), Some(Level::Warning));
        assert_eq!(parse_level("loud"), None);
    }
}
