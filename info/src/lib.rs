//! Build metadata stamped onto every log record.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The VCS revision, if the build environment provided `SHAKER_REVISION`.
pub const REVISION: Option<&str> = option_env!("SHAKER_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("SHAKER_BUILD_TIMESTAMP");
