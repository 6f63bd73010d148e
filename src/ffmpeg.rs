//! FFmpeg's own console logging.
//!
//! FFmpeg prints warnings and errors to stderr independently of the Rust
//! [`log`](https://crates.io/crates/log) facade. Seeking through damaged or
//! oddly muxed files makes it chatty, so callers can tune it here without
//! depending on `ffmpeg-next` themselves.
//!
//! ```no_run
//! use stillframe::FfmpegLogLevel;
//!
//! stillframe::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use ffmpeg_next::util::log::Level;

/// FFmpeg log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    Quiet,
    Panic,
    Fatal,
    Error,
    /// FFmpeg's default.
    Warning,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl FfmpegLogLevel {
    pub const ALL: [FfmpegLogLevel; 9] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Panic,
        FfmpegLogLevel::Fatal,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Verbose,
        FfmpegLogLevel::Debug,
        FfmpegLogLevel::Trace,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Panic => "panic",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Verbose => "verbose",
            FfmpegLogLevel::Debug => "debug",
            FfmpegLogLevel::Trace => "trace",
        }
    }

    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }

    fn from_ffmpeg_level(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    /// Case-insensitive; `warn` is accepted for `warning`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        if value == "warn" {
            return Ok(FfmpegLogLevel::Warning);
        }
        FfmpegLogLevel::ALL
            .into_iter()
            .find(|level| level.name() == value)
            .ok_or_else(|| format!("unknown FFmpeg log level '{value}'"))
    }
}

/// Set FFmpeg's log level. Does not affect `log` crate output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// FFmpeg's current log level, or `None` if it does not map to a variant.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from_ffmpeg_level)
}
