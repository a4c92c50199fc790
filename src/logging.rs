//! RT-safe logging for the capture path.
//!
//! The decode thread sits between a GPIO ISR and millisecond-scale pulse
//! timing; it must never call a blocking logger. Instead it formats into
//! a stack buffer and pushes a fixed-size record onto a lock-free ring.
//! A background drain forwards records to the `log` facade at its leisure.
//!
//! # Rules
//!
//! - The capture path uses only the `rt_*!` macros here.
//! - `log::info!` and friends are for background contexts only.
//! - Records may be dropped if the ring is full; drops are counted.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::LOG_RING_SIZE;
use crate::ring::SpscRing;

/// Maximum message length per record; longer messages are truncated.
pub const MAX_MSG_LEN: usize = 96;

/// Log severity, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// One formatted log record, fixed size so it can ride the ring.
#[derive(Clone, Copy)]
pub struct LogRecord {
    /// Capture-path timestamp in microseconds.
    pub timestamp_us: i64,
    pub level: LogLevel,
    len: u8,
    msg: [u8; MAX_MSG_LEN],
}

impl LogRecord {
    /// Build a record, truncating the message to [`MAX_MSG_LEN`].
    pub fn new(timestamp_us: i64, level: LogLevel, msg: &[u8]) -> Self {
        let len = msg.len().min(MAX_MSG_LEN);
        let mut buf = [0u8; MAX_MSG_LEN];
        buf[..len].copy_from_slice(&msg[..len]);
        Self {
            timestamp_us,
            level,
            len: len as u8,
            msg: buf,
        }
    }

    /// Message text (lossy if the producer formatted invalid UTF-8).
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

/// Ring carrying records from the capture path to the log drain.
pub type LogRing = SpscRing<LogRecord, LOG_RING_SIZE>;

/// Runtime minimum-severity filter for the capture path.
///
/// Records less severe than the filter are discarded before formatting,
/// so a quiet filter costs the capture path almost nothing.
pub struct LogFilter(AtomicU8);

impl LogFilter {
    pub const fn new(level: LogLevel) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.0.store(level as u8, Ordering::Relaxed);
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level()
    }
}

/// Format into a fixed buffer, truncating on overflow. Returns bytes written.
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct Cursor<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for Cursor<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let take = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
            self.pos += take;
            Ok(())
        }
    }

    let mut cursor = Cursor { buf, pos: 0 };
    let _ = core::fmt::write(&mut cursor, args);
    cursor.pos
}

/// Forward one record into the `log` facade (drain context).
pub fn forward_to_log(record: &LogRecord) {
    let level: log::Level = record.level.into();
    log::log!(
        level,
        "[{:10}us] {}",
        record.timestamp_us,
        record.message()
    );
}

/// Capture-path log macro: format into a stack buffer, push, never block.
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $ring:expr, $filter:expr, $timestamp:expr, $($arg:tt)*) => {{
        if $filter.enabled($level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $ring.push($crate::logging::LogRecord::new($timestamp, $level, &buf[..len]));
        }
    }};
}

/// Capture-path error log.
#[macro_export]
macro_rules! rt_error {
    ($ring:expr, $filter:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $ring, $filter, $timestamp, $($arg)*)
    };
}

/// Capture-path warning log.
#[macro_export]
macro_rules! rt_warn {
    ($ring:expr, $filter:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $ring, $filter, $timestamp, $($arg)*)
    };
}

/// Capture-path info log.
#[macro_export]
macro_rules! rt_info {
    ($ring:expr, $filter:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $ring, $filter, $timestamp, $($arg)*)
    };
}

/// Capture-path debug log.
#[macro_export]
macro_rules! rt_debug {
    ($ring:expr, $filter:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $ring, $filter, $timestamp, $($arg)*)
    };
}
