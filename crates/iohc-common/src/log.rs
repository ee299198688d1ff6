// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Logging infrastructure for the iohc protocol engine
//!
//! A lightweight no_std ring buffer the controller writes into; hosts drain
//! it over whatever channel they have (serial console, defmt, syslog).
//!
//! Key material, MACs and challenges must never be logged.

use crate::time::Millis;
use core::fmt::{self, Write};
use heapless::String;

/// Maximum log message length
pub const MAX_LOG_MESSAGE_LEN: usize = 96;

/// Log buffer capacity (number of entries)
pub const LOG_BUFFER_SIZE: usize = 16;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Errors that require attention
    Error = 0,
    /// Warnings about potential issues
    Warn = 1,
    /// Informational messages
    Info = 2,
    /// Debug messages (development only)
    Debug = 3,
    /// Trace messages (very verbose)
    Trace = 4,
}

impl LogLevel {
    /// Get the log level name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single log entry
#[derive(Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Timestamp supplied by the caller
    pub timestamp: Millis,
    /// Component name
    pub module: &'static str,
    /// Formatted message
    pub message: String<MAX_LOG_MESSAGE_LEN>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:08}] {} [{}] {}",
            self.timestamp.as_millis(),
            self.level.as_str(),
            self.module,
            self.message
        )
    }
}

/// Circular log buffer
///
/// Oldest entries are overwritten once the buffer is full.
pub struct LogBuffer {
    entries: [Option<LogEntry>; LOG_BUFFER_SIZE],
    write_index: usize,
    count: usize,
    min_level: LogLevel,
}

impl LogBuffer {
    /// Create a new empty log buffer
    #[must_use]
    pub const fn new() -> Self {
        const NONE: Option<LogEntry> = None;
        Self {
            entries: [NONE; LOG_BUFFER_SIZE],
            write_index: 0,
            count: 0,
            min_level: LogLevel::Info,
        }
    }

    /// Set the minimum level recorded
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Get the minimum level recorded
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check whether a level would be recorded
    #[must_use]
    pub const fn should_log(&self, level: LogLevel) -> bool {
        (level as u8) <= (self.min_level as u8)
    }

    /// Record a formatted message
    pub fn log(
        &mut self,
        level: LogLevel,
        timestamp: Millis,
        module: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        if !self.should_log(level) {
            return;
        }

        let mut message = String::<MAX_LOG_MESSAGE_LEN>::new();
        // Truncated silently when the message exceeds the entry size.
        let _ = message.write_fmt(args);

        self.entries[self.write_index] = Some(LogEntry {
            level,
            timestamp,
            module,
            message,
        });
        self.write_index = (self.write_index + 1) % LOG_BUFFER_SIZE;
        if self.count < LOG_BUFFER_SIZE {
            self.count += 1;
        }
    }

    /// Number of entries currently held
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check whether the buffer is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
        self.write_index = 0;
        self.count = 0;
    }

    /// Iterate over entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        let start = if self.count < LOG_BUFFER_SIZE {
            0
        } else {
            self.write_index
        };
        (0..self.count).filter_map(move |i| {
            self.entries[(start + i) % LOG_BUFFER_SIZE].as_ref()
        })
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Error, $ts, $module, format_args!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Warn, $ts, $module, format_args!($($arg)*))
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Info, $ts, $module, format_args!($($arg)*))
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Debug, $ts, $module, format_args!($($arg)*))
    };
}

/// Log a trace-level message
#[macro_export]
macro_rules! log_trace {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Trace, $ts, $module, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_iterate() {
        let mut buf = LogBuffer::new();
        log_info!(buf, Millis::new(10), "test", "first {}", 1);
        log_info!(buf, Millis::new(20), "test", "second");

        let entries: heapless::Vec<&LogEntry, LOG_BUFFER_SIZE> = buf.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message.as_str(), "first 1");
        assert_eq!(entries[1].message.as_str(), "second");
    }

    #[test]
    fn test_level_filtering() {
        let mut buf = LogBuffer::new();
        log_debug!(buf, Millis::ZERO, "test", "dropped at default level");
        assert!(buf.is_empty());

        buf.set_min_level(LogLevel::Debug);
        log_debug!(buf, Millis::ZERO, "test", "recorded now");
        assert_eq!(buf.len(), 1);

        // Trace stays below the debug threshold until requested.
        log_trace!(buf, Millis::ZERO, "test", "still dropped");
        assert_eq!(buf.len(), 1);
        buf.set_min_level(LogLevel::Trace);
        log_trace!(buf, Millis::ZERO, "test", "recorded at trace");
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_rotation_keeps_newest() {
        let mut buf = LogBuffer::new();
        for i in 0..(LOG_BUFFER_SIZE as u32 + 3) {
            log_info!(buf, Millis::new(i), "test", "entry {}", i);
        }
        assert_eq!(buf.len(), LOG_BUFFER_SIZE);
        let first = buf.iter().next().unwrap();
        assert_eq!(first.timestamp, Millis::new(3));
    }
}
