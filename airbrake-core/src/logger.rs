//! The notifier's own diagnostic log.
//!
//! Everything the notifier wants to tell a human about its internals (dropped
//! notices, rate limits, unexpected responses) goes through this log. It is
//! process-wide: by default it writes to standard error with a `[airbrake] `
//! prefix and a timestamp. Applications that do not want to see it point the
//! output at [`std::io::sink`] and clear the flags.
//!
//! ```
//! use airbrake_core::logger::{self, LogFlags};
//!
//! logger::set_output(std::io::sink());
//! logger::set_flags(LogFlags::empty());
//! assert!(logger::flags().is_empty());
//! ```

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::SystemTime;

use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// Formatting flags of the diagnostic log.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogFlags: u32 {
        /// Start every line with `[airbrake] `.
        const PREFIX = 0b01;
        /// Start every line with the seconds since the unix epoch.
        const TIMESTAMP = 0b10;
    }
}

impl Default for LogFlags {
    fn default() -> Self {
        LogFlags::PREFIX | LogFlags::TIMESTAMP
    }
}

struct DiagnosticLog {
    output: Box<dyn Write + Send>,
    flags: LogFlags,
}

static LOG: Lazy<Mutex<DiagnosticLog>> = Lazy::new(|| {
    Mutex::new(DiagnosticLog {
        output: Box::new(io::stderr()),
        flags: LogFlags::default(),
    })
});

fn with_log<R, F: FnOnce(&mut DiagnosticLog) -> R>(f: F) -> R {
    let mut guard = LOG.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// Redirects the diagnostic log to `output`.
pub fn set_output<W: Write + Send + 'static>(output: W) {
    with_log(|log| log.output = Box::new(output));
}

/// Replaces the formatting flags of the diagnostic log.
pub fn set_flags(flags: LogFlags) {
    with_log(|log| log.flags = flags);
}

/// Returns the current formatting flags.
pub fn flags() -> LogFlags {
    with_log(|log| log.flags)
}

fn format_line(flags: LogFlags, args: fmt::Arguments<'_>) -> String {
    let mut line = String::new();
    if flags.contains(LogFlags::TIMESTAMP) {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let _ = write!(line, "{} ", secs);
    }
    if flags.contains(LogFlags::PREFIX) {
        line.push_str("[airbrake] ");
    }
    let _ = line.write_fmt(args);
    line
}

#[doc(hidden)]
pub fn write_line(args: fmt::Arguments<'_>) {
    with_log(|log| {
        let line = format_line(log.flags, args);
        // a broken diagnostic sink is not worth reporting anywhere
        let _ = writeln!(log.output, "{}", line);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::SharedBuffer;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(LogFlags::PREFIX, format_args!("sent {}", 1)),
            "[airbrake] sent 1"
        );
        assert_eq!(
            format_line(LogFlags::empty(), format_args!("plain")),
            "plain"
        );

        let line = format_line(LogFlags::default(), format_args!("stamped"));
        assert!(line.ends_with(" [airbrake] stamped"));
        assert!(line.split(' ').next().unwrap().parse::<u64>().is_ok());
    }

    #[test]
    fn test_redirected_output() {
        let buffer = SharedBuffer::new();
        set_output(buffer.clone());
        set_flags(LogFlags::PREFIX);

        crate::airbrake_debug!("rate limited for {}s", 30);

        set_output(io::sink());
        set_flags(LogFlags::empty());
        crate::airbrake_debug!("nobody sees this");

        let contents = buffer.contents();
        assert!(contents.contains("[airbrake] rate limited for 30s\n"));
        assert!(!contents.contains("nobody sees this"));
    }
}
