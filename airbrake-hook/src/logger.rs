use crate::converters::entry_from_record;
use crate::hook::report_hook_error;
use crate::{Hooks, Level};

/// A [`log::Log`] that dispatches records to [`Hooks`].
///
/// Records are forwarded to an optional destination logger as well, so the
/// usual output of an application stays intact.
///
/// # Examples
///
/// ```
/// use airbrake_hook::{AirbrakeLogger, Hooks};
///
/// let hooks = Hooks::new();
/// let logger = AirbrakeLogger::new(hooks);
/// let max_level = logger.max_level();
///
/// log::set_boxed_logger(Box::new(logger))
///     .map(|()| log::set_max_level(max_level))
///     .unwrap();
/// ```
pub struct AirbrakeLogger {
    hooks: Hooks,
    dest_log: Option<Box<dyn log::Log>>,
}

impl std::fmt::Debug for AirbrakeLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirbrakeLogger")
            .field("hooks", &self.hooks)
            .field("dest_log", &self.dest_log.is_some())
            .finish()
    }
}

impl AirbrakeLogger {
    /// Creates a logger dispatching to `hooks`.
    pub fn new(hooks: Hooks) -> AirbrakeLogger {
        AirbrakeLogger {
            hooks,
            dest_log: None,
        }
    }

    /// Also sends every record to `dest_log`.
    #[must_use]
    pub fn with_dest_log<L: log::Log + 'static>(mut self, dest_log: L) -> AirbrakeLogger {
        self.dest_log = Some(Box::new(dest_log));
        self
    }

    /// The hooks records are dispatched to.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// The most verbose level this logger wants to see.
    pub fn max_level(&self) -> log::LevelFilter {
        let hooks = match self.hooks.max_level() {
            None => log::LevelFilter::Off,
            Some(Level::Panic | Level::Fatal | Level::Error) => log::LevelFilter::Error,
            Some(Level::Warn) => log::LevelFilter::Warn,
            Some(Level::Info) => log::LevelFilter::Info,
            Some(Level::Debug) => log::LevelFilter::Debug,
            Some(Level::Trace) => log::LevelFilter::Trace,
        };
        match self.dest_log {
            Some(_) => hooks.max(log::max_level()),
            None => hooks,
        }
    }
}

impl log::Log for AirbrakeLogger {
    fn enabled(&self, md: &log::Metadata<'_>) -> bool {
        self.hooks.is_enabled(Level::from(md.level()))
            || self.dest_log.as_ref().is_some_and(|log| log.enabled(md))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Level::from(record.level());
        if self.hooks.is_enabled(level) {
            let mut entry = entry_from_record(record);
            if let Err(err) = self.hooks.fire(level, &mut entry) {
                report_hook_error(&err);
            }
        }
        if let Some(log) = &self.dest_log {
            if log.enabled(record.metadata()) {
                log.log(record);
            }
        }
    }

    fn flush(&self) {
        if let Some(log) = &self.dest_log {
            log.flush();
        }
    }
}
