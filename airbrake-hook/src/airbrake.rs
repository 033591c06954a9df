use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once, PoisonError};

use airbrake_core::logger::{self, LogFlags};
use airbrake_core::protocol::Notice;
use airbrake_core::{Notifier, NotifierOptions};

use crate::{Entry, FieldValue, Hook, HookError, Level, MessageError};

/// Environment variable holding the revision of the running build.
pub const REVISION_ENV_KEY: &str = "GIT_COMMIT_LONG";

/// Notices are never sent from this environment.
pub const DEVELOPMENT: &str = "development";

/// The levels an [`AirbrakeHook`] fires on.
pub const DEFAULT_LEVELS: [Level; 3] = [Level::Error, Level::Fatal, Level::Panic];

/// Frames skipped above the notifier so backtraces start in the code that
/// logged the entry rather than in the logging pipeline.
///
/// Only used when none of the pipeline's frames can be recognized, e.g. when
/// symbols are missing.
pub const STACK_DEPTH: usize = 6;

const FAILURE_PREFIX: &str = "Failed to send error to Airbrake: ";

static SILENCE_NOTIFIER_LOG: Once = Once::new();

/// Turns off the notifier's diagnostic log for the whole process.
fn silence_notifier_log() {
    SILENCE_NOTIFIER_LOG.call_once(|| {
        logger::set_flags(LogFlags::empty());
        logger::set_output(io::sink());
    });
}

/// A hook that reports log entries to Airbrake.
///
/// The hook fires on [`DEFAULT_LEVELS`]. Each entry becomes one notice:
///
/// * the `error` field, if it holds an error, is the reported error.
///   Otherwise the entry message is reported as a [`MessageError`].
/// * the first field holding a request (in key order) is removed from the
///   entry and attached to the notice.
/// * every other field, `error` included, is added to the notice context
///   as a string.
///
/// Submission failures are written to standard error and never returned.
///
/// # Examples
///
/// ```no_run
/// use airbrake_hook::{AirbrakeHook, Entry, Hook, Level};
///
/// let hook = AirbrakeHook::new(12345, "0123456789abcdef", "production");
/// hook.fire(&mut Entry::new(Level::Error, "payment failed").with_field("order", 17))
///     .unwrap();
/// ```
pub struct AirbrakeHook {
    notifier: Notifier,
    levels: Vec<Level>,
    failure_output: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for AirbrakeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirbrakeHook")
            .field("notifier", &self.notifier)
            .field("levels", &self.levels)
            .finish()
    }
}

impl AirbrakeHook {
    /// Creates a hook reporting to the given project.
    ///
    /// When `env` is `"development"` nothing is ever sent. Otherwise every
    /// notice is tagged with `env` as its environment.
    pub fn new<K: Into<String>>(project_id: u64, api_key: K, env: &str) -> AirbrakeHook {
        AirbrakeHook::with_options(NotifierOptions::new(project_id, api_key), env)
    }

    /// Creates a hook from full notifier options.
    ///
    /// The revision is read from `GIT_COMMIT_LONG` unless the options
    /// already carry one.
    pub fn with_options(mut options: NotifierOptions, env: &str) -> AirbrakeHook {
        if options.revision.is_none() {
            options.revision = env::var(REVISION_ENV_KEY).ok();
        }

        silence_notifier_log();
        let notifier = Notifier::new(options);

        let environment = env.to_owned();
        notifier.add_filter(move |mut notice| {
            if environment == DEVELOPMENT {
                return None;
            }
            notice.set_context("environment", environment.as_str());
            Some(notice)
        });

        AirbrakeHook {
            notifier,
            levels: DEFAULT_LEVELS.to_vec(),
            failure_output: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Writes submission failures to `output` instead of standard error.
    #[must_use]
    pub fn with_failure_output<W: Write + Send + 'static>(self, output: W) -> AirbrakeHook {
        AirbrakeHook {
            failure_output: Mutex::new(Box::new(output)),
            ..self
        }
    }

    /// The notifier used to send notices.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Sends `notice`, reporting a failure as a single line.
    pub fn send_notice(&self, notice: Notice) {
        if let Err(err) = self.notifier.send_notice(notice) {
            let mut output = self
                .failure_output
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let _ = writeln!(output, "{}{}", FAILURE_PREFIX, err);
        }
    }

    fn notice_from_entry(&self, entry: &mut Entry) -> Notice {
        let error: Arc<dyn StdError + Send + Sync> = match entry.data.get("error") {
            Some(FieldValue::Error(err)) => err.clone(),
            _ => Arc::new(MessageError::new(entry.message.as_str())),
        };

        let request_key = entry
            .data
            .iter()
            .find(|(_, value)| value.as_request().is_some())
            .map(|(key, _)| key.clone());
        let request = request_key
            .and_then(|key| entry.data.remove(&key))
            .and_then(|value| match value {
                FieldValue::Request(req) => Some(req),
                _ => None,
            });

        let mut notice = self.notifier.notice(error, request.as_deref(), STACK_DEPTH);
        for (key, value) in &entry.data {
            notice.set_context(key.as_str(), value.to_string());
        }
        notice
    }
}

impl Hook for AirbrakeHook {
    fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn fire(&self, entry: &mut Entry) -> Result<(), HookError> {
        let notice = self.notice_from_entry(entry);
        self.send_notice(notice);
        Ok(())
    }
}
