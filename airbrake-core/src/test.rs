//! This provides testing functionality for building tests.
//!
//! The [`TestTransport`] collects notices instead of sending them, and can be
//! told to fail so callers can exercise their error paths.
//!
//! # Example usage
//!
//! ```
//! use airbrake_core::test::{test_options, TestTransport};
//! use airbrake_core::Notifier;
//!
//! let transport = TestTransport::new();
//! let notifier = Notifier::with_options(test_options(&transport));
//!
//! let err = "NaN".parse::<u32>().unwrap_err();
//! notifier.notify(err, None::<&http::Request<()>>).unwrap();
//!
//! let notices = transport.fetch_and_clear_notices();
//! assert_eq!(notices.len(), 1);
//! assert_eq!(notices[0].errors[0].ty, "ParseIntError");
//! ```

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::protocol::{Notice, NoticeResponse};
use crate::{Error, NotifierOptions, Transport};

type FailureFn = dyn Fn() -> Error + Send + Sync;

/// Collects notices instead of sending them.
///
/// # Examples
///
/// ```
/// use airbrake_core::test::TestTransport;
/// use airbrake_core::{Notifier, NotifierOptions};
/// use std::sync::Arc;
///
/// let transport = TestTransport::new();
/// let options = NotifierOptions {
///     transport: Some(Arc::new(transport.clone())),
///     ..NotifierOptions::new(1, "key")
/// };
/// let notifier = Notifier::with_options(options);
/// assert!(notifier.is_enabled());
/// ```
pub struct TestTransport {
    collected: Mutex<Vec<Notice>>,
    failure: Mutex<Option<Box<FailureFn>>>,
}

impl TestTransport {
    /// Creates a new test transport.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Arc<TestTransport> {
        Arc::new(TestTransport {
            collected: Mutex::new(vec![]),
            failure: Mutex::new(None),
        })
    }

    /// Makes every following send fail with the error `f` creates.
    ///
    /// Failed notices are not collected.
    pub fn fail_with<F>(&self, f: F)
    where
        F: Fn() -> Error + Send + Sync + 'static,
    {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(f));
    }

    /// Makes sends succeed again.
    pub fn recover(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Fetches and clears the contained notices.
    pub fn fetch_and_clear_notices(&self) -> Vec<Notice> {
        let mut guard = self.collected.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl Transport for TestTransport {
    fn send_notice(&self, notice: &Notice) -> Result<NoticeResponse, Error> {
        if let Some(failure) = &*self.failure.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(failure());
        }
        let mut collected = self.collected.lock().unwrap_or_else(PoisonError::into_inner);
        collected.push(notice.clone());
        Ok(NoticeResponse {
            id: collected.len().to_string(),
            url: String::new(),
        })
    }
}

/// Options for project `1` that deliver into the given test transport.
pub fn test_options(transport: &Arc<TestTransport>) -> NotifierOptions {
    NotifierOptions {
        transport: Some(Arc::new(transport.clone())),
        ..NotifierOptions::new(1, "test-key")
    }
}

/// A cloneable in-memory writer.
///
/// Useful to capture output that would otherwise go to standard error.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
