use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::defaults::apply_defaults;
use crate::notice::{
    apply_request, attach_backtrace, base_context, errors_from_error, request_info_from_request,
};
use crate::protocol::{Notice, NoticeResponse};
use crate::ratelimit::RateLimiter;
use crate::{airbrake_debug, Error, NotifierOptions, Transport};

/// A notice filter.
///
/// Filters see every outgoing notice and either hand it back, possibly
/// modified, or drop it by returning `None`.
pub type NoticeFilter = dyn Fn(Notice) -> Option<Notice> + Send + Sync;

/// The Airbrake notifier.
///
/// The notifier builds notices from errors and sends them to the service via
/// the configured [`Transport`]. It can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use airbrake_core::test::{test_options, TestTransport};
/// use airbrake_core::Notifier;
///
/// let transport = TestTransport::new();
/// let notifier = Notifier::with_options(test_options(&transport));
/// notifier.add_filter(|mut notice| {
///     notice.set_context("component", "billing");
///     Some(notice)
/// });
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// notifier.notify(err, None::<&http::Request<()>>).unwrap();
///
/// let notices = transport.fetch_and_clear_notices();
/// assert_eq!(notices[0].context_str("component"), Some("billing"));
/// ```
pub struct Notifier {
    options: NotifierOptions,
    transport: Option<Arc<dyn Transport>>,
    filters: RwLock<Vec<Arc<NoticeFilter>>>,
    rate_limiter: Mutex<RateLimiter>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("options", &self.options)
            .field("filters", &self.filters().len())
            .finish()
    }
}

impl Notifier {
    /// Creates a new notifier, filling unset options from the environment.
    ///
    /// See [`apply_defaults`] for the options that get defaults.
    pub fn new(options: NotifierOptions) -> Notifier {
        Notifier::with_options(apply_defaults(options))
    }

    /// Creates a new notifier for exactly the given options.
    ///
    /// Without a `transport` the notifier cannot send anything and every
    /// submission fails with [`Error::NoTransport`].
    pub fn with_options(options: NotifierOptions) -> Notifier {
        airbrake_debug!(
            "creating notifier for project {} at {}",
            options.project_id,
            options.host()
        );
        let transport = options
            .transport
            .as_ref()
            .map(|factory| factory.create_transport(&options));
        if transport.is_none() {
            airbrake_debug!("no transport configured, notices cannot be sent");
        }

        Notifier {
            options,
            transport,
            filters: RwLock::new(Vec::new()),
            rate_limiter: Mutex::new(RateLimiter::new()),
        }
    }

    /// Returns the options of this notifier.
    pub fn options(&self) -> &NotifierOptions {
        &self.options
    }

    /// Quick check to see if the notifier is able to send notices.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Registers a notice filter.
    ///
    /// Filters run in registration order when a notice is sent. The first
    /// filter that returns `None` drops the notice and later filters do not
    /// see it.
    pub fn add_filter<F>(&self, filter: F)
    where
        F: Fn(Notice) -> Option<Notice> + Send + Sync + 'static,
    {
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(filter));
    }

    fn filters(&self) -> Vec<Arc<NoticeFilter>> {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a notice for `error`.
    ///
    /// The error and all its sources become the errors of the notice. The
    /// outermost one gets a backtrace of the current thread that starts
    /// `depth` frames above the caller of this method. When a request is
    /// given, its URL, method, user agent and client address are added to the
    /// context, its headers to the environment and its query to the params.
    pub fn notice<B>(
        &self,
        error: Arc<dyn StdError + Send + Sync>,
        request: Option<&http::Request<B>>,
        depth: usize,
    ) -> Notice {
        let mut errors = errors_from_error(&*error);
        attach_backtrace(&mut errors, depth);

        let mut notice = Notice {
            errors,
            context: base_context(
                self.options.environment.as_deref(),
                self.options.revision.as_deref(),
                self.options.root_directory.as_deref(),
            ),
            error: Some(error),
            ..Default::default()
        };

        if let Some(request) = request {
            let info = request_info_from_request(request);
            apply_request(&mut notice, &info);
            notice.request = Some(info);
        }

        notice
    }

    /// Sends a notice.
    ///
    /// Returns `Ok(None)` if a filter dropped the notice, and the answer of
    /// the service otherwise. While the service asked to back off, notices
    /// are rejected with [`Error::RateLimited`] without being sent.
    pub fn send_notice(&self, notice: Notice) -> Result<Option<NoticeResponse>, Error> {
        let mut notice = notice;
        for filter in self.filters() {
            notice = match filter(notice) {
                Some(notice) => notice,
                None => {
                    airbrake_debug!("notice dropped by filter");
                    return Ok(None);
                }
            };
        }

        if self.options.project_id.value() == 0 || self.options.project_key.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let rate_limited = self
            .rate_limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_disabled();
        if let Some(retry_after) = rate_limited {
            return Err(Error::RateLimited { retry_after });
        }

        let transport = self.transport.as_ref().ok_or(Error::NoTransport)?;
        match transport.send_notice(&notice) {
            Ok(response) => {
                airbrake_debug!("sent notice {}", response.id);
                Ok(Some(response))
            }
            Err(err) => {
                if let Error::RateLimited { retry_after } = err {
                    self.rate_limiter
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .limit_for(retry_after);
                }
                airbrake_debug!("failed to send notice: {}", err);
                Err(err)
            }
        }
    }

    /// Builds a notice for `error` and sends it.
    pub fn notify<E, B>(
        &self,
        error: E,
        request: Option<&http::Request<B>>,
    ) -> Result<Option<NoticeResponse>, Error>
    where
        E: StdError + Send + Sync + 'static,
    {
        let notice = self.notice(Arc::new(error), request, 0);
        self.send_notice(notice)
    }
}
