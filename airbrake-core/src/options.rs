use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{DEFAULT_HOST, USER_AGENT};
use crate::types::ProjectId;
use crate::TransportFactory;

/// Configuration settings for the notifier.
///
/// # Examples
///
/// ```
/// let options = airbrake_core::NotifierOptions {
///     revision: Some("3f9a2c1".into()),
///     ..airbrake_core::NotifierOptions::new(42, "secret")
/// };
/// assert_eq!(
///     options.notice_url(),
///     "https://api.airbrake.io/api/v3/projects/42/notices"
/// );
/// ```
#[derive(Clone)]
pub struct NotifierOptions {
    /// The project notices are reported to.
    pub project_id: ProjectId,
    /// The project API key.
    pub project_key: String,
    /// The Airbrake host. Defaults to `https://api.airbrake.io`.
    pub host: Option<String>,
    /// The environment reported in every notice's context.
    pub environment: Option<String>,
    /// The revision (usually a commit hash) reported in every notice's context.
    pub revision: Option<String>,
    /// The root directory of the application.
    pub root_directory: Option<String>,
    /// Timeout of a single notice submission. (defaults to 10 seconds)
    pub timeout: Duration,
    /// An optional HTTP proxy to use.
    pub http_proxy: Option<String>,
    /// An optional HTTPS proxy to use.
    pub https_proxy: Option<String>,
    /// The transport to use.
    ///
    /// This is typically either a boxed function taking the notifier options by
    /// reference and returning a `Transport`, an `Arc<Transport>` or
    /// the `DefaultTransportFactory`.
    pub transport: Option<Arc<dyn TransportFactory>>,
    /// The user agent that should be reported.
    pub user_agent: String,
}

impl NotifierOptions {
    /// Creates options for the given project.
    pub fn new<K: Into<String>>(project_id: u64, project_key: K) -> Self {
        NotifierOptions {
            project_id: ProjectId::new(project_id),
            project_key: project_key.into(),
            ..Default::default()
        }
    }

    /// Creates new options and immediately configures them.
    pub fn configure<F>(f: F) -> Self
    where
        F: FnOnce(&mut NotifierOptions) -> &mut NotifierOptions,
    {
        let mut opts = Self::default();
        f(&mut opts);
        opts
    }

    /// The host notices are sent to.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// The URL notices are posted to.
    pub fn notice_url(&self) -> String {
        format!(
            "{}/api/v3/projects/{}/notices",
            self.host().trim_end_matches('/'),
            self.project_id
        )
    }
}

impl fmt::Debug for NotifierOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Debug)]
        struct TransportFactory;

        f.debug_struct("NotifierOptions")
            .field("project_id", &self.project_id)
            .field("project_key", &"[redacted]")
            .field("host", &self.host())
            .field("environment", &self.environment)
            .field("revision", &self.revision)
            .field("root_directory", &self.root_directory)
            .field("timeout", &self.timeout)
            .field("http_proxy", &self.http_proxy)
            .field("https_proxy", &self.https_proxy)
            .field("transport", &self.transport.as_ref().map(|_| TransportFactory))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for NotifierOptions {
    fn default() -> NotifierOptions {
        NotifierOptions {
            project_id: ProjectId::new(0),
            project_key: String::new(),
            host: None,
            environment: None,
            revision: None,
            root_directory: None,
            timeout: Duration::from_secs(10),
            http_proxy: None,
            https_proxy: None,
            transport: None,
            user_agent: USER_AGENT.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_url() {
        let mut options = NotifierOptions::new(7, "key");
        assert_eq!(
            options.notice_url(),
            "https://api.airbrake.io/api/v3/projects/7/notices"
        );

        options.host = Some("https://errbit.example.com/".into());
        assert_eq!(
            options.notice_url(),
            "https://errbit.example.com/api/v3/projects/7/notices"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let options = NotifierOptions::new(7, "super-secret");
        let debug = format!("{:?}", options);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_configure() {
        let options = NotifierOptions::configure(|o| {
            o.project_key = "key".into();
            o.timeout = Duration::from_secs(2);
            o
        });
        assert_eq!(options.project_key, "key");
        assert_eq!(options.timeout, Duration::from_secs(2));
    }
}
