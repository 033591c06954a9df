use once_cell::sync::Lazy;

use crate::protocol::NotifierInfo;

/// The version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The host notices are sent to unless configured otherwise.
pub const DEFAULT_HOST: &str = "https://api.airbrake.io";

pub(crate) const NOTIFIER_NAME: &str = "airbrake-rust";

pub(crate) const NOTIFIER_URL: &str = env!("CARGO_PKG_REPOSITORY");

/// The user agent sent with every notice.
pub static USER_AGENT: Lazy<String> = Lazy::new(|| format!("{}/{}", NOTIFIER_NAME, VERSION));

pub(crate) static NOTIFIER_INFO: Lazy<NotifierInfo> = Lazy::new(|| NotifierInfo {
    name: NOTIFIER_NAME.into(),
    version: VERSION.into(),
    url: NOTIFIER_URL.into(),
});
