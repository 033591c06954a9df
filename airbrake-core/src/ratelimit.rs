use std::time::{Duration, SystemTime};

use httpdate::parse_http_date;

/// Parses a `Retry-After` or `X-RateLimit-Delay` header.
///
/// Both a number of seconds and an HTTP date are accepted.
pub fn parse_retry_after(header: &str) -> Option<Duration> {
    let header = header.trim();
    if let Ok(value) = header.parse::<f64>() {
        if value.is_finite() && value >= 0.0 {
            return Some(Duration::from_secs(value.ceil() as u64));
        }
        return None;
    }
    let date = parse_http_date(header).ok()?;
    Some(date.duration_since(SystemTime::now()).unwrap_or_default())
}

/// Remembers until when the service does not want to see notices.
#[derive(Debug, Default)]
pub(crate) struct RateLimiter {
    until: Option<SystemTime>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks sending for `delay` starting now.
    pub fn limit_for(&mut self, delay: Duration) {
        self.until = Some(SystemTime::now() + delay);
    }

    /// Returns the time left until notices may be sent again.
    pub fn is_disabled(&self) -> Option<Duration> {
        let until = self.until?;
        until
            .duration_since(SystemTime::now())
            .ok()
            .filter(|left| !left.is_zero())
    }
}
