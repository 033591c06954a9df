use std::collections::btree_map::{BTreeMap, Entry};
use std::error::Error;

use http::header::{HOST, USER_AGENT};
use once_cell::sync::Lazy;

use crate::backtrace_support::current_backtrace;
use crate::constants::NOTIFIER_INFO;
use crate::protocol::{ErrorInfo, Map, RequestInfo, Value};
use crate::utils::{hostname, parse_type_from_debug};

static HOSTNAME: Lazy<Option<String>> = Lazy::new(hostname);

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Creates an [`ErrorInfo`] for a single error, without walking its sources.
pub fn error_info_from_error<E: Error + ?Sized>(err: &E) -> ErrorInfo {
    ErrorInfo {
        ty: parse_type_from_debug(err),
        message: err.to_string(),
        backtrace: Vec::new(),
    }
}

/// Creates the error chain of a notice.
///
/// The outermost error comes first, followed by every error reachable
/// through [`Error::source`].
///
/// # Examples
///
/// ```
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct Inner;
///
/// impl fmt::Display for Inner {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("inner")
///     }
/// }
///
/// impl std::error::Error for Inner {}
///
/// #[derive(Debug)]
/// struct Outer(Inner);
///
/// impl fmt::Display for Outer {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("outer")
///     }
/// }
///
/// impl std::error::Error for Outer {
///     fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
///         Some(&self.0)
///     }
/// }
///
/// let errors = airbrake_core::errors_from_error(&Outer(Inner));
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors[0].ty, "Outer");
/// assert_eq!(errors[0].message, "outer");
/// assert_eq!(errors[1].ty, "Inner");
/// ```
pub fn errors_from_error<E: Error + ?Sized>(err: &E) -> Vec<ErrorInfo> {
    let mut errors = vec![error_info_from_error(err)];

    let mut source = err.source();
    while let Some(err) = source {
        errors.push(error_info_from_error(err));
        source = err.source();
    }

    errors
}

/// Takes a snapshot of an inbound HTTP request.
pub fn request_info_from_request<B>(req: &http::Request<B>) -> RequestInfo {
    let mut headers = BTreeMap::<String, String>::new();
    for (name, value) in req.headers() {
        let value = String::from_utf8_lossy(value.as_bytes());
        match headers.entry(name.as_str().to_owned()) {
            Entry::Occupied(mut existing) => {
                let existing = existing.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
        }
    }

    let query = req
        .uri()
        .query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    RequestInfo {
        method: req.method().as_str().to_owned(),
        url: request_url(req),
        headers,
        query,
        remote_addr: remote_addr(req),
    }
}

/// Rebuilds the absolute URL of a request from its URI and `Host` header.
fn request_url<B>(req: &http::Request<B>) -> String {
    let uri = req.uri();
    if uri.authority().is_some() {
        return uri.to_string();
    }
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    match req.headers().get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => path.to_owned(),
    }
}

fn remote_addr<B>(req: &http::Request<B>) -> Option<String> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(forwarded) = header(X_FORWARDED_FOR) {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|a| !a.is_empty()) {
            return Some(first.to_owned());
        }
    }
    header(X_REAL_IP).map(ToOwned::to_owned)
}

/// The context every notice starts out with.
pub(crate) fn base_context(
    environment: Option<&str>,
    revision: Option<&str>,
    root_directory: Option<&str>,
) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "notifier".into(),
        serde_json::to_value(&*NOTIFIER_INFO).unwrap_or(Value::Null),
    );
    context.insert("language".into(), "Rust".into());
    context.insert("os".into(), std::env::consts::OS.into());
    context.insert("architecture".into(), std::env::consts::ARCH.into());
    context.insert("severity".into(), "error".into());
    if let Some(hostname) = HOSTNAME.as_deref() {
        context.insert("hostname".into(), hostname.into());
    }
    if let Some(root) = root_directory {
        context.insert("rootDirectory".into(), root.into());
    }
    if let Some(environment) = environment {
        context.insert("environment".into(), environment.into());
    }
    if let Some(revision) = revision {
        context.insert("revision".into(), revision.into());
    }
    context
}

/// Projects a request snapshot into the context, environment and params of a
/// notice.
pub(crate) fn apply_request(notice: &mut crate::protocol::Notice, request: &RequestInfo) {
    notice.set_context("url", request.url.as_str());
    notice.set_context("httpMethod", request.method.as_str());
    if let Some(ua) = request.headers.get(USER_AGENT.as_str()) {
        notice.set_context("userAgent", ua.as_str());
    }
    if let Some(addr) = &request.remote_addr {
        notice.set_context("userAddr", addr.as_str());
    }
    for (name, value) in &request.headers {
        notice
            .environment
            .insert(name.clone(), Value::String(value.clone()));
    }
    for (name, value) in &request.query {
        notice.params.insert(name.clone(), Value::String(value.clone()));
    }
}

/// Captures a backtrace for the outermost error of a notice.
pub(crate) fn attach_backtrace(errors: &mut [ErrorInfo], depth: usize) {
    if let Some(first) = errors.first_mut() {
        first.backtrace = current_backtrace(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> http::Request<()> {
        http::Request::builder()
            .method("POST")
            .uri("/checkout?cart=17&coupon=spring%20sale")
            .header("Host", "shop.example.com")
            .header("User-Agent", "curl/8.0")
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .header("Accept", "text/html")
            .header("Accept", "application/json")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_request_info() {
        let info = request_info_from_request(&request());

        assert_eq!(info.method, "POST");
        assert_eq!(info.url, "http://shop.example.com/checkout?cart=17&coupon=spring%20sale");
        assert_eq!(info.remote_addr.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.headers["accept"], "text/html, application/json");
        assert_eq!(info.query["cart"], "17");
        assert_eq!(info.query["coupon"], "spring sale");
    }

    #[test]
    fn test_request_url_variants() {
        let absolute = http::Request::get("https://api.example.com/v1/items")
            .body(())
            .unwrap();
        assert_eq!(request_url(&absolute), "https://api.example.com/v1/items");

        let bare = http::Request::get("/health").body(()).unwrap();
        assert_eq!(request_url(&bare), "/health");
    }

    #[test]
    fn test_remote_addr_falls_back_to_real_ip() {
        let req = http::Request::get("/")
            .header("X-Real-Ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(remote_addr(&req).as_deref(), Some("198.51.100.2"));

        let req = http::Request::get("/").body(()).unwrap();
        assert_eq!(remote_addr(&req), None);
    }

    #[test]
    fn test_apply_request() {
        let mut notice = crate::protocol::Notice::default();
        apply_request(&mut notice, &request_info_from_request(&request()));

        assert_eq!(notice.context_str("httpMethod"), Some("POST"));
        assert_eq!(notice.context_str("userAgent"), Some("curl/8.0"));
        assert_eq!(notice.context_str("userAddr"), Some("203.0.113.7"));
        assert_eq!(notice.environment["user-agent"], "curl/8.0");
        assert_eq!(notice.params["coupon"], "spring sale");
    }

    #[test]
    fn test_base_context() {
        let context = base_context(Some("staging"), Some("abc123"), None);
        assert_eq!(context["environment"], "staging");
        assert_eq!(context["revision"], "abc123");
        assert_eq!(context["language"], "Rust");
        assert_eq!(context["notifier"]["name"], "airbrake-rust");
        assert!(!context.contains_key("rootDirectory"));
    }
}
