use std::env;

use crate::types::ProjectId;
use crate::{airbrake_debug, NotifierOptions};

/// Fills in unset options from the process environment.
///
/// * `project_id`: `AIRBRAKE_PROJECT_ID`, if the id is `0`
/// * `project_key`: `AIRBRAKE_PROJECT_KEY`, if the key is empty
/// * `transport`: the [`DefaultTransportFactory`](crate::transports::DefaultTransportFactory)
/// * `host`: `AIRBRAKE_HOST`
/// * `root_directory`: the current working directory
/// * `http_proxy`: `HTTP_PROXY` or `http_proxy`
/// * `https_proxy`: `HTTPS_PROXY` or `https_proxy`, falling back to the HTTP proxy
pub fn apply_defaults(mut opts: NotifierOptions) -> NotifierOptions {
    #[cfg(feature = "reqwest")]
    if opts.transport.is_none() {
        opts.transport = Some(std::sync::Arc::new(
            crate::transports::DefaultTransportFactory,
        ));
    }
    if opts.project_id.value() == 0 {
        if let Ok(value) = env::var("AIRBRAKE_PROJECT_ID") {
            match value.parse::<ProjectId>() {
                Ok(id) => opts.project_id = id,
                Err(err) => airbrake_debug!("ignoring AIRBRAKE_PROJECT_ID {:?}: {}", value, err),
            }
        }
    }
    if opts.project_key.is_empty() {
        if let Ok(key) = env::var("AIRBRAKE_PROJECT_KEY") {
            opts.project_key = key;
        }
    }
    if opts.host.is_none() {
        opts.host = env::var("AIRBRAKE_HOST").ok().filter(|h| !h.is_empty());
    }
    if opts.root_directory.is_none() {
        opts.root_directory = env::current_dir()
            .ok()
            .map(|dir| dir.to_string_lossy().into_owned());
    }
    if opts.http_proxy.is_none() {
        opts.http_proxy = env::var("HTTP_PROXY")
            .ok()
            .or_else(|| env::var("http_proxy").ok());
    }
    if opts.https_proxy.is_none() {
        opts.https_proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("https_proxy").ok())
            .or_else(|| opts.http_proxy.clone());
    }
    opts
}
