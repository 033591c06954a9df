use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Proxy;

use crate::protocol::{Notice, NoticeResponse};
use crate::ratelimit::parse_retry_after;
use crate::{airbrake_debug, Error, NotifierOptions, Transport};

use super::parse_response;

const RATE_LIMIT_DELAY: &str = "x-ratelimit-delay";

type Reply = SyncSender<Result<NoticeResponse, Error>>;

enum Task {
    Send(Vec<u8>, Reply),
    Shutdown,
}

/// A [`Transport`] that sends notices via the [`reqwest`] library.
///
/// When the `reqwest` feature is enabled this will currently be the default
/// transport. The HTTP client lives on a dedicated thread, so sending is safe
/// from inside an async runtime. The calling thread still blocks until the
/// service answered or the configured timeout elapsed.
///
/// [`reqwest`]: https://crates.io/crates/reqwest
pub struct ReqwestHttpTransport {
    sender: SyncSender<Task>,
    handle: Option<JoinHandle<()>>,
}

impl ReqwestHttpTransport {
    /// Creates a new Transport.
    pub fn new(options: &NotifierOptions) -> Self {
        Self::new_internal(options, None)
    }

    /// Creates a new Transport that uses the specified [`ReqwestClient`].
    pub fn with_client(options: &NotifierOptions, client: ReqwestClient) -> Self {
        Self::new_internal(options, Some(client))
    }

    fn new_internal(options: &NotifierOptions, client: Option<ReqwestClient>) -> Self {
        let (sender, receiver) = sync_channel(30);
        let worker = Worker {
            url: options.notice_url(),
            auth: format!("Bearer {}", options.project_key),
        };
        let options = options.clone();
        let handle = thread::Builder::new()
            .name("airbrake-transport".into())
            .spawn(move || {
                // the client is built, used and dropped on this thread only
                let client = client.unwrap_or_else(|| build_client(&options));
                worker.run(&client, receiver);
            })
            .map_err(|err| airbrake_debug!("failed to spawn transport thread: {}", err))
            .ok();

        Self { sender, handle }
    }
}

impl Drop for ReqwestHttpTransport {
    fn drop(&mut self) {
        let _ = self.sender.send(Task::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    url: String,
    auth: String,
}

impl Worker {
    fn run(&self, client: &ReqwestClient, receiver: Receiver<Task>) {
        for task in receiver {
            match task {
                Task::Send(body, reply) => {
                    let _ = reply.send(self.send(client, body));
                }
                Task::Shutdown => return,
            }
        }
    }

    fn send(&self, client: &ReqwestClient, body: Vec<u8>) -> Result<NoticeResponse, Error> {
        let response = client
            .post(&self.url)
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(Error::http)?;

        let status = response.status().as_u16();
        let headers = response.headers();
        let retry_after = headers
            .get(RATE_LIMIT_DELAY)
            .or_else(|| headers.get(RETRY_AFTER))
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);

        let text = response.text().map_err(Error::http)?;
        airbrake_debug!("notice endpoint answered {}: `{}`", status, text);
        parse_response(status, retry_after, &text)
    }
}

fn build_client(options: &NotifierOptions) -> ReqwestClient {
    let mut builder = ReqwestClient::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str());
    if let Some(url) = options.http_proxy.as_deref() {
        match Proxy::http(url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(err) => airbrake_debug!("ignoring invalid http proxy {:?}: {}", url, err),
        }
    }
    if let Some(url) = options.https_proxy.as_deref() {
        match Proxy::https(url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(err) => airbrake_debug!("ignoring invalid https proxy {:?}: {}", url, err),
        }
    }
    builder.build().unwrap_or_else(|err| {
        airbrake_debug!("failed to configure http client, using defaults: {}", err);
        ReqwestClient::new()
    })
}

impl Transport for ReqwestHttpTransport {
    fn send_notice(&self, notice: &Notice) -> Result<NoticeResponse, Error> {
        let body = serde_json::to_vec(notice)?;
        let (reply, response) = sync_channel(1);
        self.sender
            .send(Task::Send(body, reply))
            .map_err(|_| Error::TransportClosed)?;
        response.recv().map_err(|_| Error::TransportClosed)?
    }
}
