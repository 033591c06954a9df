use std::sync::Arc;

use crate::protocol::{Notice, NoticeResponse};
use crate::{Error, NotifierOptions};

/// The trait for transports.
///
/// A transport is responsible for delivering notices to the service. Unlike
/// a fire-and-forget queue, sending is synchronous: the notifier hands the
/// outcome back to whoever submitted the notice.
pub trait Transport: Send + Sync + 'static {
    /// Sends a notice.
    fn send_notice(&self, notice: &Notice) -> Result<NoticeResponse, Error>;
}

/// A factory creating transport instances.
///
/// Because options are potentially reused between different notifiers the
/// options do not actually contain a transport but a factory object that
/// can create transports instead.
///
/// The factory has a single method that creates a new arced transport.
/// Because transports can be wrapped in `Arc`s and those are clonable
/// any `Arc<Transport>` is also a valid transport factory. This for
/// instance lets you put a `Arc<TestTransport>` directly into the options.
///
/// This is automatically implemented for all closures optionally taking
/// the notifier options and returning a boxed factory.
pub trait TransportFactory: Send + Sync {
    /// Given some options creates a transport.
    fn create_transport(&self, options: &NotifierOptions) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn(&NotifierOptions) -> Arc<dyn Transport> + Clone + Send + Sync + 'static,
{
    fn create_transport(&self, options: &NotifierOptions) -> Arc<dyn Transport> {
        (*self)(options)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send_notice(&self, notice: &Notice) -> Result<NoticeResponse, Error> {
        (**self).send_notice(notice)
    }
}

impl<T: Transport> TransportFactory for Arc<T> {
    fn create_transport(&self, options: &NotifierOptions) -> Arc<dyn Transport> {
        let _ = options;
        self.clone()
    }
}
