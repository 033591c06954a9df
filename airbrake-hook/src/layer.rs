use tracing_core::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::converters::entry_from_event;
use crate::hook::report_hook_error;
use crate::{Hooks, Level};

/// Provides a tracing layer that dispatches events to [`Hooks`].
///
/// Spans are ignored. An event is converted into an [`Entry`](crate::Entry)
/// only if a hook listens on its level.
///
/// # Examples
///
/// ```
/// use tracing_subscriber::prelude::*;
///
/// let hooks = airbrake_hook::Hooks::new();
/// let _subscriber = tracing_subscriber::registry().with(airbrake_hook::layer(hooks));
/// ```
#[derive(Debug, Clone)]
pub struct AirbrakeLayer {
    hooks: Hooks,
}

impl AirbrakeLayer {
    /// Creates a layer dispatching to `hooks`.
    pub fn new(hooks: Hooks) -> AirbrakeLayer {
        AirbrakeLayer { hooks }
    }

    /// The hooks events are dispatched to.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    fn wants(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && self.hooks.is_enabled(Level::from(*metadata.level()))
    }
}

impl<S> Layer<S> for AirbrakeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.wants(event.metadata()) {
            return;
        }
        let mut entry = entry_from_event(event);
        if let Err(err) = self.hooks.fire(entry.level, &mut entry) {
            report_hook_error(&err);
        }
    }
}

/// Creates a layer dispatching to `hooks`.
pub fn layer(hooks: Hooks) -> AirbrakeLayer {
    AirbrakeLayer::new(hooks)
}
