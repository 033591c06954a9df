use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use crate::hook::report_hook_error;
use crate::{Entry, Hooks, Level};

static INIT: Once = Once::new();

/// Fires [`Level::Panic`] entries for panics.
///
/// The hook is installed once per process; later calls do nothing. The
/// previously installed panic hook still runs after the entry was fired.
pub fn register_panic_hook(hooks: Hooks) {
    INIT.call_once(|| {
        let next = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            panic_handler(&hooks, info);
            next(info);
        }));
    });
}

fn panic_handler(hooks: &Hooks, info: &PanicHookInfo<'_>) {
    if !hooks.is_enabled(Level::Panic) {
        return;
    }
    let mut entry = entry_from_panic_info(info);
    if let Err(err) = hooks.fire(Level::Panic, &mut entry) {
        report_hook_error(&err);
    }
}

/// Creates a [`Level::Panic`] entry for a panic.
///
/// The panic location is attached as the `location` field.
pub fn entry_from_panic_info(info: &PanicHookInfo<'_>) -> Entry {
    let entry = Entry::new(Level::Panic, message_from_panic_info(info));
    match info.location() {
        Some(location) => entry.with_field(
            "location",
            format!("{}:{}:{}", location.file(), location.line(), location.column()),
        ),
        None => entry,
    }
}

/// Extract the message of a panic.
pub fn message_from_panic_info<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    match info.payload().downcast_ref::<&'static str>() {
        Some(s) => s,
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => &s[..],
            None => "Box<Any>",
        },
    }
}
