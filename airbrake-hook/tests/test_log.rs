use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use airbrake_core::test::{test_options, TestTransport};
use airbrake_hook::{AirbrakeHook, AirbrakeLogger, Hooks};

static FORWARDED: AtomicUsize = AtomicUsize::new(0);

struct CountingLogger;

impl log::Log for CountingLogger {
    fn enabled(&self, md: &log::Metadata<'_>) -> bool {
        md.level() <= log::Level::Info
    }

    fn log(&self, _record: &log::Record<'_>) {
        FORWARDED.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}
}

#[test]
fn test_log() {
    let transport = TestTransport::new();
    let mut hooks = Hooks::new();
    hooks.add(Arc::new(AirbrakeHook::with_options(
        test_options(&transport),
        "production",
    )));

    let logger = AirbrakeLogger::new(hooks).with_dest_log(CountingLogger);
    assert_eq!(logger.max_level(), log::LevelFilter::Error);

    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(log::LevelFilter::Info))
        .unwrap();

    log::info!(user_id = 42; "Hello World!");
    log::warn!("almost out of disk");
    log::error!(user_id = 42, retry = true; "payment failed");

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such table");
    log::error!(error:err = err; "query failed");

    let notices = transport.fetch_and_clear_notices();
    assert_eq!(notices.len(), 2);

    assert_eq!(notices[0].errors[0].ty, "MessageError");
    assert_eq!(notices[0].errors[0].message, "payment failed");
    assert_eq!(notices[0].context_str("user_id"), Some("42"));
    assert_eq!(notices[0].context_str("retry"), Some("true"));
    assert_eq!(notices[0].context_str("environment"), Some("production"));
    let top = &notices[0].errors[0].backtrace[0].function;
    assert!(top.starts_with("test_log::test_log"), "{}", top);

    assert_eq!(notices[1].errors[0].ty, "Custom");
    assert_eq!(notices[1].errors[0].message, "no such table");
    assert_eq!(notices[1].context_str("error"), Some("no such table"));

    assert_eq!(FORWARDED.load(Ordering::SeqCst), 4);
}
