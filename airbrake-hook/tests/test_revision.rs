use airbrake_core::test::{test_options, TestTransport};
use airbrake_hook::{AirbrakeHook, Entry, Hook, Level, REVISION_ENV_KEY};

// Runs in its own binary because it changes the process environment.
#[test]
fn test_revision_from_environment() {
    std::env::set_var(REVISION_ENV_KEY, "4f2d9e7c1b");

    let transport = TestTransport::new();
    let hook = AirbrakeHook::with_options(test_options(&transport), "production");
    hook.fire(&mut Entry::new(Level::Error, "deploy broke")).unwrap();

    let notices = transport.fetch_and_clear_notices();
    assert_eq!(notices[0].context_str("revision"), Some("4f2d9e7c1b"));

    std::env::remove_var(REVISION_ENV_KEY);

    let transport = TestTransport::new();
    let hook = AirbrakeHook::with_options(test_options(&transport), "production");
    hook.fire(&mut Entry::new(Level::Error, "deploy broke")).unwrap();

    let notices = transport.fetch_and_clear_notices();
    assert!(notices[0].context.get("revision").is_none());
}
