use std::sync::Arc;

use airbrake_core::test::{test_options, TestTransport};
use airbrake_hook::{register_panic_hook, AirbrakeHook, Hooks};

#[test]
fn test_panic_is_reported() {
    let transport = TestTransport::new();
    let mut hooks = Hooks::new();
    hooks.add(Arc::new(AirbrakeHook::with_options(
        test_options(&transport),
        "production",
    )));
    register_panic_hook(hooks.clone());
    // only the first registration installs a hook
    register_panic_hook(hooks);

    let result = std::panic::catch_unwind(|| {
        panic!("kaboom {}", 7);
    });
    assert!(result.is_err());

    let notices = transport.fetch_and_clear_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].errors[0].ty, "MessageError");
    assert_eq!(notices[0].errors[0].message, "kaboom 7");
    assert!(notices[0]
        .context_str("location")
        .unwrap()
        .contains("test_panic.rs"));
}
