use std::env;

use airbrake_core::types::ProjectId;
use airbrake_core::{apply_defaults, NotifierOptions};

#[test]
fn test_credentials_from_environment() {
    env::set_var("AIRBRAKE_PROJECT_ID", " 9127 ");
    env::set_var("AIRBRAKE_PROJECT_KEY", "env-key");

    let options = apply_defaults(NotifierOptions::default());
    assert_eq!(options.project_id, ProjectId::new(9127));
    assert_eq!(options.project_key, "env-key");

    let options = apply_defaults(NotifierOptions::new(3, "explicit"));
    assert_eq!(options.project_id, ProjectId::new(3));
    assert_eq!(options.project_key, "explicit");

    env::set_var("AIRBRAKE_PROJECT_ID", "not-a-number");
    let options = apply_defaults(NotifierOptions::default());
    assert_eq!(options.project_id.value(), 0);
}
