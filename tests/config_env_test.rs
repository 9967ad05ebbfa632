//! GISTY_* environment overrides.
//!
//! Kept to a single test: env vars are shared by every thread of the binary,
//! so valid and malformed overrides run in sequence here.

use std::fs;

use tempfile::TempDir;

use gisty::application::ApplicationError;
use gisty::config::Settings;
use gisty::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_env_vars_when_load_then_override_config_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gisty.toml");
    fs::write(&path, "list_limit = 5\ngh_command = \"gh-from-file\"\n").unwrap();

    std::env::set_var("GISTY_LIST_LIMIT", "77");
    std::env::set_var("GISTY_ANNOTATE_ERRORS", "false");

    // Act
    let settings = Settings::load(Some(&path));

    std::env::remove_var("GISTY_LIST_LIMIT");
    std::env::remove_var("GISTY_ANNOTATE_ERRORS");

    // Assert
    let settings = settings.expect("load settings");
    assert_eq!(settings.list_limit, 77, "env beats file");
    assert!(!settings.annotate_errors);
    assert_eq!(settings.gh_command, "gh-from-file", "file beats defaults");

    // A malformed override is reported instead of falling back to the file value
    std::env::set_var("GISTY_LIST_LIMIT", "many");
    let result = Settings::load(Some(&path));
    std::env::remove_var("GISTY_LIST_LIMIT");

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("GISTY_LIST_LIMIT"), "got: {message}");
        }
        other => panic!("expected config error, got {other:?}"),
    }
}
