//! Integration tests for loading router settings from files.

use parley_conf::{RouterSettings, SettingsError};
use parley_router::{
	ConfigurationError, DEFAULT_SESSION_KEY, HistoryMode, MemoryStorage, RedirectTarget,
};
use rstest::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CHAT_ROUTES_TOML: &str = r#"
history = "memory"
session_key = "sessionId"

[[routes]]
name = "login"
path = "/"
view = "Login"

[[routes]]
name = "home"
path = "/home"
view = "Layout"
redirect = { path = "/chats" }

[[routes.children]]
name = "chats"
path = "/chats"
view = "Chats"

[[routes.children]]
name = "my"
path = "/my"
view = "My"

[[routes]]
name = "messages"
path = "/messages/:id"
view = "Messages"

[[routes]]
name = "not-found"
path = "/:catchAll(.*)"
redirect = { name = "login" }
"#;

/// Fixture providing temporary directory for settings files
#[fixture]
fn temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temporary directory")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
	let path = dir.path().join(name);
	fs::write(&path, content).expect("Failed to write settings file");
	path
}

#[rstest]
fn test_load_toml_file_and_build_router(temp_dir: TempDir) {
	// Arrange
	let path = write(&temp_dir, "router.toml", CHAT_ROUTES_TOML);
	let storage = MemoryStorage::new();

	// Act
	let settings = RouterSettings::from_path(&path).unwrap();
	let router = settings.build_router(storage.clone()).unwrap();

	// Assert
	assert_eq!(settings.history, HistoryMode::Memory);
	assert_eq!(
		settings.routes[1].redirect,
		Some(RedirectTarget::Path("/chats".to_string()))
	);
	assert_eq!(router.push("/my").unwrap().committed().unwrap().name(), "login");

	storage.set_item(DEFAULT_SESSION_KEY, "ignored");
	assert_eq!(router.push("/my").unwrap().committed().unwrap().name(), "login");

	storage.set_item("sessionId", "u-1");
	let outcome = router.push("/home").unwrap();
	let committed = outcome.committed().unwrap();
	assert_eq!(committed.name(), "chats");
	assert_eq!(committed.redirected_from.as_deref(), Some("home"));
}

#[rstest]
fn test_load_json_file(temp_dir: TempDir) {
	// Arrange
	let path = write(
		&temp_dir,
		"router.json",
		r#"{
			"login_route": "sign-in",
			"routes": [
				{ "name": "sign-in", "path": "/", "view": "Login" },
				{ "name": "fallback", "path": "/*", "view": "NotFound" }
			]
		}"#,
	);

	// Act
	let settings = RouterSettings::from_path(&path).unwrap();
	let router = settings.build_router(MemoryStorage::new()).unwrap();

	// Assert
	assert_eq!(settings.history, HistoryMode::Hash);
	assert_eq!(router.login_route(), "sign-in");
	let outcome = router.push("/missing").unwrap();
	assert_eq!(outcome.committed().unwrap().name(), "sign-in");
}

#[rstest]
#[case("router.yaml")]
#[case("router")]
fn test_unsupported_extension(temp_dir: TempDir, #[case] name: &str) {
	let path = write(&temp_dir, name, "history = \"hash\"");

	let result = RouterSettings::from_path(&path);

	assert!(matches!(result, Err(SettingsError::UnsupportedFormat(p)) if p == path));
}

#[rstest]
fn test_missing_file_is_io_error(temp_dir: TempDir) {
	let result = RouterSettings::from_path(temp_dir.path().join("absent.toml"));

	assert!(matches!(result, Err(SettingsError::Io(_))));
}

#[rstest]
fn test_malformed_toml(temp_dir: TempDir) {
	let path = write(&temp_dir, "router.toml", "[[routes]\nname = ");

	let result = RouterSettings::from_path(&path);

	assert!(matches!(result, Err(SettingsError::Toml(_))));
}

#[rstest]
#[case(
	r#"{ "routes": [ { "name": "login", "path": "/", "view": "Login" } ] }"#,
	ConfigurationError::MissingCatchAll
)]
#[case(
	r#"{ "routes": [
		{ "name": "login", "path": "/", "view": "Login" },
		{ "name": "login", "path": "/again", "view": "Login" },
		{ "name": "fallback", "path": "/*", "view": "NotFound" }
	] }"#,
	ConfigurationError::DuplicateName("login".to_string())
)]
#[case(
	r#"{ "login_route": "sign-in", "routes": [
		{ "name": "login", "path": "/", "view": "Login" },
		{ "name": "fallback", "path": "/*", "view": "NotFound" }
	] }"#,
	ConfigurationError::MissingLoginRoute("sign-in".to_string())
)]
#[case(
	r#"{ "routes": [
		{ "name": "login", "path": "/", "view": "Login" },
		{ "name": "files", "path": "/files/*", "view": "Files" }
	] }"#,
	ConfigurationError::CatchAllNotUniversal {
		route: "files".to_string(),
		pattern: "/files/*".to_string(),
	}
)]
#[case(
	r#"{ "login_route": "sign-in", "routes": [
		{ "name": "login", "path": "/", "view": "Landing" },
		{ "name": "sign-in", "path": "/sign-in/:tenant", "view": "Login" },
		{ "name": "fallback", "path": "/*", "view": "NotFound" }
	] }"#,
	ConfigurationError::LoginRouteNeedsParams {
		route: "sign-in".to_string(),
		param: "tenant".to_string(),
	}
)]
fn test_invalid_route_settings(#[case] json: &str, #[case] expected: ConfigurationError) {
	let settings = RouterSettings::from_json_str(json).unwrap();

	let result = settings.build_router(MemoryStorage::new());

	match result {
		Err(SettingsError::Configuration(err)) => assert_eq!(err, expected),
		other => panic!("expected a configuration error, got {:?}", other),
	}
}
