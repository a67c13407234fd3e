//! Declarative router settings.

use crate::error::SettingsResult;
use crate::sources::{SettingsFormat, load_file};
use parley_router::{
	DEFAULT_LOGIN_ROUTE, DEFAULT_SESSION_KEY, HistoryMode, KeyValueStore, RouteDef, RouteTable,
	Router, StorageSession, create_history,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to build a [`Router`] except the storage backend.
///
/// ```toml
/// history = "hash"
/// session_key = "userId"
/// login_route = "login"
///
/// [[routes]]
/// name = "login"
/// path = "/"
/// view = "Login"
///
/// [[routes]]
/// name = "not-found"
/// path = "/:catchAll(.*)"
/// redirect = { name = "login" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
	/// Location medium.
	#[serde(default)]
	pub history: HistoryMode,
	/// Storage key holding the session credential.
	#[serde(default = "default_session_key")]
	pub session_key: String,
	/// Guard-exempt route signed-out users are sent to.
	#[serde(default = "default_login_route")]
	pub login_route: String,
	/// Route tree.
	#[serde(default)]
	pub routes: Vec<RouteDef>,
}

fn default_session_key() -> String {
	DEFAULT_SESSION_KEY.to_string()
}

fn default_login_route() -> String {
	DEFAULT_LOGIN_ROUTE.to_string()
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			history: HistoryMode::default(),
			session_key: default_session_key(),
			login_route: default_login_route(),
			routes: Vec::new(),
		}
	}
}

impl RouterSettings {
	/// Creates settings with defaults and the given routes.
	pub fn with_routes(routes: impl IntoIterator<Item = RouteDef>) -> Self {
		Self {
			routes: routes.into_iter().collect(),
			..Self::default()
		}
	}

	/// Parses a TOML document.
	pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
		SettingsFormat::Toml.parse(content)
	}

	/// Parses a JSON document.
	pub fn from_json_str(content: &str) -> SettingsResult<Self> {
		SettingsFormat::Json.parse(content)
	}

	/// Loads a `.toml` or `.json` file.
	pub fn from_path(path: impl AsRef<Path>) -> SettingsResult<Self> {
		load_file(path)
	}

	/// Validates the route tree.
	///
	/// # Errors
	///
	/// Any [`ConfigurationError`](parley_router::ConfigurationError) the
	/// table raises.
	pub fn build_table(&self) -> SettingsResult<RouteTable> {
		Ok(RouteTable::register(self.routes.iter().cloned())?)
	}

	/// Builds a router reading the session from `storage`.
	///
	/// An empty `session_key` falls back to the default key.
	///
	/// # Errors
	///
	/// Any configuration error from the table or the router builder.
	pub fn build_router<S>(&self, storage: S) -> SettingsResult<Router>
	where
		S: KeyValueStore + 'static,
	{
		let key = if self.session_key.is_empty() {
			tracing::warn!(
				fallback = DEFAULT_SESSION_KEY,
				"empty session_key in router settings, using the default"
			);
			DEFAULT_SESSION_KEY
		} else {
			self.session_key.as_str()
		};

		let router = Router::builder(self.build_table()?)
			.shared_history(create_history(self.history))
			.session(StorageSession::with_key(storage, key))
			.login_route(self.login_route.clone())
			.build()?;

		tracing::debug!(
			routes = router.table().len(),
			history = ?self.history,
			login_route = %self.login_route,
			"router built from settings"
		);
		Ok(router)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parley_router::{MemoryStorage, RedirectTarget};
	use rstest::rstest;

	const MINIMAL: &str = r#"
[[routes]]
name = "login"
path = "/"
view = "Login"

[[routes]]
name = "not-found"
path = "/*"
redirect = { name = "login" }
"#;

	#[rstest]
	fn test_defaults_apply_to_missing_fields() {
		let settings = RouterSettings::from_toml_str(MINIMAL).unwrap();

		assert_eq!(settings.history, HistoryMode::Hash);
		assert_eq!(settings.session_key, "userId");
		assert_eq!(settings.login_route, "login");
		assert_eq!(settings.routes.len(), 2);
		assert_eq!(
			settings.routes[1].redirect,
			Some(RedirectTarget::Name("login".to_string()))
		);
	}

	#[rstest]
	fn test_empty_session_key_falls_back_to_default() {
		// Arrange
		let mut settings = RouterSettings::from_toml_str(MINIMAL).unwrap();
		settings.session_key = String::new();
		settings.routes.push(RouteDef::new("chats", "/chats").view("Chats"));
		let storage = MemoryStorage::new();
		storage.set_item(DEFAULT_SESSION_KEY, "u-1");

		// Act
		let router = settings.build_router(storage).unwrap();

		// Assert
		let outcome = router.push("/chats").unwrap();
		assert_eq!(outcome.committed().unwrap().name(), "chats");
	}
}
