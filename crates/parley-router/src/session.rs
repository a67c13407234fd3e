//! Session credential access.
//!
//! The router only ever reads the session. Login and logout belong to the
//! views, which write through whatever [`KeyValueStore`] backs the session.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Key the chat client stores the signed-in user under.
pub const DEFAULT_SESSION_KEY: &str = "userId";

/// Opaque session credential. Only its presence matters to the guard.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
	/// Wraps a raw credential.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw credential.
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for SessionToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("SessionToken(<redacted>)")
	}
}

/// Read access to the current session credential.
///
/// Implementations must read fresh state on every call.
pub trait SessionStore: Send + Sync {
	/// Returns the current token, or `None` when signed out.
	fn get_token(&self) -> Option<SessionToken>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
	fn get_token(&self) -> Option<SessionToken> {
		(**self).get_token()
	}
}

/// Read side of a client-local key-value store.
pub trait KeyValueStore: Send + Sync {
	/// Returns the value stored under `key`.
	fn get_item(&self, key: &str) -> Option<String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
	fn get_item(&self, key: &str) -> Option<String> {
		(**self).get_item(key)
	}
}

/// In-memory key-value store.
///
/// Clones share the same data, so a view holding one clone can sign in
/// while the router reads through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a value.
	pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
		self.items.write().insert(key.into(), value.into());
	}

	/// Removes a value, returning it.
	pub fn remove_item(&self, key: &str) -> Option<String> {
		self.items.write().remove(key)
	}

	/// Removes every value.
	pub fn clear(&self) {
		self.items.write().clear();
	}
}

impl KeyValueStore for MemoryStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		self.items.read().get(key).cloned()
	}
}

/// Session read from a single key of a [`KeyValueStore`].
///
/// A missing or empty value means signed out.
#[derive(Debug, Clone)]
pub struct StorageSession<S> {
	storage: S,
	key: String,
}

impl<S: KeyValueStore> StorageSession<S> {
	/// Reads the session from [`DEFAULT_SESSION_KEY`].
	pub fn new(storage: S) -> Self {
		Self::with_key(storage, DEFAULT_SESSION_KEY)
	}

	/// Reads the session from a custom key.
	pub fn with_key(storage: S, key: impl Into<String>) -> Self {
		Self {
			storage,
			key: key.into(),
		}
	}

	/// Returns the key the token is read from.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the backing store.
	pub fn storage(&self) -> &S {
		&self.storage
	}
}

impl<S: KeyValueStore> SessionStore for StorageSession<S> {
	fn get_token(&self) -> Option<SessionToken> {
		self.storage
			.get_item(&self.key)
			.filter(|value| !value.is_empty())
			.map(SessionToken::new)
	}
}

/// `window.localStorage` as a [`KeyValueStore`].
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
impl KeyValueStore for LocalStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		let storage = web_sys::window()?.local_storage().ok()??;
		storage.get_item(key).ok()?
	}
}
