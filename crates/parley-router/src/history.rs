//! Location history media.
//!
//! [`History`] is the contract the router commits through. The medium
//! only changes how paths round-trip through the address bar:
//!
//! - [`MemoryHistory`] keeps entries in memory (tests, non-browser hosts).
//! - [`HashHistory`] stores `#/path` in an inner medium, so the app can be
//!   served as static files without server-side routing.
//! - `BrowserHistory` (wasm32 only) drives `window.location`.

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod browser;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use browser::BrowserHistory;

use crate::error::HistoryError;
use crate::listeners::{ListenerId, Listeners};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Callback invoked with the new location after an external change.
pub type LocationListener = Arc<dyn Fn(&str) + Send + Sync>;

/// How a navigation is written to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationMode {
	/// Add a new entry.
	Push,
	/// Overwrite the current entry.
	Replace,
}

/// Location medium selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	/// `#/path` in the URL fragment.
	#[default]
	Hash,
	/// Real URL path.
	Path,
	/// In-memory only.
	Memory,
}

/// Abstraction over the visible, addressable current location.
pub trait History: Send + Sync {
	/// Returns the current location.
	fn current_location(&self) -> String;

	/// Writes a new location. Does not notify change listeners.
	///
	/// # Errors
	///
	/// Returns a [`HistoryError`] if the medium rejects the write.
	fn navigate(&self, path: &str, mode: NavigationMode) -> Result<(), HistoryError>;

	/// Subscribes to location changes the router did not make (back,
	/// forward, edited address bar).
	fn on_change(&self, listener: LocationListener) -> ListenerId;

	/// Removes a listener. Returns whether it was registered.
	fn remove_listener(&self, id: ListenerId) -> bool;
}

impl<H: History + ?Sized> History for Arc<H> {
	fn current_location(&self) -> String {
		(**self).current_location()
	}

	fn navigate(&self, path: &str, mode: NavigationMode) -> Result<(), HistoryError> {
		(**self).navigate(path, mode)
	}

	fn on_change(&self, listener: LocationListener) -> ListenerId {
		(**self).on_change(listener)
	}

	fn remove_listener(&self, id: ListenerId) -> bool {
		(**self).remove_listener(id)
	}
}

#[derive(Debug)]
struct MemoryEntries {
	entries: Vec<String>,
	index: usize,
}

/// In-memory history stack.
///
/// `back`, `forward`, `go` and `visit` stand in for the user acting on the
/// browser and notify listeners; `navigate` is the router's own write and
/// does not.
pub struct MemoryHistory {
	state: Mutex<MemoryEntries>,
	listeners: Listeners<str>,
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("state", &*self.state.lock())
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHistory {
	/// Creates a history positioned at `/`.
	pub fn new() -> Self {
		Self::with_initial("/")
	}

	/// Creates a history positioned at `location`.
	pub fn with_initial(location: impl Into<String>) -> Self {
		Self {
			state: Mutex::new(MemoryEntries {
				entries: vec![location.into()],
				index: 0,
			}),
			listeners: Listeners::default(),
		}
	}

	/// Moves one entry back. Returns `false` at the first entry.
	pub fn back(&self) -> bool {
		self.go(-1)
	}

	/// Moves one entry forward. Returns `false` at the last entry.
	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Moves `delta` entries and notifies listeners. Out-of-range moves are
	/// ignored and return `false`.
	pub fn go(&self, delta: isize) -> bool {
		let location = {
			let mut state = self.state.lock();
			let Some(target) = state.index.checked_add_signed(delta) else {
				return false;
			};
			if delta == 0 || target >= state.entries.len() {
				return false;
			}
			state.index = target;
			state.entries[target].clone()
		};
		self.listeners.emit(&location);
		true
	}

	/// Pushes a location as if the user typed it, and notifies listeners.
	pub fn visit(&self, location: &str) {
		self.write(location, NavigationMode::Push);
		self.listeners.emit(location);
	}

	/// Returns a snapshot of all entries.
	pub fn entries(&self) -> Vec<String> {
		self.state.lock().entries.clone()
	}

	/// Returns the index of the current entry.
	pub fn index(&self) -> usize {
		self.state.lock().index
	}

	fn write(&self, location: &str, mode: NavigationMode) {
		let mut state = self.state.lock();
		let index = state.index;
		match mode {
			NavigationMode::Push => {
				state.entries.truncate(index + 1);
				state.entries.push(location.to_string());
				state.index += 1;
			}
			NavigationMode::Replace => {
				state.entries[index] = location.to_string();
			}
		}
	}
}

impl History for MemoryHistory {
	fn current_location(&self) -> String {
		let state = self.state.lock();
		state.entries[state.index].clone()
	}

	fn navigate(&self, path: &str, mode: NavigationMode) -> Result<(), HistoryError> {
		self.write(path, mode);
		Ok(())
	}

	fn on_change(&self, listener: LocationListener) -> ListenerId {
		self.listeners.add(listener)
	}

	fn remove_listener(&self, id: ListenerId) -> bool {
		self.listeners.remove(id)
	}
}

/// Stores locations as `#/path` fragments in an inner medium.
#[derive(Debug, Default)]
pub struct HashHistory<H> {
	inner: H,
}

impl<H: History> HashHistory<H> {
	/// Wraps a raw medium whose locations are fragments.
	pub fn new(inner: H) -> Self {
		Self { inner }
	}

	/// Returns the raw medium.
	pub fn inner(&self) -> &H {
		&self.inner
	}
}

/// Encodes a path as a fragment: `/chats` becomes `#/chats`.
pub fn to_fragment(path: &str) -> String {
	if path.starts_with('/') {
		format!("#{}", path)
	} else {
		format!("#/{}", path)
	}
}

/// Decodes a fragment into a path. An empty fragment is `/`.
pub fn from_fragment(fragment: &str) -> String {
	let path = fragment.strip_prefix('#').unwrap_or(fragment);
	if path.is_empty() {
		"/".to_string()
	} else if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	}
}

impl<H: History> History for HashHistory<H> {
	fn current_location(&self) -> String {
		from_fragment(&self.inner.current_location())
	}

	fn navigate(&self, path: &str, mode: NavigationMode) -> Result<(), HistoryError> {
		self.inner.navigate(&to_fragment(path), mode)
	}

	fn on_change(&self, listener: LocationListener) -> ListenerId {
		self.inner
			.on_change(Arc::new(move |fragment: &str| listener(&from_fragment(fragment))))
	}

	fn remove_listener(&self, id: ListenerId) -> bool {
		self.inner.remove_listener(id)
	}
}

/// Creates the history medium for `mode` in the browser.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub fn create_history(mode: HistoryMode) -> Arc<dyn History> {
	match mode {
		HistoryMode::Hash => Arc::new(HashHistory::new(BrowserHistory::hash())),
		HistoryMode::Path => Arc::new(BrowserHistory::path()),
		HistoryMode::Memory => Arc::new(MemoryHistory::new()),
	}
}

/// Creates the history medium for `mode`.
///
/// Outside the browser there is no address bar, so `Hash` stores fragments
/// in memory and `Path` behaves like `Memory`.
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub fn create_history(mode: HistoryMode) -> Arc<dyn History> {
	match mode {
		HistoryMode::Hash => Arc::new(HashHistory::new(MemoryHistory::with_initial("#/"))),
		HistoryMode::Path | HistoryMode::Memory => Arc::new(MemoryHistory::new()),
	}
}
