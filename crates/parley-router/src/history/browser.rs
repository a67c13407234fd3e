//! `window.location` backed history for WASM targets.

use super::{History, LocationListener, NavigationMode};
use crate::error::HistoryError;
use crate::listeners::{ListenerId, Listeners};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Medium {
	Hash,
	Path,
}

impl Medium {
	fn event_name(self) -> &'static str {
		match self {
			Self::Hash => "hashchange",
			Self::Path => "popstate",
		}
	}
}

/// Browser address bar as a raw history medium.
///
/// The hash medium reads and writes the raw fragment (`#/chats`) and is
/// meant to be wrapped in [`HashHistory`](super::HashHistory). The path
/// medium reads and writes `pathname + search`.
pub struct BrowserHistory {
	medium: Medium,
	listeners: Arc<Listeners<str>>,
	installed: AtomicBool,
}

impl std::fmt::Debug for BrowserHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BrowserHistory")
			.field("medium", &self.medium)
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

impl BrowserHistory {
	/// Reads and writes `location.hash`.
	pub fn hash() -> Self {
		Self::with_medium(Medium::Hash)
	}

	/// Reads and writes `location.pathname`.
	pub fn path() -> Self {
		Self::with_medium(Medium::Path)
	}

	fn with_medium(medium: Medium) -> Self {
		Self {
			medium,
			listeners: Arc::new(Listeners::default()),
			installed: AtomicBool::new(false),
		}
	}

	fn window() -> Result<web_sys::Window, HistoryError> {
		web_sys::window().ok_or_else(|| HistoryError::Unavailable("window".to_string()))
	}

	fn read(medium: Medium) -> Option<String> {
		let location = web_sys::window()?.location();
		match medium {
			Medium::Hash => location.hash().ok(),
			Medium::Path => {
				let path = location.pathname().ok()?;
				let search = location.search().unwrap_or_default();
				Some(format!("{}{}", path, search))
			}
		}
	}

	/// Installs the DOM listener once; it lives for the rest of the page.
	fn install(&self) {
		if self.installed.swap(true, Ordering::SeqCst) {
			return;
		}
		let Ok(window) = Self::window() else {
			self.installed.store(false, Ordering::SeqCst);
			return;
		};

		let medium = self.medium;
		let listeners = Arc::clone(&self.listeners);
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
			if let Some(location) = Self::read(medium) {
				listeners.emit(&location);
			}
		});

		if window
			.add_event_listener_with_callback(medium.event_name(), closure.as_ref().unchecked_ref())
			.is_ok()
		{
			closure.forget();
		} else {
			self.installed.store(false, Ordering::SeqCst);
		}
	}
}

impl History for BrowserHistory {
	fn current_location(&self) -> String {
		Self::read(self.medium).unwrap_or_default()
	}

	fn navigate(&self, path: &str, mode: NavigationMode) -> Result<(), HistoryError> {
		let history = Self::window()?
			.history()
			.map_err(|e| HistoryError::Unavailable(format!("{:?}", e)))?;

		// pushState/replaceState fire neither popstate nor hashchange.
		let result = match mode {
			NavigationMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
			NavigationMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
		};
		result.map_err(|e| HistoryError::NavigationFailed(format!("{:?}", e)))
	}

	fn on_change(&self, listener: LocationListener) -> ListenerId {
		self.install();
		self.listeners.add(listener)
	}

	fn remove_listener(&self, id: ListenerId) -> bool {
		self.listeners.remove(id)
	}
}
