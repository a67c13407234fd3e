//! # Parley
//!
//! Client-side navigation for the Parley chat client.
//!
//! Parley maps URL paths to views, supports nested layouts, and gates
//! every navigation behind a session check: signed-out users are sent to
//! the login route, which is the only route the guard never blocks.
//!
//! ## Crates
//!
//! - [`router`]: route table, history media, session stores, guards and
//!   the [`Router`] state machine
//! - [`conf`]: TOML/JSON settings that build a validated router
//!   (`conf` feature, on by default)
//! - [`app`]: the chat client's own route table
//!
//! ## Quick Example
//!
//! ```
//! use parley::prelude::*;
//!
//! let storage = MemoryStorage::new();
//! let router = parley::app::router(storage.clone()).unwrap();
//!
//! let outcome = router.push("/messages/42").unwrap();
//! assert!(matches!(outcome, NavigationOutcome::GuardRedirected { .. }));
//!
//! storage.set_item(DEFAULT_SESSION_KEY, "user-1");
//! let outcome = router.push("/messages/42").unwrap();
//! assert_eq!(outcome.committed().unwrap().param("id"), Some("42"));
//! ```

pub mod app;

pub use parley_router as router;

#[cfg(feature = "conf")]
pub use parley_conf as conf;

pub use parley_router::{
	ConfigurationError, NavigationOutcome, RouteDef, RouteMatch, RouteTable, Router,
	RouterError,
};

#[cfg(feature = "conf")]
pub use parley_conf::{RouterSettings, SettingsError};

/// Commonly used types.
pub mod prelude {
	pub use parley_router::{
		DEFAULT_SESSION_KEY, GuardDecision, History, HistoryMode, KeyValueStore, MemoryHistory,
		MemoryStorage, NavigationGuard, NavigationMode, NavigationOutcome, NavigationRequest,
		RouteDef, RouteMatch, RouteTable, Router, RouterError, SessionGuard, SessionStore,
		SessionToken, StorageSession,
	};

	#[cfg(feature = "conf")]
	pub use parley_conf::RouterSettings;
}
