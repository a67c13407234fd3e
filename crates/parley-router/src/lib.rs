//! Client-side router with a session guard.
//!
//! A [`RouteTable`] maps URL paths (static segments, `:params` and one
//! catch-all) to named routes. The [`Router`] resolves each navigation,
//! runs a [`NavigationGuard`] with a freshly read [`SessionToken`], and
//! commits the result to a [`History`] medium. Signed-out users are sent to
//! the login route; the login route itself is never guarded.
//!
//! ## Example
//!
//! ```
//! use parley_router::{
//! 	MemoryStorage, RouteDef, RouteTable, Router, StorageSession, DEFAULT_SESSION_KEY,
//! };
//!
//! let table = RouteTable::register([
//! 	RouteDef::new("login", "/").view("Login"),
//! 	RouteDef::new("chats", "/chats").view("Chats"),
//! 	RouteDef::new("not-found", "/:catchAll(.*)").redirect_to("login"),
//! ])
//! .unwrap();
//!
//! let storage = MemoryStorage::new();
//! let router = Router::builder(table)
//! 	.session(StorageSession::new(storage.clone()))
//! 	.build()
//! 	.unwrap();
//!
//! let outcome = router.push("/chats").unwrap();
//! assert_eq!(outcome.committed().unwrap().name(), "login");
//!
//! storage.set_item(DEFAULT_SESSION_KEY, "user-1");
//! let outcome = router.push("/chats").unwrap();
//! assert_eq!(outcome.committed().unwrap().name(), "chats");
//! ```

pub mod error;
pub mod guard;
pub mod history;
mod listeners;
pub mod pattern;
pub mod route;
pub mod router;
pub mod session;
pub mod table;

pub use error::{ConfigResult, ConfigurationError, HistoryError, RouterError, RouterResult};
pub use guard::{GuardDecision, NavigationGuard, SessionGuard};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use history::BrowserHistory;
pub use history::{
	HashHistory, History, HistoryMode, LocationListener, MemoryHistory, NavigationMode,
	create_history,
};
pub use listeners::ListenerId;
pub use pattern::PathPattern;
pub use route::{RedirectTarget, RouteDef, RouteMatch, RouteNode, ViewHandle};
pub use router::{
	DEFAULT_LOGIN_ROUTE, GuardRedirect, MAX_GUARD_REDIRECTS, NavigationOutcome,
	NavigationRequest, PendingNavigation, Router, RouterBuilder, RouterState, StaleDecision,
	Ticket,
};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use session::LocalStorage;
pub use session::{
	DEFAULT_SESSION_KEY, KeyValueStore, MemoryStorage, SessionStore, SessionToken,
	StorageSession,
};
pub use table::{RouteTable, RouteTableBuilder};
