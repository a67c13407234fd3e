//! Route table of the Parley chat client.
//!
//! | Name        | Path             | View       | Notes                     |
//! |-------------|------------------|------------|---------------------------|
//! | `login`     | `/`              | `Login`    | guard-exempt              |
//! | `home`      | `/home`          | `Layout`   | redirects to `/chats`     |
//! | `chats`     | `/chats`         | `Chats`    | child of `home`           |
//! | `search`    | `/search`        | `Search`   | child of `home`           |
//! | `my`        | `/my`            | `My`       | child of `home`           |
//! | `messages`  | `/messages/:id`  | `Messages` |                           |
//! | `not-found` | `/:catchAll(.*)` |            | redirects to `login`      |

use parley_router::{
	ConfigResult, HistoryMode, KeyValueStore, RouteDef, RouteTable, Router, StorageSession,
	create_history,
};

/// Guard-exempt login route.
pub const LOGIN_ROUTE: &str = "login";

/// View identifiers rendered by the client.
pub mod views {
	/// Sign-in form.
	pub const LOGIN: &str = "Login";
	/// Shell around the tabbed home pages.
	pub const LAYOUT: &str = "Layout";
	/// Conversation list.
	pub const CHATS: &str = "Chats";
	/// User and message search.
	pub const SEARCH: &str = "Search";
	/// Profile page.
	pub const MY: &str = "My";
	/// A single conversation.
	pub const MESSAGES: &str = "Messages";
}

/// Returns the chat client's route definitions.
pub fn routes() -> Vec<RouteDef> {
	vec![
		RouteDef::new(LOGIN_ROUTE, "/").view(views::LOGIN),
		RouteDef::new("home", "/home")
			.view(views::LAYOUT)
			.redirect_to_path("/chats")
			.children([
				RouteDef::new("chats", "/chats").view(views::CHATS),
				RouteDef::new("search", "/search").view(views::SEARCH),
				RouteDef::new("my", "/my").view(views::MY),
			]),
		RouteDef::new("messages", "/messages/:id").view(views::MESSAGES),
		RouteDef::new("not-found", "/:catchAll(.*)").redirect_to(LOGIN_ROUTE),
	]
}

/// Builds and validates the chat client's route table.
pub fn route_table() -> ConfigResult<RouteTable> {
	RouteTable::register(routes())
}

/// Builds the chat client's router over hash history, reading the session
/// credential from `storage` under the default key.
pub fn router<S>(storage: S) -> ConfigResult<Router>
where
	S: KeyValueStore + 'static,
{
	Router::builder(route_table()?)
		.shared_history(create_history(HistoryMode::Hash))
		.session(StorageSession::new(storage))
		.login_route(LOGIN_ROUTE)
		.build()
}
