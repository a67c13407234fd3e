//! End-to-end navigation through the chat client's routes.

use parley::app;
use parley::prelude::*;
use rstest::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chat table without the `home` redirect, so `/home` renders the layout.
fn scenario_table() -> RouteTable {
	RouteTable::register([
		RouteDef::new("login", "/").view("Login"),
		RouteDef::new("home", "/home").view("Layout").children([
			RouteDef::new("chats", "/chats").view("Chats"),
			RouteDef::new("search", "/search").view("Search"),
			RouteDef::new("my", "/my").view("My"),
		]),
		RouteDef::new("messages", "/messages/:id").view("Messages"),
		RouteDef::new("not-found", "/:catchAll(.*)").redirect_to("login"),
	])
	.expect("scenario table is valid")
}

struct Client {
	router: Arc<Router>,
	storage: MemoryStorage,
	history: Arc<MemoryHistory>,
}

#[fixture]
fn client() -> Client {
	let storage = MemoryStorage::new();
	let history = Arc::new(MemoryHistory::new());
	let router = Router::builder(scenario_table())
		.session(StorageSession::new(storage.clone()))
		.history(Arc::clone(&history))
		.build()
		.expect("router builds");
	Client {
		router: Arc::new(router),
		storage,
		history,
	}
}

#[rstest]
fn test_unknown_path_without_token_lands_on_login(client: Client) {
	let outcome = client.router.push("/unknown/path").unwrap();

	let committed = outcome.committed().unwrap();
	assert_eq!(committed.name(), "login");
	assert!(committed.fallback);
	assert_eq!(committed.redirected_from.as_deref(), Some("not-found"));
}

#[rstest]
fn test_message_thread_with_token(client: Client) {
	client.storage.set_item(DEFAULT_SESSION_KEY, "u-1");

	let outcome = client.router.push("/messages/42").unwrap();

	assert!(matches!(outcome, NavigationOutcome::Committed(_)));
	let committed = outcome.committed().unwrap();
	assert_eq!(committed.name(), "messages");
	assert_eq!(committed.param("id"), Some("42"));
}

#[rstest]
fn test_chats_without_token_redirects_to_login(client: Client) {
	let outcome = client.router.push("/chats").unwrap();

	match outcome {
		NavigationOutcome::GuardRedirected {
			requested,
			committed,
		} => {
			assert_eq!(requested.name(), "chats");
			assert_eq!(committed.name(), "login");
			assert!(!committed.fallback);
		}
		other => panic!("expected a guard redirect, got {:?}", other),
	}
}

#[rstest]
fn test_sign_in_then_sign_out_session(client: Client) {
	// Arrange
	let redirects = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&redirects);
	client.router.on_guard_redirect(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});
	client.router.start().unwrap();

	// Act
	client.storage.set_item(DEFAULT_SESSION_KEY, "u-1");
	client.router.push("/chats").unwrap();
	client.router.push("/my").unwrap();
	client.storage.remove_item(DEFAULT_SESSION_KEY);
	client.history.back();

	// Assert
	assert_eq!(client.router.current_route().unwrap().name(), "login");
	assert_eq!(redirects.load(Ordering::SeqCst), 1);
	assert_eq!(client.history.entries(), vec!["/", "/", "/my"]);
}

#[rstest]
fn test_query_survives_commit(client: Client) {
	client.storage.set_item(DEFAULT_SESSION_KEY, "u-1");

	let outcome = client.router.push("/search?q=rust").unwrap();

	let committed = outcome.committed().unwrap();
	assert_eq!(committed.name(), "search");
	assert_eq!(committed.query.as_deref(), Some("q=rust"));
	assert_eq!(client.history.current_location(), "/search?q=rust");
}

#[rstest]
fn test_app_router_over_hash_history() {
	// Arrange
	let storage = MemoryStorage::new();
	let router = app::router(storage.clone()).unwrap();

	// Act
	let signed_out = router.push("/home").unwrap();
	storage.set_item(DEFAULT_SESSION_KEY, "u-1");
	let signed_in = router.push("/home").unwrap();

	// Assert
	assert_eq!(signed_out.committed().unwrap().name(), app::LOGIN_ROUTE);
	assert_eq!(signed_in.committed().unwrap().name(), "chats");
	assert_eq!(
		signed_in.committed().unwrap().view().map(|v| v.as_str()),
		Some(app::views::CHATS)
	);
}

#[cfg(feature = "conf")]
#[rstest]
fn test_settings_build_the_same_table_as_the_app() {
	let settings = RouterSettings::with_routes(app::routes());

	let table = settings.build_table().unwrap();

	assert_eq!(table.len(), app::route_table().unwrap().len());
	assert_eq!(
		table.resolve("/messages/9"),
		app::route_table().unwrap().resolve("/messages/9")
	);
}
