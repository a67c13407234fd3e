//! Decision table tests for guarded navigation.
//!
//! | Target          | Token | Committed | Outcome          |
//! |-----------------|-------|-----------|------------------|
//! | `/`             | -     | login     | Committed        |
//! | `/`             | yes   | login     | Committed        |
//! | `/chats`        | -     | login     | GuardRedirected  |
//! | `/chats`        | yes   | chats     | Committed        |
//! | `/messages/42`  | -     | login     | GuardRedirected  |
//! | `/messages/42`  | yes   | messages  | Committed        |
//! | `/unknown/path` | -     | login     | Committed (fallback) |
//! | `/unknown/path` | yes   | login     | Committed (fallback) |

use parley_router::{
	DEFAULT_SESSION_KEY, History, MemoryHistory, MemoryStorage, NavigationOutcome, RouteDef,
	RouteTable, Router, StorageSession,
};
use proptest::prelude::*;
use rstest::*;
use std::sync::Arc;

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

fn router_with(token: Option<&str>) -> (Router, Arc<MemoryHistory>) {
	let storage = MemoryStorage::new();
	if let Some(token) = token {
		storage.set_item(DEFAULT_SESSION_KEY, token);
	}
	let history = Arc::new(MemoryHistory::new());
	let router = Router::builder(scenario_table())
		.session(StorageSession::new(storage))
		.history(Arc::clone(&history))
		.build()
		.expect("router builds");
	(router, history)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
	Committed,
	GuardRedirected,
	Fallback,
}

/// Test: guard decision table over the chat scenario routes.
#[rstest]
#[case("/", None, "login", Kind::Committed)]
#[case("/", Some("u-1"), "login", Kind::Committed)]
#[case("/chats", None, "login", Kind::GuardRedirected)]
#[case("/chats", Some("u-1"), "chats", Kind::Committed)]
#[case("/messages/42", None, "login", Kind::GuardRedirected)]
#[case("/messages/42", Some("u-1"), "messages", Kind::Committed)]
#[case("/unknown/path", None, "login", Kind::Fallback)]
#[case("/unknown/path", Some("u-1"), "login", Kind::Fallback)]
fn test_navigation_decision_table(
	#[case] target: &str,
	#[case] token: Option<&str>,
	#[case] expected_route: &str,
	#[case] expected_kind: Kind,
) {
	// Arrange
	let (router, history) = router_with(token);

	// Act
	let outcome = router.push(target).expect("navigation succeeds");

	// Assert
	let committed = outcome.committed().expect("something was committed");
	assert_eq!(committed.name(), expected_route);
	let kind = match &outcome {
		NavigationOutcome::GuardRedirected { .. } => Kind::GuardRedirected,
		NavigationOutcome::Committed(m) if m.fallback => Kind::Fallback,
		NavigationOutcome::Committed(_) => Kind::Committed,
		NavigationOutcome::Superseded { .. } => panic!("no concurrent attempt was started"),
	};
	assert_eq!(kind, expected_kind);
	assert_eq!(history.current_location(), committed.path);
}

/// Test: the matched param survives the commit.
#[rstest]
fn test_signed_in_message_thread_keeps_param() {
	let (router, _history) = router_with(Some("u-1"));

	let outcome = router.push("/messages/42").unwrap();

	let current = router.current_route().unwrap();
	assert_eq!(outcome.committed(), Some(&current));
	assert_eq!(current.param("id"), Some("42"));
	assert_eq!(current.view().map(|v| v.as_str()), Some("Messages"));
}

/// Test: nested children report their layout chain.
#[rstest]
fn test_child_route_lists_layout_chain() {
	let (router, _history) = router_with(Some("u-1"));

	router.push("/search").unwrap();

	assert_eq!(
		router.current_route().unwrap().matched,
		vec!["home".to_string(), "search".to_string()]
	);
}

proptest! {
	/// Unknown single-segment paths always fall back and end on login.
	#[test]
	fn prop_unknown_paths_fall_back_to_login(
		segment in "[a-z]{1,8}",
		token in proptest::option::of("[a-z0-9]{1,8}"),
	) {
		prop_assume!(!["home", "chats", "search", "my", "messages"].contains(&segment.as_str()));
		let (router, _history) = router_with(token.as_deref());

		let outcome = router.push(&format!("/{}/extra", segment)).unwrap();
		let committed = outcome.committed().unwrap();

		prop_assert_eq!(committed.name(), "login");
		prop_assert!(committed.fallback);
	}

	/// Resolving the same location twice gives the same match.
	#[test]
	fn prop_resolution_is_idempotent(path in "(/[a-z0-9]{1,6}){0,3}(\\?[a-z]=[0-9])?") {
		let table = scenario_table();

		prop_assert_eq!(table.resolve(&path), table.resolve(&path));
	}
}
