//! Navigation orchestration.
//!
//! The [`Router`] resolves a request against the [`RouteTable`], asks the
//! [`NavigationGuard`] about it with a freshly read session token, and
//! either commits the result to [`History`] or redirects to the login
//! route first.
//!
//! ```text
//! Idle -> Resolving -> Deciding -> Committing -> Idle
//!                         |
//!                         +-> Redirecting -> Resolving (once)
//! ```
//!
//! Every attempt takes a [`Ticket`]. Only the newest ticket may commit; an
//! older decision is reported to stale-decision listeners and discarded.

use crate::error::{ConfigurationError, RouterError, RouterResult};
use crate::guard::{GuardDecision, NavigationGuard, SessionGuard};
use crate::history::{History, MemoryHistory, NavigationMode};
use crate::listeners::{ListenerId, Listeners};
use crate::route::RouteMatch;
use crate::session::SessionStore;
use crate::table::RouteTable;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Guard redirects allowed per navigation attempt.
pub const MAX_GUARD_REDIRECTS: usize = 1;

/// Default name of the guard-exempt login route.
pub const DEFAULT_LOGIN_ROUTE: &str = "login";

/// A single navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
	/// Navigate to a location.
	Path {
		/// Target location, query allowed.
		path: String,
		/// How to write it to history.
		mode: NavigationMode,
	},
	/// Navigate to a named route.
	Name {
		/// Route name.
		name: String,
		/// Path parameters.
		params: HashMap<String, String>,
		/// How to write it to history.
		mode: NavigationMode,
	},
}

impl NavigationRequest {
	/// Pushes a location.
	pub fn push(path: impl Into<String>) -> Self {
		Self::Path {
			path: path.into(),
			mode: NavigationMode::Push,
		}
	}

	/// Replaces the current location.
	pub fn replace(path: impl Into<String>) -> Self {
		Self::Path {
			path: path.into(),
			mode: NavigationMode::Replace,
		}
	}

	/// Pushes a named route.
	pub fn named(name: impl Into<String>, params: HashMap<String, String>) -> Self {
		Self::Name {
			name: name.into(),
			params,
			mode: NavigationMode::Push,
		}
	}

	/// Returns the history write mode.
	pub fn mode(&self) -> NavigationMode {
		match self {
			Self::Path { mode, .. } | Self::Name { mode, .. } => *mode,
		}
	}

	fn describe(&self) -> String {
		match self {
			Self::Path { path, .. } => path.clone(),
			Self::Name { name, .. } => format!("<{}>", name),
		}
	}
}

/// Router state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterState {
	/// No attempt in flight.
	Idle,
	/// Matching the request against the table.
	Resolving,
	/// Running the guard, or holding a decision not yet committed.
	Deciding,
	/// The guard redirected; about to resolve the login route.
	Redirecting,
	/// Writing to history.
	Committing,
}

/// Monotonically increasing id of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
	/// Returns the raw sequence number.
	pub fn get(self) -> u64 {
		self.0
	}
}

/// A decided navigation waiting to be committed.
#[derive(Debug, Clone)]
pub struct PendingNavigation {
	ticket: Ticket,
	requested: RouteMatch,
	target: RouteMatch,
	mode: NavigationMode,
	guard_redirected: bool,
}

impl PendingNavigation {
	/// Returns the attempt's ticket.
	pub fn ticket(&self) -> Ticket {
		self.ticket
	}

	/// Returns the route the request resolved to.
	pub fn requested(&self) -> &RouteMatch {
		&self.requested
	}

	/// Returns the route that will be committed.
	pub fn target(&self) -> &RouteMatch {
		&self.target
	}

	/// Returns whether the guard redirected this attempt.
	pub fn is_guard_redirect(&self) -> bool {
		self.guard_redirected
	}
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The requested route was committed.
	Committed(RouteMatch),
	/// The guard sent the attempt to another route, which was committed.
	GuardRedirected {
		/// Where the request resolved.
		requested: RouteMatch,
		/// What was committed instead.
		committed: RouteMatch,
	},
	/// A newer attempt started first; nothing was committed.
	Superseded {
		/// This attempt's ticket.
		ticket: Ticket,
		/// The newest ticket at commit time.
		latest: Ticket,
	},
}

impl NavigationOutcome {
	/// Returns the committed route, if any.
	pub fn committed(&self) -> Option<&RouteMatch> {
		match self {
			Self::Committed(route) | Self::GuardRedirected { committed: route, .. } => Some(route),
			Self::Superseded { .. } => None,
		}
	}
}

/// Sent to listeners when the guard redirects a committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRedirect {
	/// Where the request resolved.
	pub requested: RouteMatch,
	/// Name of the route committed instead.
	pub to: String,
}

/// Sent to listeners when a superseded decision is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleDecision {
	/// The discarded attempt.
	pub ticket: Ticket,
	/// The newest ticket at the time.
	pub latest: Ticket,
	/// What the discarded attempt would have committed.
	pub target: RouteMatch,
}

/// Client-side router with a session guard.
pub struct Router {
	table: Arc<RouteTable>,
	history: Arc<dyn History>,
	session: Arc<dyn SessionStore>,
	guard: Arc<dyn NavigationGuard>,
	login_route: String,
	state: Mutex<RouterState>,
	latest: AtomicU64,
	current: RwLock<Option<RouteMatch>>,
	redirect_listeners: Listeners<GuardRedirect>,
	stale_listeners: Listeners<StaleDecision>,
	history_subscription: Mutex<Option<ListenerId>>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.table.len())
			.field("login_route", &self.login_route)
			.field("state", &*self.state.lock())
			.field(
				"current",
				&self.current.read().as_ref().map(|m| m.path.clone()),
			)
			.finish()
	}
}

impl Router {
	/// Creates a builder over a validated table.
	pub fn builder(table: RouteTable) -> RouterBuilder {
		RouterBuilder::new(table)
	}

	/// Returns the route table.
	pub fn table(&self) -> &RouteTable {
		&self.table
	}

	/// Returns the guard-exempt login route name.
	pub fn login_route(&self) -> &str {
		&self.login_route
	}

	/// Returns the current state machine position.
	pub fn state(&self) -> RouterState {
		*self.state.lock()
	}

	/// Returns the last committed route.
	pub fn current_route(&self) -> Option<RouteMatch> {
		self.current.read().clone()
	}

	/// Returns the newest ticket handed out.
	pub fn latest_ticket(&self) -> Ticket {
		Ticket(self.latest.load(Ordering::SeqCst))
	}

	/// Navigates to a named route, pushing a history entry.
	///
	/// # Errors
	///
	/// See [`Router::navigate`].
	pub fn navigate_to(
		&self,
		name: &str,
		params: &[(&str, &str)],
	) -> RouterResult<NavigationOutcome> {
		let params = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		self.navigate(NavigationRequest::named(name, params))
	}

	/// Navigates to a location, pushing a history entry.
	///
	/// # Errors
	///
	/// See [`Router::navigate`].
	pub fn push(&self, path: &str) -> RouterResult<NavigationOutcome> {
		self.navigate(NavigationRequest::push(path))
	}

	/// Navigates to a location, replacing the current entry.
	///
	/// # Errors
	///
	/// See [`Router::navigate`].
	pub fn replace(&self, path: &str) -> RouterResult<NavigationOutcome> {
		self.navigate(NavigationRequest::replace(path))
	}

	/// Runs a navigation attempt to completion.
	///
	/// # Errors
	///
	/// See [`Router::begin`] and [`Router::commit`].
	pub fn navigate(&self, request: NavigationRequest) -> RouterResult<NavigationOutcome> {
		let pending = self.begin(request)?;
		self.commit(pending)
	}

	/// Resolves a request and runs the guard, without committing.
	///
	/// Starting an attempt supersedes every earlier one.
	///
	/// # Errors
	///
	/// - [`RouterError::Configuration`] if the path matches nothing.
	/// - [`RouterError::InvalidRouteName`] / [`RouterError::MissingParameter`]
	///   for a bad named request or guard redirect target.
	/// - [`RouterError::RedirectLimitExceeded`] if the guard redirects the
	///   redirect.
	pub fn begin(&self, request: NavigationRequest) -> RouterResult<PendingNavigation> {
		let ticket = Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
		tracing::debug!(
			ticket = ticket.get(),
			request = %request.describe(),
			"navigation started"
		);

		let result = self.decide(ticket, &request);
		if result.is_err() {
			self.transition(RouterState::Idle);
		}
		result
	}

	/// Commits a decided navigation, unless a newer attempt has started.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Navigation`] if the history medium rejects
	/// the write.
	pub fn commit(&self, pending: PendingNavigation) -> RouterResult<NavigationOutcome> {
		let latest = self.latest_ticket();
		if pending.ticket != latest {
			tracing::debug!(
				ticket = pending.ticket.get(),
				latest = latest.get(),
				route = pending.target.name(),
				"discarding stale navigation decision"
			);
			self.stale_listeners.emit(&StaleDecision {
				ticket: pending.ticket,
				latest,
				target: pending.target,
			});
			return Ok(NavigationOutcome::Superseded {
				ticket: pending.ticket,
				latest,
			});
		}

		self.transition(RouterState::Committing);
		let mode = if pending.guard_redirected {
			NavigationMode::Replace
		} else {
			pending.mode
		};
		if let Err(err) = self.write_history(&pending.target.path, mode) {
			self.transition(RouterState::Idle);
			return Err(err.into());
		}
		*self.current.write() = Some(pending.target.clone());
		self.transition(RouterState::Idle);

		tracing::info!(
			route = pending.target.name(),
			path = %pending.target.path,
			fallback = pending.target.fallback,
			"navigation committed"
		);

		if pending.guard_redirected {
			self.redirect_listeners.emit(&GuardRedirect {
				requested: pending.requested.clone(),
				to: pending.target.name().to_string(),
			});
			Ok(NavigationOutcome::GuardRedirected {
				requested: pending.requested,
				committed: pending.target,
			})
		} else {
			Ok(NavigationOutcome::Committed(pending.target))
		}
	}

	/// Performs the initial navigation from the current location and follows
	/// external location changes from then on.
	///
	/// Each external change runs through the guard like any other request
	/// and is written back with `Replace` when the outcome differs.
	///
	/// # Errors
	///
	/// Errors from the initial navigation, as in [`Router::navigate`].
	pub fn start(self: &Arc<Self>) -> RouterResult<NavigationOutcome> {
		let router: Weak<Self> = Arc::downgrade(self);
		let id = self.history.on_change(Arc::new(move |location: &str| {
			let Some(router) = router.upgrade() else {
				return;
			};
			if let Err(err) = router.replace(location) {
				tracing::error!(location, error = %err, "external navigation failed");
			}
		}));
		if let Some(previous) = self.history_subscription.lock().replace(id) {
			self.history.remove_listener(previous);
		}

		let initial = self.history.current_location();
		self.replace(&initial)
	}

	/// Stops following external location changes.
	pub fn stop(&self) {
		if let Some(id) = self.history_subscription.lock().take() {
			self.history.remove_listener(id);
		}
	}

	/// Subscribes to "the guard redirected you away" notifications.
	pub fn on_guard_redirect<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&GuardRedirect) + Send + Sync + 'static,
	{
		self.redirect_listeners.add(Arc::new(listener))
	}

	/// Removes a guard redirect listener.
	pub fn remove_guard_redirect_listener(&self, id: ListenerId) -> bool {
		self.redirect_listeners.remove(id)
	}

	/// Subscribes to discarded stale decisions.
	pub fn on_stale_decision<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&StaleDecision) + Send + Sync + 'static,
	{
		self.stale_listeners.add(Arc::new(listener))
	}

	/// Removes a stale decision listener.
	pub fn remove_stale_decision_listener(&self, id: ListenerId) -> bool {
		self.stale_listeners.remove(id)
	}

	fn decide(&self, ticket: Ticket, request: &NavigationRequest) -> RouterResult<PendingNavigation> {
		self.transition(RouterState::Resolving);
		let requested = self.resolve(request)?;

		let mut target = requested.clone();
		let mut redirects = 0;
		loop {
			self.transition(RouterState::Deciding);
			let token = self.session.get_token();
			let decision = self.guard.decide(&target, token.as_ref());
			tracing::debug!(
				ticket = ticket.get(),
				route = target.name(),
				signed_in = token.is_some(),
				decision = ?decision,
				"guard decided"
			);

			match decision {
				GuardDecision::Proceed => break,
				GuardDecision::Redirect(to) => {
					if redirects == MAX_GUARD_REDIRECTS {
						return Err(RouterError::RedirectLimitExceeded {
							path: requested.path.clone(),
							limit: MAX_GUARD_REDIRECTS,
						});
					}
					redirects += 1;
					self.transition(RouterState::Redirecting);
					self.transition(RouterState::Resolving);
					target = self.table.resolve_name(&to, &HashMap::new())?;
				}
			}
		}

		Ok(PendingNavigation {
			ticket,
			requested,
			target,
			mode: request.mode(),
			guard_redirected: redirects > 0,
		})
	}

	fn resolve(&self, request: &NavigationRequest) -> RouterResult<RouteMatch> {
		match request {
			NavigationRequest::Path { path, .. } => self
				.table
				.resolve(path)
				.ok_or_else(|| ConfigurationError::Unresolved(path.clone()).into()),
			NavigationRequest::Name { name, params, .. } => self.table.resolve_name(name, params),
		}
	}

	fn write_history(
		&self,
		path: &str,
		mode: NavigationMode,
	) -> Result<(), crate::error::HistoryError> {
		if self.history.current_location() == path {
			return Ok(());
		}
		self.history.navigate(path, mode)
	}

	fn transition(&self, next: RouterState) {
		let mut state = self.state.lock();
		tracing::trace!(from = ?*state, to = ?next, "router state");
		*state = next;
	}
}

/// Builder for [`Router`].
pub struct RouterBuilder {
	table: RouteTable,
	history: Option<Arc<dyn History>>,
	session: Option<Arc<dyn SessionStore>>,
	guard: Option<Arc<dyn NavigationGuard>>,
	login_route: String,
}

impl std::fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("table", &self.table)
			.field("has_history", &self.history.is_some())
			.field("has_session", &self.session.is_some())
			.field("has_guard", &self.guard.is_some())
			.field("login_route", &self.login_route)
			.finish()
	}
}

impl RouterBuilder {
	/// Creates a builder with the default login route name.
	pub fn new(table: RouteTable) -> Self {
		Self {
			table,
			history: None,
			session: None,
			guard: None,
			login_route: DEFAULT_LOGIN_ROUTE.to_string(),
		}
	}

	/// Sets the history medium. Defaults to [`MemoryHistory`].
	pub fn history<H: History + 'static>(mut self, history: H) -> Self {
		self.history = Some(Arc::new(history));
		self
	}

	/// Sets an already shared history medium.
	pub fn shared_history(mut self, history: Arc<dyn History>) -> Self {
		self.history = Some(history);
		self
	}

	/// Sets the session store. Required.
	pub fn session<S: SessionStore + 'static>(mut self, session: S) -> Self {
		self.session = Some(Arc::new(session));
		self
	}

	/// Replaces the default [`SessionGuard`].
	pub fn guard<G: NavigationGuard + 'static>(mut self, guard: G) -> Self {
		self.guard = Some(Arc::new(guard));
		self
	}

	/// Sets the guard-exempt login route name.
	pub fn login_route(mut self, name: impl Into<String>) -> Self {
		self.login_route = name.into();
		self
	}

	/// Validates the configuration and builds the router.
	///
	/// # Errors
	///
	/// - [`ConfigurationError::MissingSessionStore`] without a session.
	/// - [`ConfigurationError::MissingLoginRoute`] if the login route is not
	///   in the table.
	/// - [`ConfigurationError::LoginRouteRedirects`] if the login route
	///   redirects, which would defeat its guard exemption.
	/// - [`ConfigurationError::LoginRouteNeedsParams`] if the login route
	///   cannot be reached without parameters.
	pub fn build(self) -> Result<Router, ConfigurationError> {
		let session = self.session.ok_or(ConfigurationError::MissingSessionStore)?;
		let login = self
			.table
			.get(&self.login_route)
			.ok_or_else(|| ConfigurationError::MissingLoginRoute(self.login_route.clone()))?;
		if let Some(target) = login.redirect() {
			return Err(ConfigurationError::LoginRouteRedirects {
				route: self.login_route.clone(),
				target: target.to_string(),
			});
		}
		// The guard redirects to the login route with no parameters.
		if let Err(param) = login.pattern().reverse(&HashMap::new()) {
			return Err(ConfigurationError::LoginRouteNeedsParams {
				route: self.login_route.clone(),
				param,
			});
		}

		let guard = self
			.guard
			.unwrap_or_else(|| Arc::new(SessionGuard::new(self.login_route.clone())));
		let history = self
			.history
			.unwrap_or_else(|| Arc::new(MemoryHistory::new()));

		Ok(Router {
			table: Arc::new(self.table),
			history,
			session,
			guard,
			login_route: self.login_route,
			state: Mutex::new(RouterState::Idle),
			latest: AtomicU64::new(0),
			current: RwLock::new(None),
			redirect_listeners: Listeners::default(),
			stale_listeners: Listeners::default(),
			history_subscription: Mutex::new(None),
		})
	}
}
