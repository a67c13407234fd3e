//! Error types for client-side routing.

use thiserror::Error;

/// Result type for route table construction.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// A route table or router that cannot be started.
///
/// Every variant is fatal: the router refuses to start rather than
/// recovering silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Two routes share the same name.
	#[error("Duplicate route name: {0}")]
	DuplicateName(String),
	/// No catch-all route was registered.
	#[error("No catch-all route registered")]
	MissingCatchAll,
	/// More than one catch-all route was registered.
	#[error("Multiple catch-all routes registered: '{first}' and '{second}'")]
	MultipleCatchAll {
		/// First catch-all route name.
		first: String,
		/// Second catch-all route name.
		second: String,
	},
	/// The only catch-all has a fixed prefix, so some paths match nothing.
	#[error("Catch-all route '{route}' must match every path, but its pattern is '{pattern}'")]
	CatchAllNotUniversal {
		/// Catch-all route name.
		route: String,
		/// Its pattern.
		pattern: String,
	},
	/// No route is bound to the literal root path.
	#[error("No route registered for the root path '/'")]
	MissingRootRoute,
	/// A redirect points at a name or path that no route provides.
	#[error("Route '{route}' redirects to unknown target '{target}'")]
	UnknownRedirectTarget {
		/// Redirecting route name.
		route: String,
		/// The unresolvable target.
		target: String,
	},
	/// Following redirects from a route comes back to a route already visited.
	#[error("Cyclic redirect chain: {}", chain.join(" -> "))]
	CyclicRedirect {
		/// Route names in the order they were visited, ending with the repeated one.
		chain: Vec<String>,
	},
	/// A redirect target needs a parameter the source route does not capture.
	#[error("Route '{route}' redirects to '{target}' which needs parameter '{param}'")]
	RedirectParamMismatch {
		/// Redirecting route name.
		route: String,
		/// Target route name.
		target: String,
		/// The parameter the source cannot supply.
		param: String,
	},
	/// A route has neither a view nor a redirect.
	#[error("Route '{0}' has neither a view nor a redirect")]
	MissingView(String),
	/// A path pattern failed to compile.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why it was rejected.
		reason: String,
	},
	/// The guard-exempt login route is not in the table.
	#[error("Login route '{0}' is not registered")]
	MissingLoginRoute(String),
	/// The login route redirects elsewhere, so it cannot be exempt from the guard.
	#[error("Login route '{route}' redirects to '{target}' and cannot be guard-exempt")]
	LoginRouteRedirects {
		/// Login route name.
		route: String,
		/// Where it redirects.
		target: String,
	},
	/// The login route needs a parameter, so the guard cannot redirect to it.
	#[error("Login route '{route}' needs parameter '{param}' and cannot be a redirect target")]
	LoginRouteNeedsParams {
		/// Login route name.
		route: String,
		/// The parameter it needs.
		param: String,
	},
	/// The router was built without a session store.
	#[error("No session store configured")]
	MissingSessionStore,
	/// A path matched nothing, not even the catch-all.
	#[error("Path '{0}' matched no route, not even the catch-all")]
	Unresolved(String),
}

/// Error raised by a [`History`](crate::history::History) medium.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// Writing the new location failed.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),
	/// The medium (window, location, history object) is not available.
	#[error("History unavailable: {0}")]
	Unavailable(String),
}

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// Configuration problem surfaced at navigation time.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
	/// Invalid route name.
	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),
	/// Missing parameter for reverse URL.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),
	/// Parameters build a path that resolves to a different route.
	#[error("Parameters for route '{route}' build '{path}', which resolves to '{resolved}'")]
	ParameterMismatch {
		/// Requested route name.
		route: String,
		/// Path built from the parameters.
		path: String,
		/// Route the path actually resolves to.
		resolved: String,
	},
	/// The guard kept redirecting.
	#[error("Guard redirected more than {limit} time(s) while navigating to '{path}'")]
	RedirectLimitExceeded {
		/// Path of the original request.
		path: String,
		/// Allowed number of guard redirects.
		limit: usize,
	},
	/// The history medium rejected the commit.
	#[error(transparent)]
	Navigation(#[from] HistoryError),
}
