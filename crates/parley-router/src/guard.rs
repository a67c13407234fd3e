//! Navigation guards.
//!
//! A guard looks at the resolved target and the session token read for
//! this attempt, and either lets the navigation proceed or names the route
//! to redirect to. Guards are synchronous and must not perform I/O.

use crate::route::RouteMatch;
use crate::session::SessionToken;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
	/// Commit the navigation as resolved.
	Proceed,
	/// Navigate to the named route instead.
	Redirect(String),
}

/// Decides whether a navigation may proceed.
pub trait NavigationGuard: Send + Sync {
	/// Evaluates one navigation attempt.
	fn decide(&self, target: &RouteMatch, token: Option<&SessionToken>) -> GuardDecision;
}

impl<F> NavigationGuard for F
where
	F: Fn(&RouteMatch, Option<&SessionToken>) -> GuardDecision + Send + Sync,
{
	fn decide(&self, target: &RouteMatch, token: Option<&SessionToken>) -> GuardDecision {
		self(target, token)
	}
}

/// Redirects signed-out users to the login route.
///
/// The login route itself is exempt, so a signed-out navigation needs at
/// most one redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGuard {
	login_route: String,
}

impl SessionGuard {
	/// Creates a guard exempting `login_route`.
	pub fn new(login_route: impl Into<String>) -> Self {
		Self {
			login_route: login_route.into(),
		}
	}

	/// Returns the exempt login route name.
	pub fn login_route(&self) -> &str {
		&self.login_route
	}
}

impl NavigationGuard for SessionGuard {
	fn decide(&self, target: &RouteMatch, token: Option<&SessionToken>) -> GuardDecision {
		if token.is_none() && target.name() != self.login_route {
			GuardDecision::Redirect(self.login_route.clone())
		} else {
			GuardDecision::Proceed
		}
	}
}
