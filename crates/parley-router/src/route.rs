//! Route definitions and resolved matches.
//!
//! [`RouteDef`] is the declarative input a table is built from. The table
//! compiles each definition into a [`RouteNode`], and resolving a path
//! yields a [`RouteMatch`].

use crate::pattern::PathPattern;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque reference to a view. The router never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewHandle(String);

impl ViewHandle {
	/// Creates a view handle.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the handle as a string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ViewHandle {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ViewHandle {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl std::fmt::Display for ViewHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Where a redirecting route sends the navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
	/// Another route, by name.
	Name(String),
	/// A concrete path, resolved to a route when the table is built.
	Path(String),
}

impl std::fmt::Display for RedirectTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Name(name) => f.write_str(name),
			Self::Path(path) => f.write_str(path),
		}
	}
}

/// A declarative route definition.
///
/// Child paths starting with `/` are absolute; other child paths are joined
/// to the parent's full path, and an empty child path reuses it.
///
/// # Example
///
/// ```
/// use parley_router::RouteDef;
///
/// let home = RouteDef::new("home", "/home")
/// 	.view("Layout")
/// 	.redirect_to_path("/chats")
/// 	.child(RouteDef::new("chats", "/chats").view("Chats"));
/// assert_eq!(home.children.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
	/// Path pattern.
	pub path: String,
	/// Unique route name.
	pub name: String,
	/// View rendered for this route.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub view: Option<ViewHandle>,
	/// Redirect applied whenever this route is matched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect: Option<RedirectTarget>,
	/// Nested routes.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<RouteDef>,
}

impl RouteDef {
	/// Creates a definition with no view, redirect or children.
	pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			view: None,
			redirect: None,
			children: Vec::new(),
		}
	}

	/// Sets the view.
	pub fn view(mut self, view: impl Into<ViewHandle>) -> Self {
		self.view = Some(view.into());
		self
	}

	/// Redirects to another route by name.
	pub fn redirect_to(mut self, name: impl Into<String>) -> Self {
		self.redirect = Some(RedirectTarget::Name(name.into()));
		self
	}

	/// Redirects to a concrete path.
	pub fn redirect_to_path(mut self, path: impl Into<String>) -> Self {
		self.redirect = Some(RedirectTarget::Path(path.into()));
		self
	}

	/// Appends a child route.
	pub fn child(mut self, child: RouteDef) -> Self {
		self.children.push(child);
		self
	}

	/// Appends several child routes.
	pub fn children(mut self, children: impl IntoIterator<Item = RouteDef>) -> Self {
		self.children.extend(children);
		self
	}
}

/// A compiled route inside a [`RouteTable`](crate::table::RouteTable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNode {
	pub(crate) name: String,
	pub(crate) pattern: PathPattern,
	pub(crate) view: Option<ViewHandle>,
	pub(crate) redirect: Option<String>,
	pub(crate) ancestors: Vec<String>,
}

impl RouteNode {
	/// Returns the route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the full path pattern, parent prefix included.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Returns the view handle, if any.
	pub fn view(&self) -> Option<&ViewHandle> {
		self.view.as_ref()
	}

	/// Returns the name of the route this one redirects to.
	pub fn redirect(&self) -> Option<&str> {
		self.redirect.as_deref()
	}

	/// Returns the enclosing route names, outermost first.
	pub fn ancestors(&self) -> &[String] {
		&self.ancestors
	}

	/// Returns the direct parent's name.
	pub fn parent(&self) -> Option<&str> {
		self.ancestors.last().map(String::as_str)
	}

	/// Returns whether this is the catch-all route.
	pub fn is_catch_all(&self) -> bool {
		self.pattern.is_catch_all()
	}
}

/// A resolved route with extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// The matched route, after redirects.
	pub route: Arc<RouteNode>,
	/// The concrete location, query included.
	pub path: String,
	/// Extracted path parameters.
	pub params: HashMap<String, String>,
	/// Query string without the leading `?`.
	pub query: Option<String>,
	/// Route names from the outermost layout down to the matched route.
	pub matched: Vec<String>,
	/// Name of the first route matched before redirects were applied.
	pub redirected_from: Option<String>,
	/// Whether the path was only matched by the catch-all route.
	pub fallback: bool,
}

impl RouteMatch {
	/// Returns the matched route's name.
	pub fn name(&self) -> &str {
		self.route.name()
	}

	/// Returns the matched route's view.
	pub fn view(&self) -> Option<&ViewHandle> {
		self.route.view()
	}

	/// Returns a single parameter value.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}
