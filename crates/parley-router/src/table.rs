//! The route table.
//!
//! A [`RouteTable`] is built once from a list of [`RouteDef`]s and is
//! immutable afterwards. Every invariant is checked at registration time,
//! so a table that exists can always resolve a path.

use crate::error::{ConfigResult, ConfigurationError, RouterError, RouterResult};
use crate::pattern::{PathPattern, SegmentKind, normalize_path};
use crate::route::{RedirectTarget, RouteDef, RouteMatch, RouteNode, ViewHandle};
use std::collections::HashMap;
use std::sync::Arc;

/// A definition flattened out of the tree, with its full path.
struct FlatRoute {
	name: String,
	path: String,
	view: Option<ViewHandle>,
	redirect: Option<RedirectTarget>,
	ancestors: Vec<String>,
}

/// Static, hierarchical registry of path to view bindings.
pub struct RouteTable {
	/// Compiled routes in depth-first registration order.
	nodes: Vec<Arc<RouteNode>>,
	/// Route name to index in `nodes`.
	by_name: HashMap<String, usize>,
	/// Index of the catch-all route.
	catch_all: usize,
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes_count", &self.nodes.len())
			.field("catch_all", &self.nodes[self.catch_all].name())
			.finish()
	}
}

impl RouteTable {
	/// Creates a builder.
	pub fn builder() -> RouteTableBuilder {
		RouteTableBuilder::default()
	}

	/// Builds and validates a table from route definitions.
	///
	/// # Errors
	///
	/// Returns a [`ConfigurationError`] for duplicate names, a missing or
	/// repeated catch-all, a missing root route, invalid patterns, routes
	/// without a view or redirect, unknown redirect targets, redirect
	/// targets needing parameters the source lacks, and redirect cycles.
	pub fn register<I>(defs: I) -> ConfigResult<Self>
	where
		I: IntoIterator<Item = RouteDef>,
	{
		let mut flat = Vec::new();
		for def in defs {
			flatten(def, None, &[], &mut flat);
		}

		let mut by_name = HashMap::with_capacity(flat.len());
		for (index, route) in flat.iter().enumerate() {
			if by_name.insert(route.name.clone(), index).is_some() {
				return Err(ConfigurationError::DuplicateName(route.name.clone()));
			}
		}

		let mut nodes = Vec::with_capacity(flat.len());
		for route in &flat {
			let pattern =
				PathPattern::new(&route.path).map_err(|reason| ConfigurationError::InvalidPattern {
					pattern: route.path.clone(),
					reason,
				})?;
			if route.view.is_none() && route.redirect.is_none() {
				return Err(ConfigurationError::MissingView(route.name.clone()));
			}
			nodes.push(RouteNode {
				name: route.name.clone(),
				pattern,
				view: route.view.clone(),
				redirect: None,
				ancestors: route.ancestors.clone(),
			});
		}

		let catch_alls: Vec<usize> = nodes
			.iter()
			.enumerate()
			.filter(|(_, node)| node.is_catch_all())
			.map(|(index, _)| index)
			.collect();
		let catch_all = match catch_alls.as_slice() {
			[] => return Err(ConfigurationError::MissingCatchAll),
			[only] => *only,
			[first, second, ..] => {
				return Err(ConfigurationError::MultipleCatchAll {
					first: nodes[*first].name.clone(),
					second: nodes[*second].name.clone(),
				});
			}
		};
		if !nodes[catch_all].pattern.is_universal() {
			return Err(ConfigurationError::CatchAllNotUniversal {
				route: nodes[catch_all].name.clone(),
				pattern: nodes[catch_all].pattern.pattern().to_string(),
			});
		}

		if !nodes.iter().any(|node| node.pattern.is_root()) {
			return Err(ConfigurationError::MissingRootRoute);
		}

		for (index, route) in flat.iter().enumerate() {
			let Some(target) = &route.redirect else {
				continue;
			};
			let target_index = match target {
				RedirectTarget::Name(name) => by_name.get(name).copied(),
				RedirectTarget::Path(path) => {
					let (path, _) = normalize_path(path);
					best_match(nodes.iter(), catch_all, &path).map(|(found, _)| found)
				}
			}
			.ok_or_else(|| ConfigurationError::UnknownRedirectTarget {
				route: route.name.clone(),
				target: target.to_string(),
			})?;

			let source_params = nodes[index].pattern.param_names();
			if let Some(param) = nodes[target_index]
				.pattern
				.required_param_names()
				.find(|param| !source_params.iter().any(|source| source == param))
			{
				return Err(ConfigurationError::RedirectParamMismatch {
					route: route.name.clone(),
					target: nodes[target_index].name.clone(),
					param: param.to_string(),
				});
			}
			nodes[index].redirect = Some(nodes[target_index].name.clone());
		}

		check_redirect_cycles(&nodes, &by_name)?;

		tracing::debug!(
			routes = nodes.len(),
			catch_all = %nodes[catch_all].name,
			"route table registered"
		);

		Ok(Self {
			nodes: nodes.into_iter().map(Arc::new).collect(),
			by_name,
			catch_all,
		})
	}

	/// Resolves a location to the most specific route.
	///
	/// Static segments beat parameters; ties go to the route registered
	/// first. The catch-all is only tried when nothing else matches.
	/// Redirects are followed transitively. Returns `None` only if even the
	/// catch-all rejects the path.
	pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
		let (path, query) = normalize_path(location);

		let (index, params, fallback) =
			match best_match(self.nodes.iter().map(Arc::as_ref), self.catch_all, &path) {
				Some((index, params)) => (index, params, false),
				None => {
					let params = self.nodes[self.catch_all].pattern.matches(&path)?;
					(self.catch_all, params, true)
				}
			};

		let route_match = self.finish(index, path, params, query, fallback);
		tracing::debug!(
			location,
			route = route_match.name(),
			fallback,
			"resolved location"
		);
		Some(route_match)
	}

	/// Resolves a route by name, building its path from `params`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidRouteName`] for an unknown name and
	/// [`RouterError::MissingParameter`] when `params` lacks a value the
	/// pattern needs. Returns [`RouterError::ParameterMismatch`] when the
	/// built path resolves to a different route, for example when a value
	/// fails the parameter's constraint or collides with a static sibling.
	pub fn resolve_name(
		&self,
		name: &str,
		params: &HashMap<String, String>,
	) -> RouterResult<RouteMatch> {
		let index = *self
			.by_name
			.get(name)
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;
		let node = &self.nodes[index];
		let path = node
			.pattern
			.reverse(params)
			.map_err(RouterError::MissingParameter)?;

		// The catch-all is reached by name on purpose, even for paths a
		// specific route would claim.
		if node.is_catch_all() {
			let params = node
				.pattern
				.param_names()
				.iter()
				.filter_map(|key| params.get(key).map(|value| (key.clone(), value.clone())))
				.collect();
			return Ok(self.finish(index, path, params, None, true));
		}

		let route_match = self
			.resolve(&path)
			.ok_or_else(|| ConfigurationError::Unresolved(path.clone()))?;
		let landed = route_match
			.redirected_from
			.as_deref()
			.unwrap_or(route_match.name());
		if landed != name {
			return Err(RouterError::ParameterMismatch {
				route: name.to_string(),
				path,
				resolved: landed.to_string(),
			});
		}
		Ok(route_match)
	}

	/// Generates a path by route name with parameters.
	///
	/// # Errors
	///
	/// Same as [`RouteTable::resolve_name`].
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> RouterResult<String> {
		let node = self
			.get(name)
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;
		let params_map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		node.pattern
			.reverse(&params_map)
			.map_err(RouterError::MissingParameter)
	}

	/// Returns a route by name.
	pub fn get(&self, name: &str) -> Option<&Arc<RouteNode>> {
		self.by_name.get(name).map(|index| &self.nodes[*index])
	}

	/// Checks if a route name exists.
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Returns the catch-all route.
	pub fn catch_all(&self) -> &Arc<RouteNode> {
		&self.nodes[self.catch_all]
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns whether the table is empty. A registered table never is.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Iterates routes in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteNode>> {
		self.nodes.iter()
	}

	/// Follows redirects from `index` and assembles the match.
	fn finish(
		&self,
		mut index: usize,
		mut path: String,
		mut params: HashMap<String, String>,
		query: Option<String>,
		fallback: bool,
	) -> RouteMatch {
		let mut redirected_from = None;

		// Registration rejected cycles, so this terminates.
		while let Some(target) = self.nodes[index].redirect.as_deref() {
			let target_index = self.by_name[target];
			redirected_from.get_or_insert_with(|| self.nodes[index].name.clone());

			let target_pattern = &self.nodes[target_index].pattern;
			params.retain(|key, _| target_pattern.param_names().contains(key));
			path = target_pattern.reverse(&params).unwrap_or_else(|param| {
				tracing::warn!(
					redirect_target = target,
					param = %param,
					"redirect target parameter is empty, using pattern text"
				);
				target_pattern.pattern().to_string()
			});
			index = target_index;
		}

		let route = Arc::clone(&self.nodes[index]);
		let mut matched = route.ancestors.clone();
		matched.push(route.name.clone());
		let path = match &query {
			Some(query) => format!("{}?{}", path, query),
			None => path,
		};

		RouteMatch {
			route,
			path,
			params,
			query,
			matched,
			redirected_from,
			fallback,
		}
	}
}

/// Builder collecting route definitions before validation.
#[derive(Debug, Default, Clone)]
pub struct RouteTableBuilder {
	defs: Vec<RouteDef>,
}

impl RouteTableBuilder {
	/// Adds a top-level route.
	pub fn route(mut self, def: RouteDef) -> Self {
		self.defs.push(def);
		self
	}

	/// Adds several top-level routes.
	pub fn routes(mut self, defs: impl IntoIterator<Item = RouteDef>) -> Self {
		self.defs.extend(defs);
		self
	}

	/// Validates and builds the table.
	///
	/// # Errors
	///
	/// See [`RouteTable::register`].
	pub fn build(self) -> ConfigResult<RouteTable> {
		RouteTable::register(self.defs)
	}
}

fn flatten(def: RouteDef, parent_path: Option<&str>, ancestors: &[String], out: &mut Vec<FlatRoute>) {
	let path = join_path(parent_path, &def.path);
	let RouteDef {
		name,
		view,
		redirect,
		children,
		..
	} = def;

	let mut child_ancestors = ancestors.to_vec();
	child_ancestors.push(name.clone());

	out.push(FlatRoute {
		name,
		path: path.clone(),
		view,
		redirect,
		ancestors: ancestors.to_vec(),
	});

	for child in children {
		flatten(child, Some(&path), &child_ancestors, out);
	}
}

fn join_path(parent: Option<&str>, path: &str) -> String {
	match parent {
		None => path.to_string(),
		Some(_) if path.starts_with('/') => path.to_string(),
		Some(parent) if path.is_empty() => parent.to_string(),
		Some(parent) => format!("{}/{}", parent.trim_end_matches('/'), path),
	}
}

/// Finds the most specific non-catch-all route matching `path`.
fn best_match<'a>(
	nodes: impl Iterator<Item = &'a RouteNode>,
	catch_all: usize,
	path: &str,
) -> Option<(usize, HashMap<String, String>)> {
	let mut best: Option<(usize, Vec<SegmentKind>, HashMap<String, String>)> = None;

	for (index, node) in nodes.enumerate() {
		if index == catch_all {
			continue;
		}
		let Some(params) = node.pattern.matches(path) else {
			continue;
		};
		let rank = node.pattern.specificity();
		if best.as_ref().is_none_or(|(_, best_rank, _)| rank > *best_rank) {
			best = Some((index, rank, params));
		}
	}

	best.map(|(index, _, params)| (index, params))
}

fn check_redirect_cycles(
	nodes: &[RouteNode],
	by_name: &HashMap<String, usize>,
) -> ConfigResult<()> {
	for start in 0..nodes.len() {
		let mut chain = vec![start];
		let mut current = start;

		while let Some(next) = nodes[current].redirect.as_ref().map(|name| by_name[name]) {
			if let Some(position) = chain.iter().position(|visited| *visited == next) {
				let mut names: Vec<String> = chain[position..]
					.iter()
					.map(|visited| nodes[*visited].name.clone())
					.collect();
				names.push(nodes[next].name.clone());
				return Err(ConfigurationError::CyclicRedirect { chain: names });
			}
			chain.push(next);
			current = next;
		}
	}
	Ok(())
}
