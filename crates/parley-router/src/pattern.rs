//! Path pattern matching for client-side routes.
//!
//! A pattern is a `/`-separated list of segments:
//!
//! - `chats` - literal text, matched exactly (case-sensitive)
//! - `:id` - captures one path segment
//! - `:id(\d+)` - captures one path segment matching a custom regex
//! - `:rest(.*)` or `*` - catch-all, captures the remaining path (including
//!   `/`) and also matches zero remaining segments. Only allowed last.
//!
//! A single trailing slash in a pattern is ignored. Custom regexes may not
//! contain `/`.

use std::collections::HashMap;

/// Parameter name used for a bare `*` catch-all segment.
pub const CATCH_ALL_PARAM: &str = "pathMatch";

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Kind of a pattern segment, ordered from least to most specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
	/// Matches any remaining suffix.
	CatchAll,
	/// Matches one segment and captures it.
	Param,
	/// Matches one literal segment.
	Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Static(String),
	Param { name: String, regex: Option<String> },
	CatchAll(String),
}

impl Segment {
	fn kind(&self) -> SegmentKind {
		match self {
			Self::Static(_) => SegmentKind::Static,
			Self::Param { .. } => SegmentKind::Param,
			Self::CatchAll(_) => SegmentKind::CatchAll,
		}
	}
}

/// A compiled route path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Parsed segments in order.
	segments: Vec<Segment>,
	/// Compiled regex pattern.
	regex: regex::Regex,
	/// Parameter names in order.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns a description of the problem if the pattern does not start
	/// with `/`, is too long, has too many or empty segments, repeats a
	/// parameter name, places a catch-all before the last segment, or
	/// compiles to an invalid regex.
	pub fn new(pattern: &str) -> Result<Self, String> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(format!(
				"Pattern length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			));
		}

		let segments = Self::parse_segments(pattern)?;
		if segments.len() > MAX_PATH_SEGMENTS {
			return Err(format!(
				"Pattern has {} path segments, exceeding maximum of {}",
				segments.len(),
				MAX_PATH_SEGMENTS
			));
		}

		let mut param_names: Vec<String> = Vec::new();
		for segment in &segments {
			let name = match segment {
				Segment::Static(_) => continue,
				Segment::Param { name, .. } | Segment::CatchAll(name) => name,
			};
			if param_names.contains(name) {
				return Err(format!("Parameter '{}' appears more than once", name));
			}
			param_names.push(name.clone());
		}

		let regex = regex::RegexBuilder::new(&Self::compile_regex(&segments))
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| format!("Failed to compile pattern regex: {}", e))?;

		Ok(Self {
			pattern: pattern.to_string(),
			segments,
			regex,
			param_names,
		})
	}

	fn parse_segments(pattern: &str) -> Result<Vec<Segment>, String> {
		let Some(body) = pattern.strip_prefix('/') else {
			return Err("Pattern must start with '/'".to_string());
		};
		let body = body.strip_suffix('/').unwrap_or(body);
		if body.is_empty() {
			return Ok(Vec::new());
		}

		let raw: Vec<&str> = body.split('/').collect();
		let mut segments = Vec::with_capacity(raw.len());
		for (index, part) in raw.iter().enumerate() {
			let segment = Self::parse_segment(part)?;
			if matches!(segment, Segment::CatchAll(_)) && index + 1 != raw.len() {
				return Err("Catch-all segment must be the last segment".to_string());
			}
			segments.push(segment);
		}
		Ok(segments)
	}

	fn parse_segment(part: &str) -> Result<Segment, String> {
		if part.is_empty() {
			return Err("Pattern contains an empty segment".to_string());
		}
		if part == "*" {
			return Ok(Segment::CatchAll(CATCH_ALL_PARAM.to_string()));
		}
		let Some(rest) = part.strip_prefix(':') else {
			return Ok(Segment::Static(part.to_string()));
		};

		let (name, custom) = match rest.find('(') {
			Some(open) => {
				let Some(inner) = rest[open + 1..].strip_suffix(')') else {
					return Err(format!("Unclosed regex in segment '{}'", part));
				};
				(&rest[..open], Some(inner))
			}
			None => (rest, None),
		};

		let valid_name = name
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
			&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
		if !valid_name {
			return Err(format!("Invalid parameter name '{}'", name));
		}

		Ok(match custom {
			Some(".*") => Segment::CatchAll(name.to_string()),
			Some("") => return Err(format!("Empty regex for parameter '{}'", name)),
			Some(re) => Segment::Param {
				name: name.to_string(),
				regex: Some(re.to_string()),
			},
			None => Segment::Param {
				name: name.to_string(),
				regex: None,
			},
		})
	}

	fn compile_regex(segments: &[Segment]) -> String {
		let mut regex_str = String::from("^");
		for segment in segments {
			match segment {
				Segment::Static(text) => {
					regex_str.push('/');
					regex_str.push_str(&regex::escape(text));
				}
				Segment::Param { name, regex } => {
					let inner = regex.as_deref().unwrap_or("[^/]+");
					regex_str.push_str(&format!("/(?P<{}>(?:{}))", name, inner));
				}
				Segment::CatchAll(name) => {
					regex_str.push_str(&format!("(?:/(?P<{}>.*))?", name));
				}
			}
		}
		if segments.is_empty() {
			regex_str.push('/');
		}
		regex_str.push('$');
		regex_str
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns the parameters [`reverse`](Self::reverse) cannot do without.
	///
	/// A catch-all value may be omitted, so only single-segment parameters
	/// are listed.
	pub fn required_param_names(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(|segment| match segment {
			Segment::Param { name, .. } => Some(name.as_str()),
			Segment::Static(_) | Segment::CatchAll(_) => None,
		})
	}

	/// Returns the segment kinds in order, used to rank competing matches.
	pub fn specificity(&self) -> Vec<SegmentKind> {
		self.segments.iter().map(Segment::kind).collect()
	}

	/// Returns whether the pattern ends in a catch-all segment.
	pub fn is_catch_all(&self) -> bool {
		matches!(self.segments.last(), Some(Segment::CatchAll(_)))
	}

	/// Returns whether the pattern is a bare catch-all that matches every
	/// path, such as `/*` or `/:rest(.*)`.
	pub fn is_universal(&self) -> bool {
		matches!(self.segments.as_slice(), [Segment::CatchAll(_)])
	}

	/// Returns whether this is the literal root pattern `/`.
	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns whether the pattern has no parameters.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Checks if this pattern would match the given normalized path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Attempts to match a normalized path against this pattern.
	///
	/// Returns the percent-decoded parameter values on success. An unmatched
	/// catch-all (zero remaining segments) yields an empty string.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(path)?;
		let params = self
			.param_names
			.iter()
			.map(|name| {
				let raw = caps.name(name).map(|m| m.as_str()).unwrap_or("");
				let value = urlencoding::decode(raw)
					.map(|v| v.into_owned())
					.unwrap_or_else(|_| raw.to_string());
				(name.clone(), value)
			})
			.collect();
		Some(params)
	}

	/// Generates a concrete path from this pattern.
	///
	/// # Errors
	///
	/// Returns the name of the first single-segment parameter that is
	/// missing or empty. A missing catch-all value means zero segments.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, String> {
		let mut result = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Static(text) => {
					result.push('/');
					result.push_str(text);
				}
				Segment::Param { name, .. } => {
					let value = params
						.get(name)
						.filter(|v| !v.is_empty())
						.ok_or_else(|| name.clone())?;
					result.push('/');
					result.push_str(&urlencoding::encode(value));
				}
				Segment::CatchAll(name) => {
					let value = params.get(name).map(String::as_str).unwrap_or("");
					let value = value.trim_matches('/');
					if !value.is_empty() {
						let encoded: Vec<String> = value
							.split('/')
							.map(|part| urlencoding::encode(part).into_owned())
							.collect();
						result.push('/');
						result.push_str(&encoded.join("/"));
					}
				}
			}
		}
		if result.is_empty() {
			result.push('/');
		}
		Ok(result)
	}
}

/// Splits a location into its normalized path and optional query string.
///
/// An empty path becomes `/`, a missing leading slash is added, and a single
/// trailing slash is dropped.
pub fn normalize_path(location: &str) -> (String, Option<String>) {
	let (path, query) = match location.split_once('?') {
		Some((path, query)) => (path, Some(query.to_string())),
		None => (location, None),
	};
	let mut normalized = if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	};
	if normalized.len() > 1 && normalized.ends_with('/') {
		normalized.pop();
	}
	(normalized, query.filter(|q| !q.is_empty()))
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_root_pattern() {
		let pattern = PathPattern::new("/").unwrap();
		assert!(pattern.is_root());
		assert!(pattern.is_exact());
		assert!(pattern.is_match("/"));
		assert!(!pattern.is_match("/home"));
	}

	#[rstest]
	fn test_static_pattern_is_case_sensitive() {
		let pattern = PathPattern::new("/chats").unwrap();
		assert!(pattern.is_match("/chats"));
		assert!(!pattern.is_match("/Chats"));
		assert!(!pattern.is_match("/chats/1"));
	}

	#[rstest]
	fn test_single_param() {
		let pattern = PathPattern::new("/messages/:id").unwrap();
		assert!(!pattern.is_exact());
		assert!(!pattern.is_match("/messages"));

		let params = pattern.matches("/messages/42").unwrap();
		assert_eq!(params.get("id"), Some(&"42".to_string()));
		assert_eq!(pattern.param_names(), &["id"]);
	}

	#[rstest]
	fn test_param_is_percent_decoded() {
		let pattern = PathPattern::new("/search/:term").unwrap();
		let params = pattern.matches("/search/hello%20world").unwrap();
		assert_eq!(params.get("term"), Some(&"hello world".to_string()));
	}

	#[rstest]
	fn test_custom_param_regex() {
		let pattern = PathPattern::new("/messages/:id(\\d+)").unwrap();
		assert!(pattern.is_match("/messages/42"));
		assert!(!pattern.is_match("/messages/abc"));
		assert_eq!(pattern.specificity(), vec![SegmentKind::Static, SegmentKind::Param]);
	}

	#[rstest]
	#[case("/:catchAll(.*)", "catchAll")]
	#[case("/*", CATCH_ALL_PARAM)]
	fn test_catch_all_matches_any_suffix(#[case] source: &str, #[case] param: &str) {
		let pattern = PathPattern::new(source).unwrap();
		assert!(pattern.is_catch_all());

		let params = pattern.matches("/unknown/path").unwrap();
		assert_eq!(params.get(param), Some(&"unknown/path".to_string()));

		// Zero remaining segments
		let params = pattern.matches("/").unwrap();
		assert_eq!(params.get(param), Some(&String::new()));
	}

	#[rstest]
	fn test_prefixed_catch_all() {
		let pattern = PathPattern::new("/files/*").unwrap();
		assert!(pattern.is_match("/files"));
		assert!(pattern.is_match("/files/a/b"));
		assert!(!pattern.is_match("/other"));
		assert!(pattern.is_catch_all());
		assert!(!pattern.is_universal());
	}

	#[rstest]
	#[case("/*", true)]
	#[case("/:catchAll(.*)", true)]
	#[case("/files/:rest(.*)", false)]
	#[case("/messages/:id", false)]
	#[case("/", false)]
	fn test_is_universal(#[case] source: &str, #[case] expected: bool) {
		assert_eq!(PathPattern::new(source).unwrap().is_universal(), expected);
	}

	#[rstest]
	fn test_required_params_skip_catch_all() {
		let pattern = PathPattern::new("/rooms/:room/files/:rest(.*)").unwrap();

		let required: Vec<&str> = pattern.required_param_names().collect();

		assert_eq!(required, vec!["room"]);
		assert_eq!(pattern.param_names(), &["room", "rest"]);
	}

	#[rstest]
	#[case("chats", "must start with")]
	#[case("/a//b", "empty segment")]
	#[case("/:rest(.*)/tail", "must be the last")]
	#[case("/:a/:a", "more than once")]
	#[case("/:1abc", "Invalid parameter name")]
	#[case("/:id(\\d+", "Unclosed regex")]
	fn test_invalid_patterns(#[case] source: &str, #[case] reason: &str) {
		let err = PathPattern::new(source).unwrap_err();
		assert!(err.contains(reason), "unexpected error: {}", err);
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		// Arrange
		let long_pattern = "/".to_string() + &"a".repeat(1025);

		// Act
		let result = PathPattern::new(&long_pattern);

		// Assert
		assert!(result.unwrap_err().contains("exceeds maximum allowed length"));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		// Arrange
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}", segments.join("/"));

		// Act
		let result = PathPattern::new(&pattern);

		// Assert
		assert!(result.unwrap_err().contains("exceeding maximum"));
	}

	#[rstest]
	fn test_reverse() {
		let pattern = PathPattern::new("/messages/:id").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), "a b".to_string());
		assert_eq!(pattern.reverse(&params), Ok("/messages/a%20b".to_string()));
	}

	#[rstest]
	fn test_reverse_missing_param() {
		let pattern = PathPattern::new("/messages/:id").unwrap();
		assert_eq!(pattern.reverse(&HashMap::new()), Err("id".to_string()));
	}

	#[rstest]
	fn test_reverse_catch_all_keeps_separators() {
		let pattern = PathPattern::new("/files/*").unwrap();
		let mut params = HashMap::new();
		params.insert(CATCH_ALL_PARAM.to_string(), "a/b c".to_string());
		assert_eq!(pattern.reverse(&params), Ok("/files/a/b%20c".to_string()));
		assert_eq!(pattern.reverse(&HashMap::new()), Ok("/files".to_string()));
	}

	#[rstest]
	#[case("", "/", None)]
	#[case("chats", "/chats", None)]
	#[case("/chats/", "/chats", None)]
	#[case("/search?q=rust", "/search", Some("q=rust"))]
	#[case("/search?", "/search", None)]
	fn test_normalize_path(
		#[case] input: &str,
		#[case] path: &str,
		#[case] query: Option<&str>,
	) {
		let (normalized, q) = normalize_path(input);
		assert_eq!(normalized, path);
		assert_eq!(q.as_deref(), query);
	}

	#[rstest]
	fn test_pattern_display_and_equality() {
		let p1 = PathPattern::new("/messages/:id").unwrap();
		let p2 = PathPattern::new("/messages/:id").unwrap();
		let p3 = PathPattern::new("/messages/:msg").unwrap();
		assert_eq!(format!("{}", p1), "/messages/:id");
		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
	}
}
