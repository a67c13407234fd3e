//! Settings file formats.

use crate::error::{SettingsError, SettingsResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Serialization format of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
	Toml,
	Json,
}

impl SettingsFormat {
	/// Detects the format from a file extension.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::UnsupportedFormat`] for anything other than
	/// `.toml` or `.json`.
	///
	/// # Examples
	///
	/// ```
	/// use parley_conf::SettingsFormat;
	///
	/// assert_eq!(SettingsFormat::from_path("router.toml").unwrap(), SettingsFormat::Toml);
	/// assert!(SettingsFormat::from_path("router.yaml").is_err());
	/// ```
	pub fn from_path(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		match path.extension().and_then(|e| e.to_str()) {
			Some("toml") => Ok(Self::Toml),
			Some("json") => Ok(Self::Json),
			_ => Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
		}
	}

	/// Parses a document in this format.
	pub fn parse<T: DeserializeOwned>(self, content: &str) -> SettingsResult<T> {
		match self {
			Self::Toml => Ok(toml::from_str(content)?),
			Self::Json => Ok(serde_json::from_str(content)?),
		}
	}
}

/// Reads and parses a settings file, picking the format by extension.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> SettingsResult<T> {
	let path = path.as_ref();
	let format = SettingsFormat::from_path(path)?;
	let content = fs::read_to_string(path)?;
	tracing::debug!(path = %path.display(), format = ?format, "loading settings file");
	format.parse(&content)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Sample {
		name: String,
	}

	#[rstest]
	#[case("a.toml", Some(SettingsFormat::Toml))]
	#[case("dir/a.json", Some(SettingsFormat::Json))]
	#[case("a.yml", None)]
	#[case("no_extension", None)]
	fn test_format_from_path(#[case] path: &str, #[case] expected: Option<SettingsFormat>) {
		assert_eq!(SettingsFormat::from_path(path).ok(), expected);
	}

	#[rstest]
	fn test_parse_both_formats() {
		let from_toml: Sample = SettingsFormat::Toml.parse("name = \"chat\"").unwrap();
		let from_json: Sample = SettingsFormat::Json.parse(r#"{"name": "chat"}"#).unwrap();

		assert_eq!(from_toml, from_json);
	}

	#[rstest]
	fn test_parse_errors_keep_their_format() {
		let toml_err = SettingsFormat::Toml.parse::<Sample>("name = ").unwrap_err();
		let json_err = SettingsFormat::Json.parse::<Sample>("{").unwrap_err();

		assert!(matches!(toml_err, SettingsError::Toml(_)));
		assert!(matches!(json_err, SettingsError::Json(_)));
	}
}
