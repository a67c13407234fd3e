//! Settings errors.

use parley_router::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised while loading settings or building a router from them.
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Unsupported settings file: {}", .0.display())]
	UnsupportedFormat(PathBuf),

	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
}
