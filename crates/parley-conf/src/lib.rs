//! Declarative settings for Parley routers.
//!
//! Route tables, the history medium, the session key and the login route
//! can be kept in a TOML or JSON file and turned into a validated
//! [`Router`](parley_router::Router):
//!
//! ```
//! use parley_conf::RouterSettings;
//! use parley_router::MemoryStorage;
//!
//! let settings = RouterSettings::from_json_str(r#"{
//! 	"history": "memory",
//! 	"routes": [
//! 		{ "name": "login", "path": "/", "view": "Login" },
//! 		{ "name": "not-found", "path": "/*", "redirect": { "name": "login" } }
//! 	]
//! }"#)
//! .unwrap();
//!
//! let router = settings.build_router(MemoryStorage::new()).unwrap();
//! assert_eq!(router.login_route(), "login");
//! ```

pub mod error;
pub mod settings;
pub mod sources;

pub use error::{SettingsError, SettingsResult};
pub use settings::RouterSettings;
pub use sources::{SettingsFormat, load_file};
