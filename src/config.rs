//! Injected configuration source and fail-fast lookup helpers.
//!
//! Providers never read process globals directly; the caller snapshots the
//! environment (or assembles a map by hand) into a [`ConfigMap`] and passes it
//! to the provider constructors. Each provider variant declares its own
//! required key set, so an incomplete configuration fails at construction time
//! with the exact missing key named, never on first use.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Ordered key/value configuration source, equivalent to a process environment.
///
/// Blank values count as unset: an exported-but-empty variable must not
/// produce a half-configured provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap(BTreeMap<String, String>);
impl ConfigMap {
	/// Snapshots the current process environment.
	pub fn from_env() -> Self {
		Self(env::vars().collect())
	}

	/// Adds or replaces a key, consuming and returning the map for chaining.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());

		self
	}

	/// Removes a key, consuming and returning the map for chaining.
	pub fn without(mut self, key: &str) -> Self {
		self.0.remove(key);

		self
	}

	/// Returns the raw value for `key`, blank values included.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns the value for `key` or fails naming the key.
	pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
		self.get(key)
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.ok_or(ConfigError::MissingKey { key })
	}

	/// Returns the value for `key` parsed as an absolute URL.
	pub fn require_url(&self, key: &'static str) -> Result<Url, ConfigError> {
		let raw = self.require(key)?;

		Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { key, source })
	}
}
