//! Secure access-token wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Opaque bearer credential returned by a code exchange.
///
/// The token is used exactly once, to fetch the identity, and is never cached
/// or refreshed by this crate. Formatters redact the inner value so the
/// credential cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the wrapped credential is blank.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = AccessToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "AccessToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "super-secret");
	}
}
