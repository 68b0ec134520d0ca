//! Strongly typed provider identifier enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Provider identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier a provider registers under and the dispatcher routes by.
///
/// The value is the same string the login return URL carries in its
/// `provider` query parameter, so it is validated to stay URL- and
/// log-friendly: non-empty, whitespace-free, and bounded in length.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);
impl ProviderId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProviderId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProviderId> for String {
	fn from(value: ProviderId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ProviderId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
