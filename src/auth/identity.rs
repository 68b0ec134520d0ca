//! Provider-agnostic identity shape produced by every login scheme.

// self
use crate::_prelude::*;

/// Minimal normalized identity a provider resolves a login to.
///
/// `id` is provider-stable: the same external account yields the same value
/// across logins, so downstream user records can link against it. `email` is
/// the authoritative address to match existing records by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
	/// Stable external account identifier.
	pub id: String,
	/// E-mail address asserted by the identity provider.
	pub email: String,
}
