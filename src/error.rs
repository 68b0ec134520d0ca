//! Broker-level error types shared across providers, configuration, and transports.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected at provider construction time.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint rejected or mangled the code exchange.
	#[error(transparent)]
	TokenExchange(#[from] TokenExchangeError),
	/// User-info endpoint rejected or mangled the identity fetch.
	#[error(transparent)]
	IdentityFetch(#[from] IdentityFetchError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised while constructing a provider.
///
/// Every variant names the offending key so a provider can never exist in a
/// half-configured state without the caller learning exactly which setting is
/// incomplete.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration key is absent or blank.
	#[error("Configuration key `{key}` is not set.")]
	MissingKey {
		/// Name of the missing key.
		key: &'static str,
	},
	/// A configuration key holds a value that is not a valid URL.
	#[error("Configuration key `{key}` is not a valid URL.")]
	InvalidUrl {
		/// Name of the offending key.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while exchanging an authorization code for an access token.
///
/// None of the variants are retried by the provider; a code may already have
/// been consumed upstream, so retry decisions belong to the caller.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// The caller supplied an empty authorization code; no request was made.
	#[error("Authorization code must not be empty.")]
	EmptyCode,
	/// The token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the exchange ({status}): {body}.")]
	Endpoint {
		/// Upstream HTTP status code.
		status: u16,
		/// Upstream response body, truncated to a diagnostic preview.
		body: String,
	},
	/// The token endpoint returned malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure locating the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Upstream HTTP status code.
		status: u16,
	},
	/// The token endpoint answered successfully but the access token was blank.
	#[error("Token endpoint response carries a blank access_token.")]
	MissingAccessToken {
		/// Upstream HTTP status code.
		status: u16,
	},
}

/// Failures raised while resolving an access token into a normalized identity.
#[derive(Debug, ThisError)]
pub enum IdentityFetchError {
	/// The caller supplied an empty access token; no request was made.
	#[error("Access token must not be empty.")]
	EmptyToken,
	/// The user-info endpoint answered with a non-success status.
	#[error("User-info endpoint rejected the request ({status}): {body}.")]
	Endpoint {
		/// Upstream HTTP status code.
		status: u16,
		/// Upstream response body, truncated to a diagnostic preview.
		body: String,
	},
	/// The user-info endpoint returned malformed JSON or omitted an expected field.
	#[error("User-info endpoint returned a malformed identity payload.")]
	Parse {
		/// Structured parsing failure locating the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Upstream HTTP status code.
		status: u16,
	},
	/// An expected identity field deserialized to an empty string.
	#[error("User-info response field `{field}` is empty.")]
	EmptyField {
		/// Name of the blank field.
		field: &'static str,
	},
}

/// Transport-level failures (network, IO, timeouts).
///
/// Kept apart from the endpoint errors above so callers can tell
/// retry-candidates (the provider was never reached, or never answered) from
/// upstream rejections where the code may already be consumed.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request-level timeout elapsed before the provider answered.
	#[error("Request timed out while waiting for the provider.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
