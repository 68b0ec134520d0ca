//! Transport primitives shared by every login provider.
//!
//! The module exposes [`HttpTransport`], the broker's only dependency on an
//! HTTP stack. Providers describe the two request shapes a login transaction
//! needs, a form-encoded POST for the code exchange and a bearer-authorized GET
//! for the identity fetch, and receive the raw status plus body back, so
//! success checks and error context stay with the provider. Downstream crates
//! can integrate custom HTTP clients by implementing the trait.

#[cfg(feature = "reqwest")]
// std
use std::{ops::Deref, time::Duration};
#[cfg(feature = "reqwest")]
// crates.io
use reqwest::{Response, header::ACCEPT, redirect::Policy};
// self
#[cfg(feature = "reqwest")] use crate::error::ConfigError;
use crate::{_prelude::*, auth::AccessToken, error::TransportError};

/// Future returned by [`HttpTransport`] implementations.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Raw outcome of a provider-bound HTTP request.
///
/// Providers inspect the status themselves: a non-success answer is data for
/// the error taxonomy, not a transport failure.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code returned by the endpoint.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl TransportResponse {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing login round-trips.
///
/// Implementations must be `Send + Sync` so one transport can serve many
/// concurrent login transactions; the returned futures must be `Send` so
/// provider futures can hop executors. A transport performs exactly one
/// request per call; retries, if desired, belong to the caller.
pub trait HttpTransport: Send + Sync {
	/// Submits a form-encoded POST and reads the full response.
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [(&'static str, &'a str)],
	) -> TransportFuture<'a>;

	/// Submits a GET carrying `Authorization: Bearer <token>` and reads the full response.
	fn get_bearer<'a>(&'a self, url: &'a Url, token: &'a AccessToken) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestTransport::new`] applies a request-level timeout to both login
/// round-trips (an identity provider that hangs must not hang the caller's
/// login flow) and disables redirect following, matching OAuth 2.0 guidance
/// that token endpoints return results directly instead of delegating to
/// another URI. Configure any custom [`ReqwestClient`] passed through
/// [`ReqwestTransport::with_client`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Request-level timeout applied by [`ReqwestTransport::new`].
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

	/// Builds a transport with the default timeout and no redirect following.
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(Self::DEFAULT_TIMEOUT)
	}

	/// Builds a transport with a caller-chosen request timeout.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn read(response: Response) -> Result<TransportResponse, TransportError> {
		let status = response.status().as_u16();
		let body = response.text().await.map_err(TransportError::from)?;

		Ok(TransportResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [(&'static str, &'a str)],
	) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.post(url.clone())
				.header(ACCEPT, "application/json")
				.form(form)
				.send()
				.await
				.map_err(TransportError::from)?;

			Self::read(response).await
		})
	}

	fn get_bearer<'a>(&'a self, url: &'a Url, token: &'a AccessToken) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.get(url.clone())
				.header(ACCEPT, "application/json")
				.bearer_auth(token.expose())
				.send()
				.await
				.map_err(TransportError::from)?;

			Self::read(response).await
		})
	}
}
