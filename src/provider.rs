//! Uniform login-provider contract and the scheme implementations behind it.
//!
//! `oauth2` implements the standard authorization-code grant, `wallet` a
//! challenge/code scheme driven by an external signing portal, and `registry`
//! the name-based lookup the dispatcher routes login callbacks through. All
//! three operations of the contract surface failures through the broker error
//! taxonomy; nothing is retried or swallowed inside a provider.

pub mod oauth2;
pub mod registry;
pub mod wallet;

pub use oauth2::*;
pub use registry::*;
pub use wallet::*;

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, NormalizedIdentity},
};

const BODY_PREVIEW_LIMIT: usize = 2048;
const STATE_LEN: usize = 32;

/// Future returned by the network operations of [`LoginProvider`].
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Capability set every authentication scheme implements.
///
/// A login transaction walks the three operations in order: the caller
/// redirects the user to [`login_url`](LoginProvider::login_url), receives an
/// opaque one-time code on the return path, exchanges it for an
/// [`AccessToken`], and resolves the token into a [`NormalizedIdentity`].
/// Providers are immutable after construction, so one instance safely serves
/// any number of concurrent transactions.
///
/// Both network operations validate that their input is non-empty and fail
/// without making a round-trip; beyond that, codes and tokens are forwarded
/// verbatim. A code is single-use; callers must not retry an exchange once the
/// external system may have consumed it.
pub trait LoginProvider: Send + Sync {
	/// Absolute URL to redirect the user to for this scheme.
	///
	/// Pure function of configuration: no network call, no side effects.
	/// Consecutive calls yield functionally equivalent URLs, differing at most
	/// in an explicitly-random anti-forgery parameter.
	fn login_url(&self) -> Url;

	/// Exchanges a one-time authorization code for a bearer credential.
	fn exchange_code<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, AccessToken>;

	/// Resolves a bearer credential into the normalized identity shape.
	fn fetch_identity<'a>(
		&'a self,
		token: &'a AccessToken,
	) -> ProviderFuture<'a, NormalizedIdentity>;
}

/// Builds the shared login return URL: `{base}/auth?provider=<id>`.
///
/// The external system appends `&code=...` on redirect; the dispatcher reads
/// the `provider` value back to route the callback. The OAuth2 provider reuses
/// the exact string on both grant legs, as the grant's redirect-matching rule
/// requires.
pub(crate) fn login_return_url(base: &Url, provider: &str) -> Url {
	let mut url = base.clone();
	let path = format!("{}/auth", base.path().trim_end_matches('/'));

	url.set_path(&path);
	url.set_query(None);

	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("provider", provider);

	drop(pairs);

	url
}

/// Generates the anti-forgery `state` value appended to authorization URLs.
pub(crate) fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

/// Decodes a JSON payload with path-aware error context.
pub(crate) fn decode_json<T>(
	body: &str,
) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: serde::de::DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

/// Truncates an upstream response body to a bounded diagnostic preview.
pub(crate) fn body_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

#[cfg(test)]
pub(crate) mod tests_support {
	//! Canned transport shared by provider unit tests.

	// self
	use crate::{
		_prelude::*,
		auth::AccessToken,
		http::{HttpTransport, TransportFuture, TransportResponse},
	};

	/// Transport that answers every request with one canned response while
	/// recording what the provider sent.
	pub(crate) struct StubTransport {
		status: u16,
		body: String,
		calls: RwLock<usize>,
		last_form: RwLock<Option<Vec<(String, String)>>>,
		last_bearer: RwLock<Option<String>>,
	}
	impl StubTransport {
		pub(crate) fn respond(status: u16, body: &str) -> Self {
			Self {
				status,
				body: body.to_owned(),
				calls: RwLock::new(0),
				last_form: RwLock::new(None),
				last_bearer: RwLock::new(None),
			}
		}

		pub(crate) fn calls(&self) -> usize {
			*self.calls.read()
		}

		pub(crate) fn last_form(&self) -> Option<Vec<(String, String)>> {
			self.last_form.read().clone()
		}

		pub(crate) fn last_bearer(&self) -> Option<String> {
			self.last_bearer.read().clone()
		}

		fn canned(&self) -> TransportResponse {
			TransportResponse { status: self.status, body: self.body.clone() }
		}
	}
	impl HttpTransport for StubTransport {
		fn post_form<'a>(
			&'a self,
			_url: &'a Url,
			form: &'a [(&'static str, &'a str)],
		) -> TransportFuture<'a> {
			*self.calls.write() += 1;
			*self.last_form.write() =
				Some(form.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect());

			let response = self.canned();

			Box::pin(async move { Ok(response) })
		}

		fn get_bearer<'a>(&'a self, _url: &'a Url, token: &'a AccessToken) -> TransportFuture<'a> {
			*self.calls.write() += 1;
			*self.last_bearer.write() = Some(token.expose().to_owned());

			let response = self.canned();

			Box::pin(async move { Ok(response) })
		}
	}
}
