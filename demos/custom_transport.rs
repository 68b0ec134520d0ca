//! Demonstrates wiring a custom HTTP transport into a provider.
//!
//! 1. Implement [`HttpTransport`] for whatever stack executes the requests.
//! 2. Hand the transport to [`OAuth2Provider::new`] in place of the default reqwest one.
//! 3. Surface transport-level failures as [`TransportError`] values so callers can still
//!    tell retry-candidates from upstream rejections.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use identity_broker::{
	auth::AccessToken,
	config::ConfigMap,
	error::TransportError,
	http::{HttpTransport, TransportFuture, TransportResponse},
	provider::{LoginProvider, OAuth2Provider, OAuth2Settings},
};

#[derive(Clone)]
enum MockBehavior {
	Success,
	Timeout,
}

struct MockTransport {
	behavior: MockBehavior,
}
impl MockTransport {
	fn canned(&self, body: &str) -> TransportFuture<'_> {
		let behavior = self.behavior.clone();
		let body = body.to_owned();

		Box::pin(async move {
			match behavior {
				MockBehavior::Success => Ok(TransportResponse { status: 200, body }),
				MockBehavior::Timeout => Err(TransportError::Timeout),
			}
		})
	}
}
impl HttpTransport for MockTransport {
	fn post_form<'a>(
		&'a self,
		_url: &'a Url,
		_form: &'a [(&'static str, &'a str)],
	) -> TransportFuture<'a> {
		self.canned("{\"access_token\":\"mock-access\",\"token_type\":\"bearer\"}")
	}

	fn get_bearer<'a>(&'a self, _url: &'a Url, _token: &'a AccessToken) -> TransportFuture<'a> {
		self.canned("{\"sub\":\"u-1\",\"email\":\"demo@example.com\"}")
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ConfigMap::default()
		.with("OAUTH_AUTHORIZE_URL", "https://provider.example.com/authorize")
		.with("OAUTH_TOKEN_URL", "https://provider.example.com/token")
		.with("OAUTH_USERINFO_URL", "https://provider.example.com/userinfo")
		.with("OAUTH_CLIENT_ID", "demo-client")
		.with("OAUTH_CLIENT_SECRET", "demo-secret")
		.with("APP_URL", "https://app.example.com");
	let settings = OAuth2Settings::from_config(&config)?;
	let provider = OAuth2Provider::new(
		settings.clone(),
		Arc::new(MockTransport { behavior: MockBehavior::Success }),
	);
	let token = provider.exchange_code("demo-code").await?;

	println!("Access token issued by the mock transport: {}.", token.expose());

	let identity = provider.fetch_identity(&token).await?;

	println!("Resolved identity {} <{}>.", identity.id, identity.email);

	let hanging =
		OAuth2Provider::new(settings, Arc::new(MockTransport { behavior: MockBehavior::Timeout }));

	match hanging.exchange_code("demo-code").await {
		Ok(_) => println!("Mock transport unexpectedly succeeded."),
		Err(e) => println!("Timeout mapped into the broker taxonomy: {e}"),
	}

	Ok(())
}
