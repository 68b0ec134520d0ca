//! Authorization-code grant provider for standards-based OAuth 2.0 identity systems.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, NormalizedIdentity},
	config::ConfigMap,
	error::{ConfigError, IdentityFetchError, TokenExchangeError},
	http::HttpTransport,
	obs::{self, LoginOutcome, LoginSpan, LoginStage},
	provider::{LoginProvider, ProviderFuture, body_preview, decode_json, random_state},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

const AUTHORIZE_URL_KEY: &str = "OAUTH_AUTHORIZE_URL";
const TOKEN_URL_KEY: &str = "OAUTH_TOKEN_URL";
const USERINFO_URL_KEY: &str = "OAUTH_USERINFO_URL";
const CLIENT_ID_KEY: &str = "OAUTH_CLIENT_ID";
const CLIENT_SECRET_KEY: &str = "OAUTH_CLIENT_SECRET";
const APP_URL_KEY: &str = "APP_URL";

/// Immutable settings the OAuth2 provider is constructed with.
///
/// `return_url` is derived from `APP_URL` once, at construction time, so the
/// `redirect_uri` sent with the authorization URL and the one sent during the
/// code exchange are byte-identical, as the grant's redirect-matching rule requires.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Settings {
	/// Authorization endpoint the user is redirected to.
	pub authorize_url: Url,
	/// Token endpoint used for the code exchange.
	pub token_url: Url,
	/// User-info endpoint queried with the exchanged token.
	pub userinfo_url: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Confidential client secret sent during the code exchange.
	pub client_secret: String,
	/// Application return URL shared by both grant legs.
	pub return_url: Url,
}
impl OAuth2Settings {
	/// Configuration keys [`OAuth2Settings::from_config`] requires.
	pub const REQUIRED_KEYS: [&'static str; 6] = [
		AUTHORIZE_URL_KEY,
		TOKEN_URL_KEY,
		USERINFO_URL_KEY,
		CLIENT_ID_KEY,
		CLIENT_SECRET_KEY,
		APP_URL_KEY,
	];

	/// Validates and binds every required key, failing fast on the first gap.
	pub fn from_config(config: &ConfigMap) -> Result<Self, ConfigError> {
		let authorize_url = config.require_url(AUTHORIZE_URL_KEY)?;
		let token_url = config.require_url(TOKEN_URL_KEY)?;
		let userinfo_url = config.require_url(USERINFO_URL_KEY)?;
		let client_id = config.require(CLIENT_ID_KEY)?.to_owned();
		let client_secret = config.require(CLIENT_SECRET_KEY)?.to_owned();
		let app_url = config.require_url(APP_URL_KEY)?;
		let return_url = super::login_return_url(&app_url, OAuth2Provider::ID);

		Ok(Self { authorize_url, token_url, userinfo_url, client_id, client_secret, return_url })
	}
}
impl Debug for OAuth2Settings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Settings")
			.field("authorize_url", &self.authorize_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.field("userinfo_url", &self.userinfo_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("return_url", &self.return_url.as_str())
			.finish()
	}
}

/// Token endpoint response subset consumed by the exchange leg.
#[derive(Deserialize)]
struct TokenPayload {
	access_token: String,
}

/// User-info response subset mapped into [`NormalizedIdentity`].
#[derive(Deserialize)]
struct UserInfoPayload {
	sub: String,
	email: String,
}

/// Standards-based OAuth 2.0 authorization-code provider.
#[derive(Clone)]
pub struct OAuth2Provider {
	/// Validated settings the provider owns exclusively.
	pub settings: OAuth2Settings,
	transport: Arc<dyn HttpTransport>,
}
impl OAuth2Provider {
	/// Name the provider registers under and the return URL selects.
	pub const ID: &'static str = "oauth2";
	/// Fixed scope set requested with every authorization URL.
	pub const SCOPES: [&'static str; 3] = ["openid", "profile", "email"];

	/// Creates a provider from validated settings and a caller-provided transport.
	pub fn new(settings: OAuth2Settings, transport: Arc<dyn HttpTransport>) -> Self {
		Self { settings, transport }
	}

	/// Creates a provider from configuration, provisioning the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn from_config(config: &ConfigMap) -> Result<Self> {
		let settings = OAuth2Settings::from_config(config)?;
		let transport = Arc::new(ReqwestTransport::new()?);

		Ok(Self::new(settings, transport))
	}

	async fn exchange_code_inner(&self, code: &str) -> Result<AccessToken> {
		if code.trim().is_empty() {
			return Err(TokenExchangeError::EmptyCode.into());
		}

		let form = [
			("grant_type", "authorization_code"),
			("client_id", self.settings.client_id.as_str()),
			("client_secret", self.settings.client_secret.as_str()),
			("code", code),
			("redirect_uri", self.settings.return_url.as_str()),
		];
		let response = self.transport.post_form(&self.settings.token_url, &form).await?;

		if !response.is_success() {
			return Err(TokenExchangeError::Endpoint {
				status: response.status,
				body: body_preview(response.body),
			}
			.into());
		}

		let payload = decode_json::<TokenPayload>(&response.body)
			.map_err(|source| TokenExchangeError::Parse { source, status: response.status })?;

		if payload.access_token.is_empty() {
			return Err(TokenExchangeError::MissingAccessToken { status: response.status }.into());
		}

		Ok(AccessToken::new(payload.access_token))
	}

	async fn fetch_identity_inner(&self, token: &AccessToken) -> Result<NormalizedIdentity> {
		if token.is_empty() {
			return Err(IdentityFetchError::EmptyToken.into());
		}

		let response = self.transport.get_bearer(&self.settings.userinfo_url, token).await?;

		if !response.is_success() {
			return Err(IdentityFetchError::Endpoint {
				status: response.status,
				body: body_preview(response.body),
			}
			.into());
		}

		let payload = decode_json::<UserInfoPayload>(&response.body)
			.map_err(|source| IdentityFetchError::Parse { source, status: response.status })?;

		if payload.sub.is_empty() {
			return Err(IdentityFetchError::EmptyField { field: "sub" }.into());
		}
		if payload.email.is_empty() {
			return Err(IdentityFetchError::EmptyField { field: "email" }.into());
		}

		Ok(NormalizedIdentity { id: payload.sub, email: payload.email })
	}
}
impl LoginProvider for OAuth2Provider {
	fn login_url(&self) -> Url {
		let _guard = LoginSpan::new(LoginStage::Authorize, Self::ID).entered();
		let mut url = self.settings.authorize_url.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.settings.client_id);
		pairs.append_pair("scope", &Self::SCOPES.join(" "));
		pairs.append_pair("redirect_uri", self.settings.return_url.as_str());
		pairs.append_pair("state", &random_state());

		drop(pairs);

		url
	}

	fn exchange_code<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, AccessToken> {
		const STAGE: LoginStage = LoginStage::Exchange;

		let span = LoginSpan::new(STAGE, Self::ID);

		Box::pin(async move {
			obs::record_login_outcome(STAGE, LoginOutcome::Attempt);

			let result = span.instrument(self.exchange_code_inner(code)).await;

			match &result {
				Ok(_) => obs::record_login_outcome(STAGE, LoginOutcome::Success),
				Err(_) => obs::record_login_outcome(STAGE, LoginOutcome::Failure),
			}

			result
		})
	}

	fn fetch_identity<'a>(
		&'a self,
		token: &'a AccessToken,
	) -> ProviderFuture<'a, NormalizedIdentity> {
		const STAGE: LoginStage = LoginStage::Identity;

		let span = LoginSpan::new(STAGE, Self::ID);

		Box::pin(async move {
			obs::record_login_outcome(STAGE, LoginOutcome::Attempt);

			let result = span.instrument(self.fetch_identity_inner(token)).await;

			match &result {
				Ok(_) => obs::record_login_outcome(STAGE, LoginOutcome::Success),
				Err(_) => obs::record_login_outcome(STAGE, LoginOutcome::Failure),
			}

			result
		})
	}
}
impl Debug for OAuth2Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Provider").field("settings", &self.settings).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::Error, provider::tests_support::StubTransport};

	fn test_config() -> ConfigMap {
		ConfigMap::default()
			.with(AUTHORIZE_URL_KEY, "https://provider.example.com/authorize")
			.with(TOKEN_URL_KEY, "https://provider.example.com/token")
			.with(USERINFO_URL_KEY, "https://provider.example.com/userinfo")
			.with(CLIENT_ID_KEY, "client-test")
			.with(CLIENT_SECRET_KEY, "secret-test")
			.with(APP_URL_KEY, "https://app.example.com")
	}

	fn provider_with(stub: Arc<StubTransport>) -> OAuth2Provider {
		let settings = OAuth2Settings::from_config(&test_config())
			.expect("OAuth2 test configuration should be complete.");

		OAuth2Provider::new(settings, stub)
	}

	#[test]
	fn settings_derive_the_shared_return_url() {
		let settings = OAuth2Settings::from_config(&test_config())
			.expect("OAuth2 test configuration should be complete.");

		assert_eq!(settings.return_url.as_str(), "https://app.example.com/auth?provider=oauth2");
	}

	#[test]
	fn settings_debug_redacts_the_client_secret() {
		let settings = OAuth2Settings::from_config(&test_config())
			.expect("OAuth2 test configuration should be complete.");
		let rendered = format!("{settings:?}");

		assert!(!rendered.contains("secret-test"));
		assert!(rendered.contains("client_secret_set: true"));
	}

	#[test]
	fn login_url_carries_grant_parameters_and_fresh_state() {
		let provider = provider_with(Arc::new(StubTransport::respond(200, "{}")));
		let url = provider.login_url();
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert!(url.as_str().starts_with("https://provider.example.com/authorize?"));
		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("client_id"), Some(&"client-test".into()));
		assert_eq!(pairs.get("scope"), Some(&"openid profile email".into()));
		assert_eq!(
			pairs.get("redirect_uri"),
			Some(&provider.settings.return_url.as_str().to_owned())
		);
		assert_eq!(pairs.get("state").map(String::len), Some(32));

		let stable = |url: Url| {
			let mut pairs: Vec<_> = url.query_pairs().into_owned().collect();

			pairs.retain(|(key, _)| key != "state");

			pairs
		};

		assert_eq!(stable(provider.login_url()), stable(provider.login_url()));
	}

	#[tokio::test]
	async fn exchange_posts_the_byte_identical_redirect_uri() {
		let stub = Arc::new(StubTransport::respond(200, "{\"access_token\":\"abc123\"}"));
		let provider = provider_with(stub.clone());
		let token = provider
			.exchange_code("validcode")
			.await
			.expect("Stubbed token exchange should succeed.");

		assert_eq!(token.expose(), "abc123");

		let form = stub.last_form().expect("Exchange should submit a form body.");

		assert!(form.contains(&("grant_type".into(), "authorization_code".into())));
		assert!(form.contains(&("code".into(), "validcode".into())));
		assert!(form.contains(&(
			"redirect_uri".into(),
			provider.settings.return_url.as_str().to_owned()
		)));
	}

	#[tokio::test]
	async fn exchange_surfaces_upstream_rejections_with_body() {
		let stub = Arc::new(StubTransport::respond(400, "invalid_grant"));
		let provider = provider_with(stub);
		let err = provider
			.exchange_code("stale-code")
			.await
			.expect_err("Upstream rejection should fail the exchange.");

		assert!(matches!(
			err,
			Error::TokenExchange(TokenExchangeError::Endpoint { status: 400, .. })
		));
		assert!(err.to_string().contains("invalid_grant"));
	}

	#[tokio::test]
	async fn exchange_rejects_blank_codes_without_a_network_call() {
		let stub = Arc::new(StubTransport::respond(200, "{\"access_token\":\"abc123\"}"));
		let provider = provider_with(stub.clone());
		let err = provider
			.exchange_code("  ")
			.await
			.expect_err("Blank codes should be rejected locally.");

		assert!(matches!(err, Error::TokenExchange(TokenExchangeError::EmptyCode)));
		assert_eq!(stub.calls(), 0, "No request may be issued for a blank code.");
	}

	#[tokio::test]
	async fn exchange_fails_on_payloads_without_a_token_field() {
		let stub = Arc::new(StubTransport::respond(200, "{\"token_type\":\"bearer\"}"));
		let provider = provider_with(stub);
		let err = provider
			.exchange_code("validcode")
			.await
			.expect_err("A payload without access_token should fail.");

		assert!(matches!(err, Error::TokenExchange(TokenExchangeError::Parse { .. })));
	}

	#[tokio::test]
	async fn exchange_rejects_blank_token_values() {
		let stub = Arc::new(StubTransport::respond(200, "{\"access_token\":\"\"}"));
		let provider = provider_with(stub);
		let err = provider
			.exchange_code("validcode")
			.await
			.expect_err("A blank access_token should fail.");

		assert!(matches!(
			err,
			Error::TokenExchange(TokenExchangeError::MissingAccessToken { status: 200 })
		));
	}

	#[tokio::test]
	async fn fetch_identity_maps_subject_and_email() {
		let stub = Arc::new(StubTransport::respond(200, "{\"sub\":\"u-1\",\"email\":\"a@b.com\"}"));
		let provider = provider_with(stub.clone());
		let token = AccessToken::new("abc123");
		let identity = provider
			.fetch_identity(&token)
			.await
			.expect("Stubbed identity fetch should succeed.");

		assert_eq!(identity, NormalizedIdentity { id: "u-1".into(), email: "a@b.com".into() });
		assert_eq!(stub.last_bearer().as_deref(), Some("abc123"));
	}

	#[tokio::test]
	async fn fetch_identity_rejects_blank_identity_fields() {
		let stub = Arc::new(StubTransport::respond(200, "{\"sub\":\"\",\"email\":\"a@b.com\"}"));
		let provider = provider_with(stub);
		let err = provider
			.fetch_identity(&AccessToken::new("abc123"))
			.await
			.expect_err("A blank subject should fail instead of defaulting.");

		assert!(matches!(
			err,
			Error::IdentityFetch(IdentityFetchError::EmptyField { field: "sub" })
		));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn from_config_provisions_the_default_transport() {
		use crate::_preludet;

		let provider = _preludet::build_oauth2_test_provider("https://provider.example.com");

		assert_eq!(provider.settings.client_id, "client-test");

		OAuth2Provider::from_config(&_preludet::oauth2_test_config(
			"https://provider.example.com",
		))
		.expect("Complete configuration should provision a provider.");
	}
}
