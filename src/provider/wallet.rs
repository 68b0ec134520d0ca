//! Wallet-style challenge/code provider driven by an external signing portal.
//!
//! The scheme is not OAuth: an external portal runs a signature ceremony (or a
//! hosted code-entry fallback when no signer is available) and redirects back
//! with a one-time code. The three-operation contract is preserved anyway so
//! the dispatcher needs no scheme-specific branching; the exchange leg is the
//! degenerate case the contract permits for schemes whose code already is the
//! credential.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, NormalizedIdentity},
	config::ConfigMap,
	error::{ConfigError, IdentityFetchError, TokenExchangeError},
	http::HttpTransport,
	obs::{self, LoginOutcome, LoginSpan, LoginStage},
	provider::{LoginProvider, ProviderFuture, body_preview, decode_json},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

const PORTAL_URL_KEY: &str = "WALLET_PORTAL_URL";
const VERIFY_URL_KEY: &str = "WALLET_VERIFY_URL";
const APP_URL_KEY: &str = "APP_URL";

/// Result of probing for a local signing capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerStatus {
	/// A signer is present; the portal can run the signature ceremony.
	Available,
	/// No signer is present; the user is routed into the hosted code flow.
	Unavailable,
}

/// Runtime probe for an optional signing capability (hardware key, extension).
///
/// The probe result is data, not an exception: the unavailable branch
/// deterministically falls back to the same code-based flow, and the rest of
/// the pipeline never notices because it only ever sees a code.
pub trait SignerProbe: Send + Sync {
	/// Reports whether a signer is currently available.
	fn probe(&self) -> SignerStatus;
}
impl SignerProbe for SignerStatus {
	fn probe(&self) -> SignerStatus {
		*self
	}
}

/// Immutable settings the wallet provider is constructed with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSettings {
	/// External portal that mints the one-time code.
	pub portal_url: Url,
	/// Verifier endpoint that resolves a code into an identity.
	pub verify_url: Url,
	/// Application return URL the portal redirects back to.
	pub return_url: Url,
}
impl WalletSettings {
	/// Configuration keys [`WalletSettings::from_config`] requires.
	pub const REQUIRED_KEYS: [&'static str; 3] = [PORTAL_URL_KEY, VERIFY_URL_KEY, APP_URL_KEY];

	/// Validates and binds every required key, failing fast on the first gap.
	pub fn from_config(config: &ConfigMap) -> Result<Self, ConfigError> {
		let portal_url = config.require_url(PORTAL_URL_KEY)?;
		let verify_url = config.require_url(VERIFY_URL_KEY)?;
		let app_url = config.require_url(APP_URL_KEY)?;
		let return_url = super::login_return_url(&app_url, WalletProvider::ID);

		Ok(Self { portal_url, verify_url, return_url })
	}
}

/// Verifier response subset mapped into [`NormalizedIdentity`].
#[derive(Deserialize)]
struct WalletIdentityPayload {
	address: String,
	email: String,
}

/// Challenge/code wallet provider.
#[derive(Clone)]
pub struct WalletProvider {
	/// Validated settings the provider owns exclusively.
	pub settings: WalletSettings,
	probe: Arc<dyn SignerProbe>,
	transport: Arc<dyn HttpTransport>,
}
impl WalletProvider {
	/// Name the provider registers under and the return URL selects.
	pub const ID: &'static str = "wallet";

	/// Creates a provider from validated settings, a signer probe, and a transport.
	pub fn new(
		settings: WalletSettings,
		probe: Arc<dyn SignerProbe>,
		transport: Arc<dyn HttpTransport>,
	) -> Self {
		Self { settings, probe, transport }
	}

	/// Creates a provider from configuration, provisioning the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn from_config(config: &ConfigMap, probe: Arc<dyn SignerProbe>) -> Result<Self> {
		let settings = WalletSettings::from_config(config)?;
		let transport = Arc::new(ReqwestTransport::new()?);

		Ok(Self::new(settings, probe, transport))
	}

	async fn fetch_identity_inner(&self, token: &AccessToken) -> Result<NormalizedIdentity> {
		if token.is_empty() {
			return Err(IdentityFetchError::EmptyToken.into());
		}

		let response = self.transport.get_bearer(&self.settings.verify_url, token).await?;

		if !response.is_success() {
			return Err(IdentityFetchError::Endpoint {
				status: response.status,
				body: body_preview(response.body),
			}
			.into());
		}

		let payload = decode_json::<WalletIdentityPayload>(&response.body)
			.map_err(|source| IdentityFetchError::Parse { source, status: response.status })?;

		if payload.address.is_empty() {
			return Err(IdentityFetchError::EmptyField { field: "address" }.into());
		}
		if payload.email.is_empty() {
			return Err(IdentityFetchError::EmptyField { field: "email" }.into());
		}

		Ok(NormalizedIdentity { id: payload.address, email: payload.email })
	}
}
impl LoginProvider for WalletProvider {
	fn login_url(&self) -> Url {
		let _guard = LoginSpan::new(LoginStage::Authorize, Self::ID).entered();
		let flow = match self.probe.probe() {
			SignerStatus::Available => "signature",
			SignerStatus::Unavailable => "code",
		};
		let mut url = self.settings.portal_url.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("flow", flow);
		pairs.append_pair("return_to", self.settings.return_url.as_str());

		drop(pairs);

		url
	}

	fn exchange_code<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, AccessToken> {
		const STAGE: LoginStage = LoginStage::Exchange;

		let span = LoginSpan::new(STAGE, Self::ID);

		Box::pin(span.instrument(async move {
			obs::record_login_outcome(STAGE, LoginOutcome::Attempt);

			// The portal's one-time code doubles as the bearer credential; the
			// verifier consumes it during the identity fetch.
			if code.trim().is_empty() {
				obs::record_login_outcome(STAGE, LoginOutcome::Failure);

				return Err(TokenExchangeError::EmptyCode.into());
			}

			obs::record_login_outcome(STAGE, LoginOutcome::Success);

			Ok(AccessToken::new(code))
		}))
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
impl Debug for WalletProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WalletProvider")
			.field("settings", &self.settings)
			.field("signer", &self.probe.probe())
			.finish()
	}
}
