//! Pluggable login-provider toolkit: one authorization-URL, code-exchange, and identity-fetch
//! contract over OAuth 2.0 and wallet-style schemes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for provider tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ConfigMap,
		http::{HttpTransport, ReqwestTransport},
		provider::{
			oauth2::{OAuth2Provider, OAuth2Settings},
			wallet::{SignerStatus, WalletProvider, WalletSettings},
		},
	};

	/// Application base URL shared by all provider fixtures.
	pub const TEST_APP_URL: &str = "https://app.example.com";

	/// Builds a plain reqwest transport for httpmock-backed tests.
	pub fn test_reqwest_transport() -> Arc<dyn HttpTransport> {
		Arc::new(ReqwestTransport::with_client(ReqwestClient::default()))
	}

	/// Assembles a complete OAuth2 configuration whose provider endpoints live under `base`.
	pub fn oauth2_test_config(base: &str) -> ConfigMap {
		ConfigMap::default()
			.with("OAUTH_AUTHORIZE_URL", format!("{base}/authorize"))
			.with("OAUTH_TOKEN_URL", format!("{base}/token"))
			.with("OAUTH_USERINFO_URL", format!("{base}/userinfo"))
			.with("OAUTH_CLIENT_ID", "client-test")
			.with("OAUTH_CLIENT_SECRET", "secret-test")
			.with("APP_URL", TEST_APP_URL)
	}

	/// Assembles a complete wallet configuration whose portal and verifier live under `base`.
	pub fn wallet_test_config(base: &str) -> ConfigMap {
		ConfigMap::default()
			.with("WALLET_PORTAL_URL", format!("{base}/portal"))
			.with("WALLET_VERIFY_URL", format!("{base}/verify"))
			.with("APP_URL", TEST_APP_URL)
	}

	/// Constructs an OAuth2 provider wired to the mock endpoints under `base`.
	pub fn build_oauth2_test_provider(base: &str) -> OAuth2Provider {
		let settings = OAuth2Settings::from_config(&oauth2_test_config(base))
			.expect("OAuth2 test configuration should be complete.");

		OAuth2Provider::new(settings, test_reqwest_transport())
	}

	/// Constructs a wallet provider with the provided signer status as its probe.
	pub fn build_wallet_test_provider(base: &str, signer: SignerStatus) -> WalletProvider {
		let settings = WalletSettings::from_config(&wallet_test_config(base))
			.expect("Wallet test configuration should be complete.");

		WalletProvider::new(settings, Arc::new(signer), test_reqwest_transport())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
