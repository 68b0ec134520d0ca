//! Walks through assembling both providers from an injected configuration and printing the
//! login URLs a frontend would render behind its buttons.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use identity_broker::{
	auth::ProviderId,
	config::ConfigMap,
	provider::{LoginProvider, OAuth2Provider, ProviderRegistry, SignerStatus, WalletProvider},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ConfigMap::default()
		.with("OAUTH_AUTHORIZE_URL", "https://provider.example.com/authorize")
		.with("OAUTH_TOKEN_URL", "https://provider.example.com/token")
		.with("OAUTH_USERINFO_URL", "https://provider.example.com/userinfo")
		.with("OAUTH_CLIENT_ID", "demo-client")
		.with("OAUTH_CLIENT_SECRET", "demo-secret")
		.with("WALLET_PORTAL_URL", "https://portal.example.com/wallet")
		.with("WALLET_VERIFY_URL", "https://verifier.example.com/identity")
		.with("APP_URL", "https://app.example.com");
	let registry = ProviderRegistry::default();

	registry.register(
		ProviderId::new(OAuth2Provider::ID)?,
		Arc::new(OAuth2Provider::from_config(&config)?),
	);
	// No signer is attached in this walkthrough, so the wallet button degrades
	// into the hosted code flow instead of failing outright.
	registry.register(
		ProviderId::new(WalletProvider::ID)?,
		Arc::new(WalletProvider::from_config(&config, Arc::new(SignerStatus::Unavailable))?),
	);

	for id in registry.ids() {
		if let Some(provider) = registry.get(&id) {
			println!("Send `{id}` logins to {}.", provider.login_url());
		}
	}

	println!("Each URL returns to APP_URL/auth with `provider` and `code` query parameters.");

	Ok(())
}
