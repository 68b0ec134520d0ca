//! Simulates the dispatcher side of a login: parse the return URL, resolve the provider by
//! its selector, and walk the code through the exchange and identity legs.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use identity_broker::{
	auth::ProviderId,
	config::ConfigMap,
	provider::{LoginProvider, ProviderRegistry, SignerStatus, WalletProvider},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ConfigMap::default()
		.with("WALLET_PORTAL_URL", "https://portal.example.com/wallet")
		.with("WALLET_VERIFY_URL", "https://verifier.example.com/identity")
		.with("APP_URL", "https://app.example.com");
	let registry = ProviderRegistry::default();

	registry.register(
		ProviderId::new(WalletProvider::ID)?,
		Arc::new(WalletProvider::from_config(&config, Arc::new(SignerStatus::Unavailable))?),
	);

	// The return URL every provider advertises: selector + one-time code.
	let callback = Url::parse("https://app.example.com/auth?provider=wallet&code=demo-code")?;
	let params: HashMap<_, _> = callback.query_pairs().into_owned().collect();
	let (Some(selector), Some(code)) = (params.get("provider"), params.get("code")) else {
		eprintln!("The callback is missing its `provider` or `code` parameter.");

		return Ok(());
	};
	let Some(provider) = registry.get(selector) else {
		eprintln!("No provider is registered under `{selector}`.");

		return Ok(());
	};
	let token = provider.exchange_code(code).await?;

	// Formatters redact credentials, so this prints `<redacted>`.
	println!("Exchanged the one-time code for a bearer credential: {token}.");

	match provider.fetch_identity(&token).await {
		Ok(identity) => println!("Resolved identity {} <{}>.", identity.id, identity.email),
		Err(e) => println!("Identity fetch failed (no live verifier in this demo): {e}"),
	}

	Ok(())
}
