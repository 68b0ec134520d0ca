// self
use identity_broker::{
	config::ConfigMap,
	error::ConfigError,
	provider::{OAuth2Settings, WalletSettings},
};

fn complete_oauth2_config() -> ConfigMap {
	ConfigMap::default()
		.with("OAUTH_AUTHORIZE_URL", "https://provider.example.com/authorize")
		.with("OAUTH_TOKEN_URL", "https://provider.example.com/token")
		.with("OAUTH_USERINFO_URL", "https://provider.example.com/userinfo")
		.with("OAUTH_CLIENT_ID", "client-test")
		.with("OAUTH_CLIENT_SECRET", "secret-test")
		.with("APP_URL", "https://app.example.com")
}

fn complete_wallet_config() -> ConfigMap {
	ConfigMap::default()
		.with("WALLET_PORTAL_URL", "https://portal.example.com/wallet")
		.with("WALLET_VERIFY_URL", "https://verifier.example.com/identity")
		.with("APP_URL", "https://app.example.com")
}

#[test]
fn oauth2_construction_fails_naming_each_missing_key() {
	OAuth2Settings::from_config(&complete_oauth2_config())
		.expect("The complete configuration should construct settings.");

	for missing in OAuth2Settings::REQUIRED_KEYS {
		let err = OAuth2Settings::from_config(&complete_oauth2_config().without(missing))
			.expect_err("An incomplete configuration must fail at construction time.");

		assert!(
			matches!(err, ConfigError::MissingKey { key } if key == missing),
			"Removing `{missing}` should name exactly that key, got: {err}."
		);
	}
}

#[test]
fn wallet_construction_fails_naming_each_missing_key() {
	WalletSettings::from_config(&complete_wallet_config())
		.expect("The complete configuration should construct settings.");

	for missing in WalletSettings::REQUIRED_KEYS {
		let err = WalletSettings::from_config(&complete_wallet_config().without(missing))
			.expect_err("An incomplete configuration must fail at construction time.");

		assert!(
			matches!(err, ConfigError::MissingKey { key } if key == missing),
			"Removing `{missing}` should name exactly that key, got: {err}."
		);
	}
}

#[test]
fn blank_values_count_as_missing() {
	for blank in OAuth2Settings::REQUIRED_KEYS {
		let err = OAuth2Settings::from_config(&complete_oauth2_config().with(blank, "  "))
			.expect_err("A blank value must fail like an absent one.");

		assert!(matches!(err, ConfigError::MissingKey { key } if key == blank));
	}
}

#[test]
fn non_url_values_fail_naming_the_key() {
	let err =
		OAuth2Settings::from_config(&complete_oauth2_config().with("OAUTH_TOKEN_URL", "not a url"))
			.expect_err("A malformed endpoint URL must fail at construction time.");

	assert!(matches!(err, ConfigError::InvalidUrl { key: "OAUTH_TOKEN_URL", .. }));
	assert!(err.to_string().contains("OAUTH_TOKEN_URL"));

	let err = WalletSettings::from_config(&complete_wallet_config().with("APP_URL", "/relative"))
		.expect_err("A relative application URL must fail at construction time.");

	assert!(matches!(err, ConfigError::InvalidUrl { key: "APP_URL", .. }));
}
