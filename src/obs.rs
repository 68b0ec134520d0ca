//! Optional observability helpers for login providers.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `identity_broker.login` with the `stage`
//!   (contract operation) and `provider` (scheme label) fields.
//! - Enable `metrics` to increment the `identity_broker_login_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login contract operations observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginStage {
	/// Authorization URL construction.
	Authorize,
	/// Code-for-token exchange.
	Exchange,
	/// Identity fetch with the exchanged token.
	Identity,
}
impl LoginStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginStage::Authorize => "authorize",
			LoginStage::Exchange => "exchange",
			LoginStage::Identity => "identity",
		}
	}
}
impl Display for LoginStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl LoginOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginOutcome::Attempt => "attempt",
			LoginOutcome::Success => "success",
			LoginOutcome::Failure => "failure",
		}
	}
}
impl Display for LoginOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
