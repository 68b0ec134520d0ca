//! Thread-safe name-to-provider registry backing the login dispatcher.
//!
//! The login return path always carries a `provider` selector; the dispatcher
//! reads it and resolves the provider instance here. Registration happens at
//! startup, lookups happen on every callback, and the handle clones cheaply so
//! one registry can be shared across request handlers.

// self
use crate::{_prelude::*, auth::ProviderId, provider::LoginProvider};

type ProviderMap = Arc<RwLock<HashMap<ProviderId, Arc<dyn LoginProvider>>>>;

/// Shared registry of login providers keyed by their identifier.
#[derive(Clone, Default)]
pub struct ProviderRegistry(ProviderMap);
impl ProviderRegistry {
	/// Registers a provider, returning the instance it displaced, if any.
	pub fn register(
		&self,
		id: ProviderId,
		provider: Arc<dyn LoginProvider>,
	) -> Option<Arc<dyn LoginProvider>> {
		self.0.write().insert(id, provider)
	}

	/// Resolves a provider by the `provider` selector from the return path.
	pub fn get(&self, name: &str) -> Option<Arc<dyn LoginProvider>> {
		self.0.read().get(name).cloned()
	}

	/// Returns the registered identifiers in sorted order.
	pub fn ids(&self) -> Vec<ProviderId> {
		let mut ids: Vec<_> = self.0.read().keys().cloned().collect();

		ids.sort();

		ids
	}

	/// Returns the number of registered providers.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when no provider is registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry").field("ids", &self.ids()).finish()
	}
}
