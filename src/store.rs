//! Storage contracts and built-in credential store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable key-value storage contract consumed by the gateway and the typed API layer.
///
/// Values are opaque strings surviving process restarts. The gateway itself only
/// touches [`StorageKey::AccessToken`] and [`StorageKey::RefreshToken`]; the
/// remaining keys belong to callers (profile cache, UI preferences).
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<String>>;

	/// Writes or replaces the value stored under `key`.
	fn set(&self, key: StorageKey, value: String) -> StoreFuture<'_, ()>;

	/// Deletes the value stored under `key`, returning the previous value.
	fn remove(&self, key: StorageKey) -> StoreFuture<'_, Option<String>>;
}

/// Fixed keys the store is partitioned by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
	/// Bearer token attached to outbound requests.
	AccessToken,
	/// Token presented to the refresh endpoint.
	RefreshToken,
	/// Cached user profile payload.
	UserProfile,
	/// UI theme preference.
	Theme,
	/// UI locale preference.
	Locale,
	/// Whether the onboarding flow has completed.
	OnboardingCompleted,
}
impl StorageKey {
	/// Returns the stable string key used by storage backends.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "@auth_token",
			Self::RefreshToken => "@refresh_token",
			Self::UserProfile => "@user_data",
			Self::Theme => "@theme",
			Self::Locale => "@language",
			Self::OnboardingCompleted => "@onboarding_completed",
		}
	}
}
impl Display for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn storage_keys_are_stable() {
		assert_eq!(StorageKey::AccessToken.as_str(), "@auth_token");
		assert_eq!(StorageKey::RefreshToken.as_str(), "@refresh_token");
		assert_eq!(StorageKey::UserProfile.as_str(), "@user_data");
		assert_eq!(StorageKey::Locale.to_string(), "@language");
	}

	#[test]
	fn store_error_serializes_for_diagnostics() {
		let error = StoreError::Backend { message: "disk full".into() };
		let payload = serde_json::to_string(&error).expect("StoreError should serialize to JSON.");
		let round_trip: StoreError =
			serde_json::from_str(&payload).expect("Serialized error should deserialize from JSON.");

		assert_eq!(round_trip, error);
	}
}
