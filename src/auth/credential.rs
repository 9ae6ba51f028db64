//! The access/refresh token pair written at login and cleared at logout.

// self
use crate::{
	_prelude::*,
	auth::secret::TokenSecret,
	store::{CredentialStore, StorageKey, StoreError},
};

/// Credential persisted by the gateway between process restarts.
///
/// Written on login and on every successful refresh, read before each outbound
/// call, and deleted on logout or terminal refresh failure. Both tokens are
/// opaque; the gateway never inspects or validates them client-side.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Bearer token attached to outbound requests.
	pub access_token: TokenSecret,
	/// Token presented to the refresh endpoint, if one was issued.
	pub refresh_token: Option<TokenSecret>,
}
impl Credential {
	/// Creates a credential holding only an access token.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into(), refresh_token: None }
	}

	/// Attaches the refresh token issued alongside the access token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Writes the pair under its storage keys.
	///
	/// A credential without a refresh token leaves any previously stored refresh
	/// token in place, so a non-rotating refresh does not log the session out.
	pub async fn persist(&self, store: &dyn CredentialStore) -> Result<(), StoreError> {
		store.set(StorageKey::AccessToken, self.access_token.expose().to_owned()).await?;

		if let Some(refresh_token) = &self.refresh_token {
			store.set(StorageKey::RefreshToken, refresh_token.expose().to_owned()).await?;
		}

		Ok(())
	}

	/// Deletes both tokens from the store.
	pub async fn clear(store: &dyn CredentialStore) -> Result<(), StoreError> {
		store.remove(StorageKey::AccessToken).await?;
		store.remove(StorageKey::RefreshToken).await?;

		Ok(())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}
