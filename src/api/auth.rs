//! Typed wrappers for the `/auth` endpoints, including credential persistence.

// self
use crate::{
	_prelude::*,
	api::{Envelope, User, json_body},
	auth::{Credential, TokenSecret},
	gateway::{Gateway, RequestOptions, Response},
	http::GatewayTransport,
};

/// Credentials submitted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Registration payload submitted to the register endpoint.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
	/// Display name.
	pub name: String,
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Session returned by login and register.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthSession {
	/// Authenticated user profile.
	pub user: User,
	/// Access token for subsequent calls.
	#[serde(alias = "accessToken")]
	pub token: TokenSecret,
	/// Refresh token, when the backend issues one.
	#[serde(default, alias = "refreshToken")]
	pub refresh_token: Option<TokenSecret>,
}
impl AuthSession {
	/// Token pair carried by this session.
	pub fn credential(&self) -> Credential {
		Credential { access_token: self.token.clone(), refresh_token: self.refresh_token.clone() }
	}
}

/// Typed client for the `/auth` endpoints.
///
/// Login and register persist the returned credential into the gateway's store;
/// logout calls the endpoint and then clears it, mirroring the credential
/// lifecycle the gateway's refresh path maintains.
pub struct AuthApi<T>
where
	T: ?Sized + GatewayTransport,
{
	gateway: Gateway<T>,
}
impl<T> AuthApi<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Wraps a gateway.
	pub fn new(gateway: Gateway<T>) -> Self {
		Self { gateway }
	}

	/// Authenticates and persists the returned credential.
	pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
		let response: Response<Envelope<AuthSession>> = self
			.gateway
			.post("/auth/login", Some(json_body(request)?), RequestOptions::new())
			.await?;
		let session = response.body.into_result(response.status)?;

		session.credential().persist(&*self.gateway.store).await?;

		Ok(session)
	}

	/// Registers a new account and persists the returned credential.
	pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession> {
		let response: Response<Envelope<AuthSession>> = self
			.gateway
			.post("/auth/register", Some(json_body(request)?), RequestOptions::new())
			.await?;
		let session = response.body.into_result(response.status)?;

		session.credential().persist(&*self.gateway.store).await?;

		Ok(session)
	}

	/// Ends the session server-side, then clears the stored credential.
	pub async fn logout(&self) -> Result<()> {
		let response: Response<Envelope<bool>> =
			self.gateway.post("/auth/logout", None, RequestOptions::new()).await?;

		response.body.accepted(response.status)?;
		Credential::clear(&*self.gateway.store).await?;

		Ok(())
	}
}
impl<T> Debug for AuthApi<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthApi").field("gateway", &self.gateway).finish()
	}
}
