//! Typed wrappers for the `/api/users` resource.

// self
use crate::{
	_prelude::*,
	api::{Envelope, PageQuery, Paginated, User, json_body},
	gateway::{Gateway, RequestOptions, Response},
	http::GatewayTransport,
};

/// Payload for creating a user.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
	/// Display name.
	pub name: String,
	/// Unique email address.
	pub email: String,
}

/// Partial update; unset fields are left untouched server-side.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UserUpdate {
	/// New display name, if changing.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New email address, if changing.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

/// Typed client for the `/api/users` endpoints.
pub struct UsersApi<T>
where
	T: ?Sized + GatewayTransport,
{
	gateway: Gateway<T>,
}
impl<T> UsersApi<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Wraps a gateway.
	pub fn new(gateway: Gateway<T>) -> Self {
		Self { gateway }
	}

	/// Lists users one page at a time.
	pub async fn list(&self, page: PageQuery) -> Result<Paginated<User>> {
		let response: Response<Envelope<Paginated<User>>> =
			self.gateway.get("/api/users", page.apply(RequestOptions::new())).await?;

		Ok(response.body.into_result(response.status)?)
	}

	/// Searches users by a free-text query.
	pub async fn search(&self, query: &str, page: PageQuery) -> Result<Paginated<User>> {
		let options = page.apply(RequestOptions::new()).query("q", query);
		let response: Response<Envelope<Paginated<User>>> =
			self.gateway.get("/api/users/search", options).await?;

		Ok(response.body.into_result(response.status)?)
	}

	/// Fetches a single user by id.
	pub async fn get(&self, id: u64) -> Result<User> {
		let response: Response<Envelope<User>> =
			self.gateway.get(&format!("/api/users/{id}"), RequestOptions::new()).await?;

		Ok(response.body.into_result(response.status)?)
	}

	/// Creates a user.
	pub async fn create(&self, user: &NewUser) -> Result<User> {
		let response: Response<Envelope<User>> = self
			.gateway
			.post("/api/users", Some(json_body(user)?), RequestOptions::new())
			.await?;

		Ok(response.body.into_result(response.status)?)
	}

	/// Applies a partial update to a user.
	pub async fn update(&self, id: u64, update: &UserUpdate) -> Result<User> {
		let response: Response<Envelope<User>> = self
			.gateway
			.put(&format!("/api/users/{id}"), Some(json_body(update)?), RequestOptions::new())
			.await?;

		Ok(response.body.into_result(response.status)?)
	}

	/// Deletes a user; the backend may or may not echo the removed record.
	pub async fn delete(&self, id: u64) -> Result<Option<User>> {
		let response: Response<Envelope<User>> =
			self.gateway.delete(&format!("/api/users/{id}"), RequestOptions::new()).await?;

		Ok(response.body.accepted(response.status)?)
	}
}
impl<T> Debug for UsersApi<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UsersApi").field("gateway", &self.gateway).finish()
	}
}
