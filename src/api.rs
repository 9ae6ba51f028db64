//! Typed REST surface consumed through the gateway.
//!
//! Backend responses arrive wrapped in the `{success, data, message}` envelope;
//! [`Envelope::into_result`] converts that duck-typed shape into an explicit
//! success/failure variant at the gateway boundary. Bare payloads (the mobile
//! backend style) skip the envelope and decode directly at the call site.

pub mod auth;
pub mod users;

pub use auth::*;
pub use users::*;

// self
use crate::{_prelude::*, error::ApiError, gateway::RequestOptions};

/// Standard response envelope returned by the web backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
	/// Whether the operation succeeded.
	pub success: bool,
	/// Payload carried on success.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	/// Human-readable message, usually present on failure.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}
impl<T> Envelope<T> {
	/// Converts the envelope into its payload, surfacing failures as [`ApiError`].
	pub fn into_result(self, status: u16) -> Result<T, ApiError> {
		let Self { success, data, message } = self;

		match (success, data) {
			(true, Some(data)) => Ok(data),
			(true, None) => Err(ApiError::Status {
				status,
				message: "Response envelope is missing data.".into(),
			}),
			(false, _) => Err(match message {
				Some(message) => ApiError::Status { status, message },
				None => ApiError::Http { status },
			}),
		}
	}

	/// Like [`Envelope::into_result`] but tolerates a missing payload
	/// (delete/logout style calls).
	pub fn accepted(self, status: u16) -> Result<Option<T>, ApiError> {
		let Self { success, data, message } = self;

		if success {
			Ok(data)
		} else {
			Err(match message {
				Some(message) => ApiError::Status { status, message },
				None => ApiError::Http { status },
			})
		}
	}
}

/// User resource exchanged with the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Server-assigned identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Unique email address.
	pub email: String,
	/// Creation timestamp as reported by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}

/// Pagination parameters appended to list/search calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageQuery {
	/// 1-based page index.
	pub page: u32,
	/// Items per page.
	pub limit: u32,
}
impl PageQuery {
	/// Appends the pagination pairs onto per-call options.
	pub fn apply(self, options: RequestOptions) -> RequestOptions {
		options.query("page", self.page.to_string()).query("limit", self.limit.to_string())
	}
}
impl Default for PageQuery {
	fn default() -> Self {
		Self { page: 1, limit: 20 }
	}
}

/// One page of a paginated listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
	/// Items on this page.
	#[serde(alias = "data")]
	pub items: Vec<T>,
	/// Total item count across all pages.
	#[serde(default)]
	pub total: u64,
	/// 1-based page index.
	#[serde(default)]
	pub page: u32,
	/// Items per page.
	#[serde(default)]
	pub limit: u32,
}

pub(crate) fn json_body<B>(body: &B) -> Result<serde_json::Value>
where
	B: Serialize,
{
	Ok(serde_json::to_value(body).map_err(crate::error::ConfigError::from)?)
}
