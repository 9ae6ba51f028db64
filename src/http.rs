//! Transport primitives for gateway requests.
//!
//! The module exposes [`GatewayTransport`] alongside [`OutboundRequest`] and
//! [`RawResponse`] so downstream crates can integrate custom HTTP clients. The
//! trait is the gateway's only dependency on an HTTP stack; the crate ships a
//! reqwest-backed implementation behind the default `reqwest` feature.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret};
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransportError};

/// Boxed future returned by [`GatewayTransport::execute`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing gateway requests.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across
/// gateway clones without additional wrappers. A transport receives a fully
/// prepared [`OutboundRequest`] (URL, headers, bearer, body, timeout) and
/// resolves to the raw status + body; it must never interpret HTTP statuses
/// itself, since classification and 401 recovery belong to the gateway.
pub trait GatewayTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and resolves with the raw response.
	///
	/// Failures to obtain any HTTP response (DNS, TCP, TLS, timeout) must map to
	/// [`TransportError`](crate::error::TransportError) variants; a received
	/// response is always `Ok`, whatever its status.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_, RawResponse>;
}

/// HTTP verbs issued through the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase verb string.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload accepted by transports.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// JSON payload serialized from the caller's value.
	Json(serde_json::Value),
	/// Multipart form upload.
	Multipart(Vec<MultipartPart>),
}

/// One part of a multipart upload.
#[derive(Clone, Debug)]
pub struct MultipartPart {
	/// Form field name.
	pub name: String,
	/// Optional file name hint.
	pub file_name: Option<String>,
	/// Optional MIME type for the part.
	pub mime: Option<String>,
	/// Raw part contents.
	pub bytes: Vec<u8>,
}
impl MultipartPart {
	/// Creates a part from a field name and raw bytes.
	pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self { name: name.into(), file_name: None, mime: None, bytes: bytes.into() }
	}

	/// Sets the file name hint sent with the part.
	pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
		self.file_name = Some(file_name.into());

		self
	}

	/// Sets the MIME type sent with the part.
	pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = Some(mime.into());

		self
	}
}

/// Fully prepared request handed to a transport.
///
/// The bearer token travels as a dedicated field rather than a plain header so
/// derived `Debug` output stays redacted.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute request URL including query parameters.
	pub url: Url,
	/// Additional headers beyond the bearer.
	pub headers: Vec<(String, String)>,
	/// Bearer token rendered as `Authorization: Bearer <token>` when present.
	pub bearer: Option<TokenSecret>,
	/// Request payload.
	pub body: RequestBody,
	/// Per-request timeout; elapsing yields a transport error, not a status.
	pub timeout: Duration,
}

/// Raw response produced by a transport.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers as lowercase name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for 2xx statuses.
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}

	/// Returns `true` for HTTP 401.
	pub const fn is_unauthorized(&self) -> bool {
		self.status == 401
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_, RawResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url).timeout(request.timeout);

			if let Some(token) = &request.bearer {
				builder = builder.bearer_auth(token.expose());
			}
			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.json(&value),
				RequestBody::Multipart(parts) => {
					let mut form = reqwest::multipart::Form::new();

					for part in parts {
						let mut piece = reqwest::multipart::Part::bytes(part.bytes);

						if let Some(file_name) = part.file_name {
							piece = piece.file_name(file_name);
						}
						if let Some(mime) = &part.mime {
							piece = piece.mime_str(mime).map_err(ConfigError::from)?;
						}

						form = form.part(part.name, piece);
					}

					builder.multipart(form)
				},
			};

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RawResponse { status, headers, body })
		})
	}
}
