//! The authenticated request gateway: bearer attachment, dispatch, and one-shot 401 recovery.

pub mod options;
pub mod refresh;

mod metrics;

pub use metrics::RefreshMetrics;
pub use options::*;
pub use refresh::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::GatewayConfig,
	error::{ApiError, DecodeError},
	http::{GatewayTransport, Method, MultipartPart, OutboundRequest, RawResponse, RequestBody},
	obs::{self, GatewaySpan, RequestKind, RequestOutcome},
	store::{CredentialStore, StorageKey},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Decoded response body plus status metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<R> {
	/// HTTP status code of the final response.
	pub status: u16,
	/// Decoded body.
	pub body: R,
}

/// Issues HTTP requests with an attached bearer token and recovers once from
/// token expiry without surfacing the failure to the caller when recovery
/// succeeds.
///
/// The gateway owns the transport, credential store, configuration, and the
/// refresh gate so verb implementations can focus on per-call concerns. The
/// stored credential is read before every send; it is written only by the
/// refresh-success path and cleared only by the refresh-failure path.
pub struct Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Credential store read before each send.
	pub store: Arc<dyn CredentialStore>,
	/// Base address, timeout, and 401 recovery configuration.
	pub config: GatewayConfig,
	/// Shared metrics recorder for refresh activity.
	pub refresh_metrics: Arc<RefreshMetrics>,
	pub(crate) gate: Arc<RefreshGate>,
}
impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_transport(
		store: Arc<dyn CredentialStore>,
		config: GatewayConfig,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			config,
			refresh_metrics: Default::default(),
			gate: Default::default(),
		}
	}

	/// Returns the refresh gate for inspection (e.g., `is_refreshing` checks).
	pub fn refresh_gate(&self) -> &RefreshGate {
		&self.gate
	}

	/// Issues a GET request and decodes the JSON response body.
	pub async fn get<R>(&self, path: &str, options: RequestOptions) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let raw = self.dispatch(RequestKind::Call, Method::Get, path, RequestBody::Empty, options).await?;

		decode_json(raw)
	}

	/// Issues a POST request with an optional JSON body.
	pub async fn post<R>(
		&self,
		path: &str,
		body: Option<serde_json::Value>,
		options: RequestOptions,
	) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let body = body.map_or(RequestBody::Empty, RequestBody::Json);
		let raw = self.dispatch(RequestKind::Call, Method::Post, path, body, options).await?;

		decode_json(raw)
	}

	/// Issues a PUT request with an optional JSON body.
	pub async fn put<R>(
		&self,
		path: &str,
		body: Option<serde_json::Value>,
		options: RequestOptions,
	) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let body = body.map_or(RequestBody::Empty, RequestBody::Json);
		let raw = self.dispatch(RequestKind::Call, Method::Put, path, body, options).await?;

		decode_json(raw)
	}

	/// Issues a PATCH request with an optional JSON body.
	pub async fn patch<R>(
		&self,
		path: &str,
		body: Option<serde_json::Value>,
		options: RequestOptions,
	) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let body = body.map_or(RequestBody::Empty, RequestBody::Json);
		let raw = self.dispatch(RequestKind::Call, Method::Patch, path, body, options).await?;

		decode_json(raw)
	}

	/// Issues a DELETE request and decodes the JSON response body.
	pub async fn delete<R>(&self, path: &str, options: RequestOptions) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let raw = self
			.dispatch(RequestKind::Call, Method::Delete, path, RequestBody::Empty, options)
			.await?;

		decode_json(raw)
	}

	/// Uploads multipart parts and decodes the JSON response body.
	pub async fn upload<R>(
		&self,
		path: &str,
		parts: Vec<MultipartPart>,
		options: RequestOptions,
	) -> Result<Response<R>>
	where
		R: DeserializeOwned,
	{
		let raw = self
			.dispatch(RequestKind::Upload, Method::Post, path, RequestBody::Multipart(parts), options)
			.await?;

		decode_json(raw)
	}

	/// Downloads the response body as raw bytes.
	pub async fn download(&self, path: &str, options: RequestOptions) -> Result<Response<Vec<u8>>> {
		let raw = self
			.dispatch(RequestKind::Download, Method::Get, path, RequestBody::Empty, options)
			.await?;

		Ok(Response { status: raw.status, body: raw.body })
	}

	async fn dispatch(
		&self,
		kind: RequestKind,
		method: Method,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> Result<RawResponse> {
		let span = GatewaySpan::new(kind, method.as_str());

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span.instrument(self.dispatch_inner(method, path, body, options)).await;

		match &result {
			Ok(raw) => {
				span.record_status(raw.status);
				obs::record_request_outcome(kind, RequestOutcome::Success);
			},
			Err(error) => {
				if let Error::Api(api) = error {
					span.record_status(api.status());
				}

				obs::record_request_outcome(kind, RequestOutcome::Failure);
			},
		}

		result
	}

	async fn dispatch_inner(
		&self,
		method: Method,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> Result<RawResponse> {
		let url = self.config.endpoint(path, &options.query)?;
		let timeout = options.timeout.unwrap_or(self.config.timeout);
		// Attach: a missing token is not an error; the call proceeds
		// unauthenticated and the server decides.
		let bearer = self.stored_access_token().await?;
		let first = self.send_once(method, &url, &options.headers, &body, timeout, bearer).await?;

		if !first.is_unauthorized() || self.config.effective_retry_attempts() == 0 {
			return evaluate(first);
		}

		// Recover: one refresh-and-retry cycle per original request. A second
		// 401 falls through `evaluate` as a final failure.
		let refreshed = self.refreshed_access_token().await?;
		let retried = self
			.send_once(method, &url, &options.headers, &body, timeout, Some(refreshed))
			.await?;

		evaluate(retried)
	}

	async fn send_once(
		&self,
		method: Method,
		url: &Url,
		headers: &[(String, String)],
		body: &RequestBody,
		timeout: Duration,
		bearer: Option<TokenSecret>,
	) -> Result<RawResponse> {
		let request = OutboundRequest {
			method,
			url: url.clone(),
			headers: headers.to_vec(),
			bearer,
			body: body.clone(),
			timeout,
		};

		self.transport.execute(request).await
	}

	async fn stored_access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(StorageKey::AccessToken).await?.map(TokenSecret::new))
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a gateway with the crate's default reqwest transport.
	pub fn new(store: Arc<dyn CredentialStore>, config: GatewayConfig) -> Self {
		Self::with_transport(store, config, ReqwestTransport::default())
	}
}
impl<T> Clone for Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			gate: self.gate.clone(),
		}
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("config", &self.config)
			.field("refreshing", &self.gate.is_refreshing())
			.finish()
	}
}

fn evaluate(raw: RawResponse) -> Result<RawResponse> {
	if raw.is_success() {
		return Ok(raw);
	}
	if raw.is_unauthorized() {
		return Err(ApiError::Unauthorized.into());
	}

	Err(match body_message(&raw.body) {
		Some(message) => ApiError::Status { status: raw.status, message },
		None => ApiError::Http { status: raw.status },
	}
	.into())
}

fn decode_json<R>(raw: RawResponse) -> Result<Response<R>>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&raw.body);
	let body = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError { source, status: raw.status })?;

	Ok(Response { status: raw.status, body })
}

/// Extracts the conventional `message` field from an error body, if any.
pub(crate) fn body_message(body: &[u8]) -> Option<String> {
	let value: serde_json::Value = serde_json::from_slice(body).ok()?;

	value.get("message").and_then(|message| message.as_str()).map(str::to_owned)
}
