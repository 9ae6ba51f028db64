//! Singleflight token refresh: the gate, queued waiters, and the refresh call itself.
//!
//! Every request that observes a 401 funnels through
//! [`Gateway::refreshed_access_token`]. The first caller becomes the leader,
//! performs one `POST /auth/refresh`, persists the rotated credential, and
//! publishes the outcome; everyone else joins the waiter queue and resumes with
//! that same outcome. A failed refresh clears stored credentials and is terminal
//! for the whole queue, so many parallel 401s never cause a refresh-endpoint
//! storm.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenSecret},
	error::RefreshError,
	gateway::{Gateway, body_message},
	http::{GatewayTransport, Method, OutboundRequest, RequestBody},
	obs::{self, GatewaySpan, RequestKind, RequestOutcome},
	store::StorageKey,
};

/// Relative path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Outcome published to every caller coalesced behind one refresh.
#[derive(Clone, Debug)]
pub enum RefreshOutcome {
	/// Refresh succeeded; the new access token is already persisted.
	Refreshed(TokenSecret),
	/// Refresh failed; stored credentials have been cleared.
	Failed(RefreshError),
}
impl RefreshOutcome {
	/// Unwraps into the gateway result type.
	pub fn into_result(self) -> Result<TokenSecret> {
		match self {
			Self::Refreshed(token) => Ok(token),
			Self::Failed(error) => Err(error.into()),
		}
	}
}

#[derive(Debug, Default)]
struct GateInner {
	in_flight: bool,
	waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// The "refresh in progress" flag plus the queue of callers blocked on it.
///
/// Owned by each [`Gateway`] instance rather than living in module state. The
/// flag is checked and set within one synchronous critical section, so no two
/// leaders can ever be elected for the same cycle and every 401 observed while
/// a refresh is in flight lands in the waiter queue of exactly that refresh.
#[derive(Debug, Default)]
pub struct RefreshGate {
	inner: Mutex<GateInner>,
}
impl RefreshGate {
	/// Claims the refresh or joins the queue behind the in-flight one.
	pub fn begin(gate: &Arc<Self>) -> RefreshTicket {
		let mut inner = gate.inner.lock();

		if inner.in_flight {
			let (sender, receiver) = oneshot::channel();

			inner.waiters.push(sender);

			RefreshTicket::Follower(receiver)
		} else {
			inner.in_flight = true;

			RefreshTicket::Leader(RefreshLeader { gate: Arc::clone(gate), completed: false })
		}
	}

	/// Returns `true` while a refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.inner.lock().in_flight
	}

	fn complete(&self, outcome: RefreshOutcome) {
		// Flag and queue reset together so a 401 arriving mid-drain starts a
		// new cycle instead of waiting on an already-drained queue.
		let waiters = {
			let mut inner = self.inner.lock();

			inner.in_flight = false;

			std::mem::take(&mut inner.waiters)
		};

		for waiter in waiters {
			let _ = waiter.send(outcome.clone());
		}
	}
}

/// Role assigned to a caller entering the gate.
#[derive(Debug)]
pub enum RefreshTicket {
	/// Caller must perform the refresh and publish the outcome.
	Leader(RefreshLeader),
	/// Caller waits for the in-flight refresh outcome.
	Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Completion handle owned by the refresh leader.
///
/// Dropping the handle without completing fails queued waiters instead of
/// leaving the gate wedged behind a cancelled leader.
#[derive(Debug)]
pub struct RefreshLeader {
	gate: Arc<RefreshGate>,
	completed: bool,
}
impl RefreshLeader {
	/// Publishes the outcome, draining waiters in insertion order, then clears
	/// the in-progress flag.
	pub fn complete(mut self, outcome: RefreshOutcome) {
		self.completed = true;
		self.gate.complete(outcome);
	}
}
impl Drop for RefreshLeader {
	fn drop(&mut self) {
		if !self.completed {
			self.gate.complete(RefreshOutcome::Failed(RefreshError::interrupted()));
		}
	}
}

impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Resolves to a freshly refreshed access token, coalescing concurrent
	/// callers behind a single refresh call.
	pub(crate) async fn refreshed_access_token(&self) -> Result<TokenSecret> {
		match RefreshGate::begin(&self.gate) {
			RefreshTicket::Leader(leader) => {
				self.refresh_metrics.record_attempt();

				let outcome = match self.run_refresh().await {
					Ok(token) => {
						self.refresh_metrics.record_success();

						RefreshOutcome::Refreshed(token)
					},
					Err(error) => {
						self.refresh_metrics.record_failure();

						RefreshOutcome::Failed(error)
					},
				};

				leader.complete(outcome.clone());

				outcome.into_result()
			},
			RefreshTicket::Follower(receiver) => {
				self.refresh_metrics.record_coalesced();

				receiver
					.await
					.unwrap_or_else(|_| RefreshOutcome::Failed(RefreshError::interrupted()))
					.into_result()
			},
		}
	}

	async fn run_refresh(&self) -> Result<TokenSecret, RefreshError> {
		const KIND: RequestKind = RequestKind::Refresh;

		let span = GatewaySpan::new(KIND, "run_refresh");

		obs::record_request_outcome(KIND, RequestOutcome::Attempt);

		let result = span.instrument(self.refresh_once()).await;

		match &result {
			Ok(_) => obs::record_request_outcome(KIND, RequestOutcome::Success),
			Err(error) => {
				if let Some(status) = error.status {
					span.record_status(status);
				}

				obs::record_request_outcome(KIND, RequestOutcome::Failure);
			},
		}

		result
	}

	async fn refresh_once(&self) -> Result<TokenSecret, RefreshError> {
		let outcome = self.call_refresh_endpoint().await;

		if outcome.is_err() {
			// Terminal for every queued request; callers route to a login flow
			// from here. Clearing is best-effort.
			let _ = Credential::clear(&*self.store).await;
		}

		outcome
	}

	async fn call_refresh_endpoint(&self) -> Result<TokenSecret, RefreshError> {
		let refresh_token = self
			.store
			.get(StorageKey::RefreshToken)
			.await
			.map_err(|e| RefreshError::new(None, e.to_string()))?;
		let url = self
			.config
			.endpoint(REFRESH_PATH, &[])
			.map_err(|e| RefreshError::new(None, e.to_string()))?;
		let body = match &refresh_token {
			Some(token) => RequestBody::Json(serde_json::json!({ "refreshToken": token })),
			None => RequestBody::Empty,
		};
		let request = OutboundRequest {
			method: Method::Post,
			url,
			headers: Vec::new(),
			bearer: None,
			body,
			timeout: self.config.timeout,
		};
		let raw = self
			.transport
			.execute(request)
			.await
			.map_err(|e| RefreshError::new(None, e.to_string()))?;

		if !raw.is_success() {
			let message = body_message(&raw.body)
				.unwrap_or_else(|| format!("refresh endpoint returned HTTP {}", raw.status));

			return Err(RefreshError::new(Some(raw.status), message));
		}

		let payload: RefreshPayload = {
			let mut deserializer = serde_json::Deserializer::from_slice(&raw.body);

			serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
				RefreshError::new(Some(raw.status), format!("malformed refresh response: {e}"))
			})?
		};

		if payload.success == Some(false) {
			return Err(RefreshError::new(
				Some(raw.status),
				payload
					.message
					.unwrap_or_else(|| "refresh endpoint reported failure".into()),
			));
		}

		let (access, rotated_refresh) = payload.into_tokens().ok_or_else(|| {
			RefreshError::new(Some(raw.status), "refresh response did not contain a token")
		})?;
		let mut credential = Credential::new(access);

		if let Some(rotated) = rotated_refresh {
			credential = credential.with_refresh_token(rotated);
		}

		credential
			.persist(&*self.store)
			.await
			.map_err(|e| RefreshError::new(None, e.to_string()))?;

		Ok(credential.access_token)
	}
}

/// Accepts both the bare `{token}` payload and the `{success, data: {token}}`
/// envelope the backends answer with; a rotated refresh token is optional.
#[derive(Debug, Deserialize)]
struct RefreshPayload {
	success: Option<bool>,
	message: Option<String>,
	token: Option<String>,
	#[serde(alias = "refreshToken")]
	refresh_token: Option<String>,
	data: Option<Box<RefreshPayload>>,
}
impl RefreshPayload {
	fn into_tokens(self) -> Option<(String, Option<String>)> {
		if let Some(token) = self.token {
			return Some((token, self.refresh_token));
		}

		self.data.and_then(|inner| inner.into_tokens())
	}
}
