//! Gateway-level error types shared across transports, stores, and the typed API surface.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout); never retried.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Server answered with a non-success HTTP status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Token refresh failed; terminal for every request queued behind it.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base address cannot be parsed.
	#[error("Base address is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path cannot be joined onto the base address.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path string.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body cannot be serialized to JSON.
	#[error("Request body could not be serialized.")]
	InvalidBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO); no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded its configured timeout.
	#[error("Request timed out before a response was received.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Non-success HTTP status surfaced to the caller unchanged.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ApiError {
	/// Server supplied a message alongside the error status.
	#[error("{message}")]
	Status {
		/// HTTP status code of the response.
		status: u16,
		/// Message extracted from the response body.
		message: String,
	},
	/// Server returned an error status without a usable message.
	#[error("HTTP error {status}.")]
	Http {
		/// HTTP status code of the response.
		status: u16,
	},
	/// Request was rejected with 401 and will not be retried further.
	#[error("Request was rejected with HTTP 401 and was not retried further.")]
	Unauthorized,
}
impl ApiError {
	/// Returns the HTTP status code carried by this error.
	pub const fn status(&self) -> u16 {
		match self {
			Self::Status { status, .. } | Self::Http { status } => *status,
			Self::Unauthorized => 401,
		}
	}
}

/// Terminal refresh failure fanned out to every caller queued behind one refresh.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Token refresh failed: {message}")]
pub struct RefreshError {
	/// HTTP status returned by the refresh endpoint, when one was received.
	pub status: Option<u16>,
	/// Human-readable failure summary.
	pub message: String,
}
impl RefreshError {
	/// Creates a refresh error from an endpoint status and summary.
	pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}

	/// Refresh leader went away before publishing an outcome.
	pub fn interrupted() -> Self {
		Self::new(None, "refresh was interrupted before completing")
	}
}

/// Malformed JSON in a response body, annotated with the path that failed.
#[derive(Debug, ThisError)]
#[error("Response body contained malformed JSON.")]
pub struct DecodeError {
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status of the response being decoded.
	pub status: u16,
}
