//! Per-call request options shared by every verb.

// self
use crate::_prelude::*;

/// Optional per-call configuration: extra headers, query parameters, and a
/// timeout override.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Extra headers merged into the request.
	pub headers: Vec<(String, String)>,
	/// Query pairs appended to the endpoint URL.
	pub query: Vec<(String, String)>,
	/// Per-call timeout override; falls back to the gateway configuration.
	pub timeout: Option<Duration>,
}
impl RequestOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a header pair.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends a query pair.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Overrides the timeout for this call only.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_accumulates_in_order() {
		let options = RequestOptions::new()
			.header("x-app-version", "1.0.0")
			.query("page", "1")
			.query("limit", "20")
			.with_timeout(Duration::from_secs(5));

		assert_eq!(options.headers, vec![("x-app-version".into(), "1.0.0".into())]);
		assert_eq!(
			options.query,
			vec![("page".into(), "1".into()), ("limit".into(), "20".into())],
		);
		assert_eq!(options.timeout, Some(Duration::from_secs(5)));
	}
}
