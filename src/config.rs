//! Gateway configuration: base address, timeouts, and the 401 recovery knob.

// self
use crate::{_prelude::*, error::ConfigError};

/// Configuration consumed by the gateway for every outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	/// Base address all request paths are resolved against.
	pub base_url: Url,
	/// Timeout applied to each outbound request unless overridden per call.
	pub timeout: Duration,
	/// Number of 401-triggered recovery attempts.
	///
	/// Only the single refresh-and-retry cycle is wired; values above 1 behave
	/// as 1, and 0 disables 401 recovery entirely so the status surfaces
	/// unchanged.
	pub retry_attempts: u32,
}
impl GatewayConfig {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	/// Creates a configuration with default timeout and single-retry recovery.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, timeout: Self::DEFAULT_TIMEOUT, retry_attempts: 1 }
	}

	/// Parses the base address from a string.
	pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
		let base_url =
			Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self::new(base_url))
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the 401 recovery attempt count; see [`GatewayConfig::retry_attempts`].
	pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
		self.retry_attempts = attempts;

		self
	}

	/// Recovery cycles the gateway will actually run for one request.
	pub(crate) const fn effective_retry_attempts(&self) -> u32 {
		if self.retry_attempts > 1 { 1 } else { self.retry_attempts }
	}

	/// Resolves a request path against the base address and appends query pairs.
	///
	/// The base and path are concatenated, so a base address carrying a path
	/// prefix (`https://host/api/v1`) keeps that prefix for every call.
	/// Leading/trailing slashes at the seam are normalized to exactly one.
	pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let relative = path.trim_start_matches('/');
		let mut url = Url::parse(&format!("{base}/{relative}"))
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (name, value) in query {
				pairs.append_pair(name, value);
			}
		}

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> GatewayConfig {
		GatewayConfig::parse("https://api.example.com").expect("Fixture base URL should parse.")
	}

	#[test]
	fn defaults_match_the_client_configuration() {
		let config = config();

		assert_eq!(config.timeout, Duration::from_secs(30));
		assert_eq!(config.retry_attempts, 1);
	}

	#[test]
	fn retry_attempts_clamp_to_a_single_cycle() {
		assert_eq!(config().with_retry_attempts(3).effective_retry_attempts(), 1);
		assert_eq!(config().with_retry_attempts(1).effective_retry_attempts(), 1);
		assert_eq!(config().with_retry_attempts(0).effective_retry_attempts(), 0);
	}

	#[test]
	fn endpoint_joins_paths_and_query() {
		let url = config()
			.endpoint("/api/users", &[("page".into(), "2".into()), ("limit".into(), "20".into())])
			.expect("Endpoint resolution should succeed.");

		assert_eq!(url.as_str(), "https://api.example.com/api/users?page=2&limit=20");

		let bare = config().endpoint("/auth/refresh", &[]).expect("Bare endpoint should resolve.");

		assert_eq!(bare.as_str(), "https://api.example.com/auth/refresh");
	}

	#[test]
	fn endpoint_preserves_base_path_prefix() {
		let config = GatewayConfig::parse("https://api.example.com/api/v1/")
			.expect("Prefixed base URL should parse.");

		assert_eq!(
			config
				.endpoint("/auth/refresh", &[])
				.expect("Prefixed endpoint should resolve.")
				.as_str(),
			"https://api.example.com/api/v1/auth/refresh",
		);
		assert_eq!(
			config.endpoint("users", &[]).expect("Bare relative path should resolve.").as_str(),
			"https://api.example.com/api/v1/users",
		);
	}
}
