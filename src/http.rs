//! Shared reqwest transport for the realm token endpoint and the AIPE API.
//!
//! Both sides of the crate send through one [`ReqwestHttpClient`], so a deadline configured
//! on it bounds every request. Failures are classified here once: builder problems are
//! configuration errors, deadlines are timeouts, and everything else is a network error.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::Response;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Endpoint label for failures against the realm token endpoint.
pub(crate) const TOKEN_ENDPOINT: &str = "token endpoint";
/// Endpoint label for failures against the AIPE API.
pub(crate) const AIPE_ENDPOINT: &str = "AIPE API";

const BODY_PREVIEW_LIMIT: usize = 512;

/// Cloneable handle to the reqwest client every request goes through.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail once `timeout` elapses.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self> {
		let client = ReqwestClient::builder().timeout(timeout).build().map_err(ConfigError::from)?;

		Ok(Self(client))
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Classifies a reqwest failure raised while calling `endpoint`.
pub(crate) fn map_reqwest_error(endpoint: &'static str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(endpoint, err).into();
	}

	TransportError::network(endpoint, err).into()
}

/// Reads a response body as text, cut to a bounded length on a char boundary.
///
/// Used only for diagnostics; a body that cannot be read yields an empty string.
pub(crate) async fn body_preview(response: Response) -> String {
	let mut body = response.text().await.unwrap_or_default();

	if body.len() > BODY_PREVIEW_LIMIT {
		let mut cut = BODY_PREVIEW_LIMIT;

		while !body.is_char_boundary(cut) {
			cut -= 1;
		}

		body.truncate(cut);
	}

	body
}
