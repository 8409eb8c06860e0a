//! AIPE data-object API client: objects, links, and the property codec between them.
//!
//! [`AipeClient`] carries a base URL and the bearer token obtained from an
//! [`Authenticator`](crate::auth::Authenticator). It keeps no per-object state; every
//! operation is one (or, for paginated link reads, a sequence of) HTTP round-trips and is safe
//! to call concurrently for independent IDs. Dropping an operation's future cancels the
//! in-flight request.

pub mod diff;
pub mod lifecycle;
pub mod link;
pub mod object;
pub mod property;

pub use diff::*;
pub use link::*;
pub use object::*;
pub use property::*;

// crates.io
use reqwest::{RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::{ApiError, ConfigError, DecodeError},
	http::{self, AIPE_ENDPOINT, ReqwestHttpClient},
	obs::{self, OperationKind},
};

const OBJECTS_PATH: [&str; 4] = ["data", "api", "v1", "objects"];

/// Async client for the AIPE data-object REST API.
#[derive(Clone)]
pub struct AipeClient {
	http_client: ReqwestHttpClient,
	base_url: Url,
	token: BearerToken,
}
impl AipeClient {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(base_url: Url, token: BearerToken) -> Result<Self> {
		Self::with_http_client(ReqwestHttpClient::default(), base_url, token)
	}

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		http_client: ReqwestHttpClient,
		base_url: Url,
		token: BearerToken,
	) -> Result<Self> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::NotABaseUrl { setting: "aipe_url" }.into());
		}

		Ok(Self { http_client, base_url, token })
	}

	/// Replaces the bearer token carried by this client.
	pub fn with_token(mut self, token: BearerToken) -> Self {
		self.token = token;

		self
	}

	/// Base URL every endpoint is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Bearer token sent with every request.
	pub fn token(&self) -> &BearerToken {
		&self.token
	}

	/// Resolves `{base}/data/api/v1/objects[/{segments..}]`, percent-encoding each segment.
	pub(crate) fn objects_url(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::NotABaseUrl { setting: "aipe_url" })?
			.pop_if_empty()
			.extend(OBJECTS_PATH)
			.extend(segments);

		Ok(url)
	}

	/// Attaches the bearer token and sends the request.
	pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
		request
			.bearer_auth(self.token.expose())
			.send()
			.await
			.map_err(|e| http::map_reqwest_error(AIPE_ENDPOINT, e))
	}

	/// Sends a JSON body with the bearer token attached.
	pub(crate) async fn send_json<B>(&self, request: RequestBuilder, body: &B) -> Result<Response>
	where
		B: ?Sized + Serialize,
	{
		let payload = serde_json::to_vec(body).map_err(DecodeError::Serialize)?;

		self.send(request.header(CONTENT_TYPE, "application/json").body(payload)).await
	}

	pub(crate) fn http(&self) -> &ReqwestClient {
		&self.http_client
	}
}
impl Debug for AipeClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AipeClient")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.finish()
	}
}

/// Passes `response` through when its status is in `accepted`; otherwise logs the body and
/// returns an [`ApiError`] carrying the status.
pub(crate) async fn expect_status(
	kind: OperationKind,
	url: &Url,
	response: Response,
	accepted: &[StatusCode],
) -> Result<Response> {
	let status = response.status();

	if accepted.contains(&status) {
		return Ok(response);
	}

	let _body = http::body_preview(response).await;

	obs::event!(
		info,
		operation = kind.as_str(),
		status = status.as_u16(),
		url = %url,
		body = %_body,
		"AIPE request failed."
	);

	Err(ApiError::unexpected_status(status.as_u16()).into())
}

/// Reads and decodes a JSON body, reporting the failing JSON path on mismatch.
pub(crate) async fn read_json<T>(response: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status().as_u16();
	let bytes = response.bytes().await.map_err(|e| http::map_reqwest_error(AIPE_ENDPOINT, e))?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { source, status: Some(status) }.into())
}
