//! OAuth2 client-credentials exchange against the realm token endpoint.
//!
//! Credentials go out as `Authorization: Basic base64(username:password)` exactly as
//! configured, with no form-encoding of either part. A 200 answer only has to carry
//! `access_token`; every other field of the token response is ignored.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{AccessToken, basic::BasicErrorResponse};
use reqwest::{
	StatusCode,
	header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Secret},
	error::DecodeError,
	http::{self, ReqwestHttpClient, TOKEN_ENDPOINT},
};

#[derive(Deserialize)]
struct AccessTokenBody {
	access_token: AccessToken,
}

/// One realm token endpoint plus the credential pair presented to it.
pub(crate) struct ClientCredentialsExchange {
	http_client: ReqwestHttpClient,
	token_endpoint: Url,
	authorization: Secret,
}
impl ClientCredentialsExchange {
	pub(crate) fn new(
		http_client: ReqwestHttpClient,
		token_endpoint: Url,
		username: &str,
		password: &Secret,
	) -> Self {
		let authorization = Secret::new(basic_authorization(username, password.expose()));

		Self { http_client, token_endpoint, authorization }
	}

	pub(crate) fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}

	/// Performs one `client_credentials` grant and wraps the issued access token.
	pub(crate) async fn exchange(&self) -> Result<BearerToken> {
		let response = self
			.http_client
			.post(self.token_endpoint.clone())
			.header(AUTHORIZATION, self.authorization.expose())
			.header(ACCEPT, "application/json")
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await
			.map_err(|e| http::map_reqwest_error(TOKEN_ENDPOINT, e))?;
		let status = response.status();

		if status != StatusCode::OK {
			let body = http::body_preview(response).await;

			return Err(rejection(status.as_u16(), &body));
		}

		let bytes =
			response.bytes().await.map_err(|e| http::map_reqwest_error(TOKEN_ENDPOINT, e))?;
		let body: AccessTokenBody =
			serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(&bytes))
				.map_err(|e| DecodeError::TokenResponse { message: e.to_string() })?;

		Ok(BearerToken::new(body.access_token.secret().to_owned()))
	}
}
impl Debug for ClientCredentialsExchange {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsExchange")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("authorization", &self.authorization)
			.finish()
	}
}

fn basic_authorization(username: &str, password: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Turns a non-200 token answer into an authentication error, preferring the RFC 6749 error
/// body when the realm sent one.
fn rejection(status: u16, body: &str) -> Error {
	let reason = match serde_json::from_str::<BasicErrorResponse>(body) {
		Ok(response) => match response.error_description() {
			Some(description) => format!("{}: {description}", response.error().as_ref()),
			None => response.error().as_ref().to_owned(),
		},
		Err(_) => format!("Unexpected status code: {status}"),
	};

	Error::Authentication { status: Some(status), reason }
}
