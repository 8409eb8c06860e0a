//! Client-credentials authenticator with an expiry-aware, single-flight token cache.
//!
//! [`Authenticator::authenticate`] holds one async lock across the validity check, the token
//! exchange, and the cache write. Concurrent callers therefore queue behind an in-flight
//! exchange and then observe its freshly cached token instead of stampeding the realm.

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Secret},
	error::ConfigError,
	http::ReqwestHttpClient,
	oauth::ClientCredentialsExchange,
	obs::{self, OperationKind},
};

/// Cached tokens are reused only while they stay valid this long past "now".
pub const TOKEN_SAFETY_MARGIN: Duration = Duration::seconds(5);

const TOKEN_ENDPOINT_PATH: [&str; 3] = ["protocol", "openid-connect", "token"];

/// Acquires and caches bearer tokens from an OIDC realm's token endpoint.
pub struct Authenticator {
	username: String,
	exchange: ClientCredentialsExchange,
	cached: AsyncMutex<Option<BearerToken>>,
}
impl Authenticator {
	/// Creates an authenticator for `realm_url` backed by its own default reqwest transport.
	pub fn new(
		realm_url: Url,
		username: impl Into<String>,
		password: impl Into<Secret>,
	) -> Result<Self> {
		Self::with_http_client(realm_url, username, password, ReqwestHttpClient::default())
	}

	/// Creates an authenticator for `realm_url` that sends through `http_client`.
	pub fn with_http_client(
		realm_url: Url,
		username: impl Into<String>,
		password: impl Into<Secret>,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let username = username.into();
		let exchange = ClientCredentialsExchange::new(
			http_client,
			token_endpoint(realm_url)?,
			&username,
			&password.into(),
		);

		Ok(Self { username, exchange, cached: AsyncMutex::new(None) })
	}

	/// Token endpoint derived from the realm URL.
	pub fn token_endpoint(&self) -> &Url {
		self.exchange.token_endpoint()
	}

	/// Application username presented to the realm.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Returns a bearer token, reusing the cached one while it stays valid past the safety
	/// margin.
	///
	/// Tokens whose expiry cannot be decoded are returned but never reused, so every call
	/// re-authenticates until the realm issues a token with an `exp` claim.
	pub async fn authenticate(&self) -> Result<BearerToken> {
		obs::observe(OperationKind::Authenticate, async {
			let mut cached = self.cached.lock().await;

			let reusable = cached.as_ref().filter(|token| token.is_valid_in(TOKEN_SAFETY_MARGIN));

			if let Some(token) = reusable {
				obs::event!(
					debug,
					expires_at = ?token.expires_at(),
					"Reusing cached bearer token."
				);

				return Ok(token.clone());
			}

			obs::event!(info, url = %self.token_endpoint(), "Requesting client-credentials token.");

			let token = self.exchange.exchange().await?;

			if token.expires_at().is_none() {
				obs::event!(
					warn,
					"Issued token has no readable exp claim; it will not be reused from cache."
				);
			}

			*cached = Some(token.clone());

			Ok(token)
		})
		.await
	}

	/// Returns the cached token without contacting the realm, if one exists.
	pub async fn cached_token(&self) -> Option<BearerToken> {
		self.cached.lock().await.clone()
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("username", &self.username)
			.field("exchange", &self.exchange)
			.finish()
	}
}

fn token_endpoint(mut realm_url: Url) -> Result<Url, ConfigError> {
	realm_url
		.path_segments_mut()
		.map_err(|_| ConfigError::NotABaseUrl { setting: "authenticator_realm_url" })?
		.pop_if_empty()
		.extend(TOKEN_ENDPOINT_PATH);

	Ok(realm_url)
}
