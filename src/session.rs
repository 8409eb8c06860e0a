//! Wires resolved settings, the authenticator, and AIPE clients together.
//!
//! A [`Session`] is what a host keeps for the lifetime of its provider instance: it
//! authenticates once at [`Session::connect`] so bad credentials fail early, then hands out
//! [`AipeClient`]s carrying a token that is still valid past the safety margin.

// self
use crate::{
	_prelude::*,
	aipe::AipeClient,
	auth::Authenticator,
	config::{ProviderConfig, ResolvedConfig},
	error::ConfigError,
	http::ReqwestHttpClient,
	obs,
};

/// Authenticated entry point sharing one transport and one token cache.
#[derive(Debug)]
pub struct Session {
	http_client: ReqwestHttpClient,
	authenticator: Arc<Authenticator>,
	aipe_url: Url,
}
impl Session {
	/// Builds the transport and authenticator from `config` and performs the first
	/// authentication.
	pub async fn connect(config: ResolvedConfig) -> Result<Self> {
		let http_client = match config.request_timeout {
			Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
			None => ReqwestHttpClient::default(),
		};

		Self::connect_with_http_client(config, http_client).await
	}

	/// Same as [`Session::connect`] but reuses a caller-provided transport.
	///
	/// `config.request_timeout` is ignored; the transport's own settings apply.
	pub async fn connect_with_http_client(
		config: ResolvedConfig,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let ResolvedConfig {
			application_username,
			application_password,
			authenticator_realm_url,
			aipe_url,
			..
		} = config;

		if aipe_url.cannot_be_a_base() {
			return Err(ConfigError::NotABaseUrl { setting: "aipe_url" }.into());
		}

		let authenticator = Authenticator::with_http_client(
			authenticator_realm_url,
			application_username,
			application_password,
			http_client.clone(),
		)?;

		authenticator.authenticate().await?;

		obs::event!(
			info,
			username = authenticator.username(),
			aipe_url = %aipe_url,
			"AIPE session established."
		);

		Ok(Self { http_client, authenticator: Arc::new(authenticator), aipe_url })
	}

	/// Resolves `config` against the process environment, then connects.
	pub async fn from_provider_config(config: ProviderConfig) -> Result<Self> {
		Self::connect(config.resolve()?).await
	}

	/// Returns a client carrying a token that stays valid past the safety margin,
	/// re-authenticating first when the cached one does not.
	pub async fn client(&self) -> Result<AipeClient> {
		let token = self.authenticator.authenticate().await?;

		AipeClient::with_http_client(self.http_client.clone(), self.aipe_url.clone(), token)
	}

	/// Shared authenticator, e.g. for hosts that manage clients themselves.
	pub fn authenticator(&self) -> &Arc<Authenticator> {
		&self.authenticator
	}

	/// AIPE base URL every client is bound to.
	pub fn aipe_url(&self) -> &Url {
		&self.aipe_url
	}
}
